//! The `smithy.api` prelude: the simple shapes and trait definitions every
//! Smithy 1.0 model may refer to without defining them.

use std::io::Read;

use smithy_ast::{read_model, Model, Result};

const PRELUDE: &[u8] = include_bytes!("../data/prelude.json");

/// Namespace of every shape in the prelude.
pub const NAMESPACE: &str = "smithy.api";

/// The raw prelude document.
pub fn reader() -> impl Read {
    PRELUDE
}

/// Decodes the prelude.
pub fn model() -> Result<Model> {
    read_model(reader())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_yields_the_whole_bundle() {
        let mut data = Vec::new();
        reader().read_to_end(&mut data).unwrap();
        assert_eq!(data, PRELUDE);
        assert!(!data.is_empty());
    }
}
