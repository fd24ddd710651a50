//! Decoder, validator and canonical encoder for the Smithy JSON AST.
//!
//! [`read_model`] turns a JSON document into a typed [`Model`], rejecting
//! anything that is valid JSON but not a valid model (unknown or duplicate
//! keys, fields that do not belong to a shape's type, malformed shape
//! identifiers) with the byte offset of the problem. [`write_model`] writes a
//! model back out with a fixed key order, so a model re-read from its own
//! encoding compares equal to the original.
//!
//! ```
//! let model = smithy_ast::read_model(
//!     r#"{"version":"1.0","shapes":{"ns#Name":{"type":"string"}}}"#.as_bytes(),
//! )
//! .unwrap();
//! assert_eq!(model.shapes.len(), 1);
//!
//! let mut out = Vec::new();
//! smithy_ast::write_model(&model, &mut out).unwrap();
//! assert_eq!(smithy_ast::read_model(out.as_slice()).unwrap(), model);
//! ```

pub mod encoder;
pub mod error;
pub mod location;
pub mod member;
pub mod merge;
pub mod model;
pub mod node;
pub mod scanner;
pub mod shape;
pub mod shape_id;
pub mod traits;
pub mod value;

pub use encoder::JsonEncoder;
pub use error::{AstError, IdComponent, Result};
pub use location::Location;
pub use member::Member;
pub use merge::{merge_models, MergeConflict, MergeError};
pub use model::{read_model, read_model_with, write_model, Model};
pub use node::{
    from_json_str, to_json_string, BigDecimalNode, BoolNode, Int32Node, Int64Node, Node,
    OpaqueNode, StringNode,
};
pub use scanner::{ReadOptions, Scanner, DEFAULT_MAX_DEPTH};
pub use shape::{Shape, ShapeBody, ShapeType};
pub use shape_id::{AbsShapeId, AbsShapeIdNode};
pub use traits::{TraitKind, TraitMap, TraitValue};
pub use value::OpaqueValue;
