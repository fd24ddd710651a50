//! `Model`, the document root, and the stream entry points.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use tracing::debug;

use crate::encoder::JsonEncoder;
use crate::error::{AstError, Result};
use crate::location::Location;
use crate::node::{decode_id_map, encode_id_map, Node, OpaqueNode, StringNode};
use crate::scanner::{ReadOptions, Scanner};
use crate::shape::Shape;
use crate::shape_id::AbsShapeId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model {
    pub version: StringNode,
    pub metadata: BTreeMap<String, OpaqueNode>,
    pub shapes: BTreeMap<AbsShapeId, Shape>,
    pub loc: Location,
}

impl Model {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: StringNode::new(version),
            ..Self::default()
        }
    }

    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Decodes a complete document held in memory.
    pub fn from_slice(data: &[u8]) -> Result<Model> {
        Self::from_slice_with(data, &ReadOptions::default())
    }

    pub fn from_slice_with(data: &[u8], options: &ReadOptions) -> Result<Model> {
        let mut s = Scanner::with_options(data, options);
        let model = Model::decode(&mut s)?;
        s.finish()?;
        Ok(model)
    }

    /// Encodes the model as compact JSON.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut enc = JsonEncoder::new();
        self.encode(&mut enc);
        enc.into_bytes()
    }
}

impl Node for Model {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let start = s.next_offset();
        let mut version = None;
        let mut metadata = BTreeMap::new();
        let mut shapes = BTreeMap::new();

        s.decode_object("model", |s, key, offset| {
            match key {
                "version" => version = Some(StringNode::decode(s)?),
                "metadata" => {
                    s.decode_object("metadata", |s, key, _| {
                        metadata.insert(key.to_string(), OpaqueNode::decode(s)?);
                        Ok(())
                    })?;
                }
                "shapes" => shapes = decode_id_map(s, "shapes")?,
                _ => {
                    return Err(AstError::UnsupportedKey {
                        entity: "model",
                        key: key.to_string(),
                        offset,
                    })
                }
            }
            Ok(())
        })?;

        Ok(Model {
            version: version.ok_or(AstError::MissingVersion { offset: start })?,
            metadata,
            shapes,
            loc: s.location(start),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.begin_object();
        enc.key("version");
        self.version.encode(enc);
        if !self.metadata.is_empty() {
            enc.key("metadata");
            enc.begin_object();
            for (key, value) in &self.metadata {
                enc.key(key);
                value.encode(enc);
            }
            enc.end_object();
        }
        if !self.shapes.is_empty() {
            enc.key("shapes");
            encode_id_map(enc, &self.shapes);
        }
        enc.end_object();
    }
}

/// Reads one model document from `reader`.
///
/// The stream is read to its end. Only whitespace may follow the model
/// value, so a stream carrying several concatenated documents is rejected
/// with [`AstError::MalformedJson`] at the start of the second one. Callers
/// that frame documents themselves should split the stream first and call
/// [`Model::from_slice`] per document.
pub fn read_model(reader: impl Read) -> Result<Model> {
    read_model_with(reader, &ReadOptions::default())
}

pub fn read_model_with(mut reader: impl Read, options: &ReadOptions) -> Result<Model> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    debug!(bytes = data.len(), path = ?options.path, "decoding model");
    match Model::from_slice_with(&data, options) {
        Ok(model) => {
            debug!(
                version = %model.version.value,
                shapes = model.shapes.len(),
                metadata = model.metadata.len(),
                "decoded model"
            );
            Ok(model)
        }
        Err(err) => {
            debug!(offset = ?err.offset(), error = %err, "model rejected");
            Err(err)
        }
    }
}

/// Writes `model` to `writer` as compact JSON with no trailing newline.
pub fn write_model(model: &Model, mut writer: impl Write) -> std::io::Result<()> {
    let bytes = model.to_vec();
    debug!(bytes = bytes.len(), shapes = model.shapes.len(), "encoding model");
    writer.write_all(&bytes)
}
