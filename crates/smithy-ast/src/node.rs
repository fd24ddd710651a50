//! The `Node` abstraction and the leaf value nodes.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use indexmap::IndexMap;

use crate::encoder::JsonEncoder;
use crate::error::{AstError, Result};
use crate::location::Location;
use crate::scanner::Scanner;
use crate::shape_id::AbsShapeId;
use crate::value::OpaqueValue;

/// An AST entity: it knows where it came from, and can read itself from a
/// scanner and write itself to an encoder.
pub trait Node: Sized {
    fn location(&self) -> &Location;

    fn decode(s: &mut Scanner<'_>) -> Result<Self>;

    fn encode(&self, enc: &mut JsonEncoder);
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringNode {
    pub value: String,
    pub loc: Location,
}

impl StringNode {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            loc: Location::default(),
        }
    }
}

impl Node for StringNode {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let (value, offset) = s.read_string("string")?;
        Ok(Self {
            value,
            loc: s.location(offset),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.write_str(&self.value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoolNode {
    pub value: bool,
    pub loc: Location,
}

impl BoolNode {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            loc: Location::default(),
        }
    }
}

impl Node for BoolNode {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let (value, offset) = s.read_bool()?;
        Ok(Self {
            value,
            loc: s.location(offset),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.write_bool(self.value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Int32Node {
    pub value: i32,
    pub loc: Location,
}

impl Int32Node {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            loc: Location::default(),
        }
    }
}

impl Node for Int32Node {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let (text, offset) = s.read_number("32-bit integer")?;
        let value = parse_integer::<i32>(text, offset, "32-bit integer")?;
        Ok(Self {
            value,
            loc: s.location(offset),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.write_i64(i64::from(self.value));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Int64Node {
    pub value: i64,
    pub loc: Location,
}

impl Int64Node {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            loc: Location::default(),
        }
    }
}

impl Node for Int64Node {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let (text, offset) = s.read_number("64-bit integer")?;
        let value = parse_integer::<i64>(text, offset, "64-bit integer")?;
        Ok(Self {
            value,
            loc: s.location(offset),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.write_i64(self.value);
    }
}

// Only plain decimal digits are integers; `1.0` and `1e3` are rejected.
fn parse_integer<T: FromStr>(text: &str, offset: usize, expected: &'static str) -> Result<T> {
    if text.contains(['.', 'e', 'E']) {
        return Err(AstError::InvalidValue { offset, expected });
    }
    text.parse::<T>()
        .map_err(|_| AstError::InvalidValue { offset, expected })
}

/// An arbitrary-precision decimal that re-encodes exactly as it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigDecimalNode {
    value: BigDecimal,
    text: String,
    pub loc: Location,
}

impl BigDecimalNode {
    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    /// The number exactly as it appears in JSON.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl FromStr for BigDecimalNode {
    type Err = AstError;

    /// Parses a JSON number literal.
    fn from_str(text: &str) -> Result<Self> {
        let mut s = Scanner::new(text.as_bytes());
        let node = Self::decode(&mut s)?;
        s.finish()?;
        Ok(Self {
            loc: Location::default(),
            ..node
        })
    }
}

impl Node for BigDecimalNode {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let (text, offset) = s.read_number("number")?;
        let value = BigDecimal::from_str(text).map_err(|_| AstError::InvalidValue {
            offset,
            expected: "decimal number",
        })?;
        Ok(Self {
            value,
            text: text.to_string(),
            loc: s.location(offset),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.write_number_text(&self.text);
    }
}

/// Any JSON value, kept untyped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpaqueNode {
    pub value: OpaqueValue,
    pub loc: Location,
}

impl OpaqueNode {
    pub fn new(value: impl Into<OpaqueValue>) -> Self {
        Self {
            value: value.into(),
            loc: Location::default(),
        }
    }
}

impl Node for OpaqueNode {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let offset = s.next_offset();
        let value = s.read_value()?;
        Ok(Self {
            value,
            loc: s.location(offset),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.write_value(&self.value);
    }
}

pub(crate) fn decode_list<T: Node>(s: &mut Scanner<'_>, name: &str) -> Result<Vec<T>> {
    let mut items = Vec::new();
    s.decode_array(name, |s, _| {
        items.push(T::decode(s)?);
        Ok(())
    })?;
    Ok(items)
}

pub(crate) fn encode_list<T: Node>(enc: &mut JsonEncoder, items: &[T]) {
    enc.begin_array();
    for item in items {
        enc.element();
        item.encode(enc);
    }
    enc.end_array();
}

/// Decodes an object with free-form string keys, keeping source order.
pub(crate) fn decode_map<T: Node>(s: &mut Scanner<'_>, name: &str) -> Result<IndexMap<String, T>> {
    let mut map = IndexMap::new();
    s.decode_object(name, |s, key, _| {
        let value = T::decode(s)?;
        map.insert(key.to_string(), value);
        Ok(())
    })?;
    Ok(map)
}

pub(crate) fn encode_map<'a, T: Node + 'a>(
    enc: &mut JsonEncoder,
    entries: impl IntoIterator<Item = (&'a String, &'a T)>,
) {
    enc.begin_object();
    for (key, value) in entries {
        enc.key(key);
        value.encode(enc);
    }
    enc.end_object();
}

/// Decodes an object keyed by absolute shape IDs.
pub(crate) fn decode_id_map<T: Node>(
    s: &mut Scanner<'_>,
    name: &str,
) -> Result<BTreeMap<AbsShapeId, T>> {
    let mut map = BTreeMap::new();
    s.decode_object(name, |s, key, offset| {
        let id = AbsShapeId::parse_at(key, offset)?;
        let value = T::decode(s)?;
        map.insert(id, value);
        Ok(())
    })?;
    Ok(map)
}

pub(crate) fn encode_id_map<T: Node>(enc: &mut JsonEncoder, map: &BTreeMap<AbsShapeId, T>) {
    enc.begin_object();
    for (id, value) in map {
        enc.key(id.as_str());
        value.encode(enc);
    }
    enc.end_object();
}

/// Encodes a single node to a JSON string.
pub fn to_json_string<T: Node>(node: &T) -> String {
    let mut enc = JsonEncoder::new();
    node.encode(&mut enc);
    // The encoder only ever writes UTF-8.
    String::from_utf8_lossy(&enc.into_bytes()).into_owned()
}

/// Decodes a single node from a complete JSON document.
pub fn from_json_str<T: Node>(json: &str) -> Result<T> {
    let mut s = Scanner::new(json.as_bytes());
    let node = T::decode(&mut s)?;
    s.finish()?;
    Ok(node)
}
