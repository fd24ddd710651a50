//! `Scanner`: token-level JSON reader with byte offsets.
//!
//! Modelled on a hand-rolled JSON decoder: a byte slice plus a cursor `x`,
//! whitespace skipping, and escape decoding handed to `serde_json` only when
//! a string actually contains a backslash. On top of the raw reads it offers
//! the two structural primitives every AST node decodes through:
//! [`Scanner::decode_object`] and [`Scanner::decode_array`].

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{AstError, Result};
use crate::location::{LineIndex, Location};
use crate::value::OpaqueValue;

/// Default nesting limit for opaque values.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling a single decode.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Source path recorded in every decoded node's [`Location`].
    pub path: Option<String>,
    /// Maximum nesting of arrays/objects inside opaque values.
    pub max_depth: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            path: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

pub struct Scanner<'a> {
    data: &'a [u8],
    x: usize,
    lines: LineIndex,
    path: Option<Arc<str>>,
    max_depth: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, &ReadOptions::default())
    }

    pub fn with_options(data: &'a [u8], options: &ReadOptions) -> Self {
        Self {
            data,
            x: 0,
            lines: LineIndex::new(data),
            path: options.path.as_deref().map(Arc::from),
            max_depth: options.max_depth,
        }
    }

    /// Current cursor position.
    pub fn offset(&self) -> usize {
        self.x
    }

    /// Offset of the next token, after skipping whitespace.
    pub fn next_offset(&mut self) -> usize {
        self.skip_whitespace();
        self.x
    }

    pub fn location(&self, offset: usize) -> Location {
        let (row, col) = self.lines.position(offset);
        Location {
            path: self.path.clone(),
            offset,
            row,
            col,
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.x < self.data.len() {
            match self.data[self.x] {
                b' ' | b'\t' | b'\n' | b'\r' => self.x += 1,
                _ => break,
            }
        }
    }

    /// Fails unless only whitespace remains.
    pub fn finish(&mut self) -> Result<()> {
        let offset = self.next_offset();
        if offset < self.data.len() {
            return Err(AstError::MalformedJson {
                offset,
                reason: "trailing content after value",
            });
        }
        Ok(())
    }

    fn byte(&self, x: usize) -> Option<u8> {
        self.data.get(x).copied()
    }

    fn unexpected_end(&self) -> AstError {
        AstError::MalformedJson {
            offset: self.data.len(),
            reason: "unexpected end of input",
        }
    }

    /// Error for a value of the wrong kind at `offset`. Bytes that cannot
    /// start any JSON value are reported as malformed input instead.
    fn mismatch(&self, offset: usize, expected: &'static str) -> AstError {
        match self.byte(offset) {
            None => self.unexpected_end(),
            Some(b) if is_value_start(b) => AstError::TypeMismatch { offset, expected },
            Some(_) => AstError::MalformedJson {
                offset,
                reason: "invalid token",
            },
        }
    }

    fn expect_open(&mut self, open: u8, name: &str) -> Result<()> {
        let offset = self.next_offset();
        match self.byte(offset) {
            Some(b) if b == open => {
                self.x += 1;
                Ok(())
            }
            Some(b) if is_value_start(b) => Err(AstError::Syntax {
                offset,
                expected: format!("'{}' to start {}", open as char, name),
            }),
            Some(_) => Err(AstError::MalformedJson {
                offset,
                reason: "invalid token",
            }),
            None => Err(self.unexpected_end()),
        }
    }

    /// Decodes one JSON object, calling `f` with each key, the key's offset,
    /// and the scanner positioned at the value. `f` must consume exactly one
    /// value. Repeated keys are rejected before `f` sees them.
    pub fn decode_object<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self, &str, usize) -> Result<()>,
    {
        self.expect_open(b'{', name)?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut first = true;
        loop {
            let offset = self.next_offset();
            match self.byte(offset) {
                None => return Err(self.unexpected_end()),
                Some(b'}') => {
                    self.x += 1;
                    return Ok(());
                }
                Some(b',') if !first => self.x += 1,
                Some(_) if !first => {
                    return Err(AstError::MalformedJson {
                        offset,
                        reason: "expected ',' or '}' after object entry",
                    })
                }
                Some(_) => {}
            }

            let key_offset = self.next_offset();
            let key = match self.byte(key_offset) {
                Some(b'"') => self.read_str()?,
                None => return Err(self.unexpected_end()),
                Some(b) if is_value_start(b) => {
                    return Err(AstError::Syntax {
                        offset: key_offset,
                        expected: format!("string key within {name}"),
                    })
                }
                Some(_) => {
                    return Err(AstError::MalformedJson {
                        offset: key_offset,
                        reason: "expected object key",
                    })
                }
            };

            let colon = self.next_offset();
            if self.byte(colon) != Some(b':') {
                return Err(AstError::MalformedJson {
                    offset: colon,
                    reason: "expected ':' after object key",
                });
            }
            self.x += 1;

            if !seen.insert(key.clone()) {
                return Err(AstError::DuplicateKey {
                    key,
                    offset: key_offset,
                });
            }
            f(self, &key, key_offset)?;
            first = false;
        }
    }

    /// Decodes one JSON array, calling `f` with the zero-based index of
    /// each element and the scanner positioned at it.
    pub fn decode_array<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self, usize) -> Result<()>,
    {
        self.expect_open(b'[', name)?;
        let mut index = 0;
        loop {
            let offset = self.next_offset();
            match self.byte(offset) {
                None => return Err(self.unexpected_end()),
                Some(b']') => {
                    self.x += 1;
                    return Ok(());
                }
                Some(b',') if index > 0 => self.x += 1,
                Some(_) if index > 0 => {
                    return Err(AstError::MalformedJson {
                        offset,
                        reason: "expected ',' or ']' after array element",
                    })
                }
                Some(_) => {}
            }
            f(self, index)?;
            index += 1;
        }
    }

    /// Reads a string value, returning it with its starting offset.
    pub fn read_string(&mut self, expected: &'static str) -> Result<(String, usize)> {
        let offset = self.next_offset();
        if self.byte(offset) != Some(b'"') {
            return Err(self.mismatch(offset, expected));
        }
        Ok((self.read_str()?, offset))
    }

    pub fn read_bool(&mut self) -> Result<(bool, usize)> {
        let offset = self.next_offset();
        match self.byte(offset) {
            Some(b't') => {
                self.literal(b"true")?;
                Ok((true, offset))
            }
            Some(b'f') => {
                self.literal(b"false")?;
                Ok((false, offset))
            }
            _ => Err(self.mismatch(offset, "boolean")),
        }
    }

    /// Reads a number literal and returns its exact source text.
    pub fn read_number(&mut self, expected: &'static str) -> Result<(&'a str, usize)> {
        let offset = self.next_offset();
        match self.byte(offset) {
            Some(b'-' | b'0'..=b'9') => {}
            _ => return Err(self.mismatch(offset, expected)),
        }
        let end = self.scan_number(offset)?;
        self.x = end;
        let data = self.data;
        // Number literals are pure ASCII once scanned.
        let text = std::str::from_utf8(&data[offset..end]).map_err(|_| AstError::MalformedJson {
            offset,
            reason: "invalid number",
        })?;
        Ok((text, offset))
    }

    /// Reads any JSON value without interpreting it.
    pub fn read_value(&mut self) -> Result<OpaqueValue> {
        self.read_value_at_depth(0)
    }

    fn read_value_at_depth(&mut self, depth: usize) -> Result<OpaqueValue> {
        let offset = self.next_offset();
        match self.byte(offset) {
            None => Err(self.unexpected_end()),
            Some(b'"') => Ok(OpaqueValue::String(self.read_str()?)),
            Some(b't' | b'f') => Ok(OpaqueValue::Bool(self.read_bool()?.0)),
            Some(b'n') => {
                self.literal(b"null")?;
                Ok(OpaqueValue::Null)
            }
            Some(b'-' | b'0'..=b'9') => {
                let (text, _) = self.read_number("number")?;
                Ok(OpaqueValue::Number(text.to_string()))
            }
            Some(b'{' | b'[') if depth >= self.max_depth => Err(AstError::DepthLimit {
                offset,
                limit: self.max_depth,
            }),
            Some(b'{') => {
                let mut map = IndexMap::new();
                self.decode_object("value", |s, key, _| {
                    let v = s.read_value_at_depth(depth + 1)?;
                    map.insert(key.to_string(), v);
                    Ok(())
                })?;
                Ok(OpaqueValue::Object(map))
            }
            Some(b'[') => {
                let mut items = Vec::new();
                self.decode_array("value", |s, _| {
                    items.push(s.read_value_at_depth(depth + 1)?);
                    Ok(())
                })?;
                Ok(OpaqueValue::Array(items))
            }
            Some(_) => Err(AstError::MalformedJson {
                offset,
                reason: "invalid token",
            }),
        }
    }

    fn literal(&mut self, word: &[u8]) -> Result<()> {
        if !self.data[self.x..].starts_with(word) {
            return Err(AstError::MalformedJson {
                offset: self.x,
                reason: "invalid literal",
            });
        }
        self.x += word.len();
        Ok(())
    }

    fn scan_number(&self, start: usize) -> Result<usize> {
        let invalid = |offset| AstError::MalformedJson {
            offset,
            reason: "invalid number",
        };
        let is_digit = |x: usize| matches!(self.byte(x), Some(b'0'..=b'9'));
        let mut x = start;
        if self.byte(x) == Some(b'-') {
            x += 1;
        }
        match self.byte(x) {
            Some(b'0') => x += 1,
            Some(b'1'..=b'9') => {
                while is_digit(x) {
                    x += 1;
                }
            }
            _ => return Err(invalid(x)),
        }
        if self.byte(x) == Some(b'.') {
            x += 1;
            if !is_digit(x) {
                return Err(invalid(x));
            }
            while is_digit(x) {
                x += 1;
            }
        }
        if matches!(self.byte(x), Some(b'e' | b'E')) {
            x += 1;
            if matches!(self.byte(x), Some(b'+' | b'-')) {
                x += 1;
            }
            if !is_digit(x) {
                return Err(invalid(x));
            }
            while is_digit(x) {
                x += 1;
            }
        }
        Ok(x)
    }

    /// Reads a quoted string at the cursor.
    fn read_str(&mut self) -> Result<String> {
        let start = self.x;
        let end = self.find_ending_quote(start + 1)?;
        let body = &self.data[start + 1..end];
        let s = if body.contains(&b'\\') {
            serde_json::from_slice::<String>(&self.data[start..=end]).map_err(|_| {
                AstError::MalformedJson {
                    offset: start,
                    reason: "invalid escape sequence",
                }
            })?
        } else {
            std::str::from_utf8(body)
                .map_err(|_| AstError::MalformedJson {
                    offset: start,
                    reason: "invalid UTF-8 in string",
                })?
                .to_string()
        };
        self.x = end + 1;
        Ok(s)
    }

    fn find_ending_quote(&self, from: usize) -> Result<usize> {
        let mut x = from;
        while let Some(b) = self.byte(x) {
            match b {
                b'"' => return Ok(x),
                b'\\' => x += 2,
                0x00..=0x1f => {
                    return Err(AstError::MalformedJson {
                        offset: x,
                        reason: "control character in string",
                    })
                }
                _ => x += 1,
            }
        }
        Err(AstError::MalformedJson {
            offset: from - 1,
            reason: "unterminated string",
        })
    }
}

fn is_value_start(b: u8) -> bool {
    matches!(b, b'"' | b'{' | b'[' | b'-' | b'0'..=b'9' | b't' | b'f' | b'n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys_of(input: &str) -> Result<Vec<(String, usize)>> {
        let mut s = Scanner::new(input.as_bytes());
        let mut keys = Vec::new();
        s.decode_object("test", |s, key, offset| {
            keys.push((key.to_string(), offset));
            s.read_value().map(|_| ())
        })?;
        s.finish()?;
        Ok(keys)
    }

    #[test]
    fn object_keys_and_offsets() {
        let keys = keys_of(r#"{"a": 1, "bb" : [true]}"#).unwrap();
        assert_eq!(keys, vec![("a".to_string(), 1), ("bb".to_string(), 9)]);
    }

    #[test]
    fn empty_object() {
        assert!(keys_of(" { } ").unwrap().is_empty());
    }

    #[test]
    fn duplicate_key_reports_second_offset() {
        let err = keys_of(r#"{"version":"1.0","version":"2.0"}"#).unwrap_err();
        match err {
            AstError::DuplicateKey { key, offset } => {
                assert_eq!(key, "version");
                assert_eq!(offset, 17);
            }
            other => panic!("expected duplicate key, got {other:?}"),
        }
    }

    #[test]
    fn non_object_is_syntax_violation() {
        let err = keys_of("[1]").unwrap_err();
        assert!(matches!(err, AstError::Syntax { offset: 0, .. }));
    }

    #[test]
    fn non_string_key_is_syntax_violation() {
        let err = keys_of("{1: 2}").unwrap_err();
        assert!(matches!(err, AstError::Syntax { offset: 1, .. }));
    }

    #[test]
    fn malformed_inputs() {
        for input in [
            "",
            "{",
            r#"{"a" 1}"#,
            r#"{"a":1 "b":2}"#,
            r#"{"a":1,}"#,
            r#"{"a":tru}"#,
            r#"{"a":"x"#,
            r#"{"a":1} x"#,
            r#"{"a":01}"#,
            r#"{"a":1.}"#,
        ] {
            let err = keys_of(input).unwrap_err();
            assert!(err.is_malformed_json(), "{input:?} gave {err:?}");
        }
    }

    #[test]
    fn callback_error_aborts() {
        let mut s = Scanner::new(br#"{"a":1,"b":2}"#);
        let mut calls = 0;
        let err = s
            .decode_object("test", |_, key, offset| {
                calls += 1;
                Err(AstError::UnsupportedKey {
                    entity: "test",
                    key: key.to_string(),
                    offset,
                })
            })
            .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, AstError::UnsupportedKey { offset: 1, .. }));
    }

    #[test]
    fn array_indices() {
        let mut s = Scanner::new(b"[ \"x\", \"y\" ,\"z\"]");
        let mut seen = Vec::new();
        s.decode_array("list", |s, index| {
            let (v, _) = s.read_string("string")?;
            seen.push((index, v));
            Ok(())
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![(0, "x".to_string()), (1, "y".to_string()), (2, "z".to_string())]
        );
    }

    #[test]
    fn array_trailing_comma_is_malformed() {
        let mut s = Scanner::new(b"[1,]");
        let err = s.decode_array("list", |s, _| s.read_value().map(|_| ())).unwrap_err();
        assert!(err.is_malformed_json());
    }

    #[test]
    fn leaf_mismatch_carries_offset() {
        let mut s = Scanner::new(b"  42");
        let err = s.read_string("string").unwrap_err();
        assert!(matches!(
            err,
            AstError::TypeMismatch {
                offset: 2,
                expected: "string"
            }
        ));
    }

    #[test]
    fn strings_with_escapes() {
        let mut s = Scanner::new(r#""a\"bé\n""#.as_bytes());
        let (v, _) = s.read_string("string").unwrap();
        assert_eq!(v, "a\"b\u{e9}\n");
    }

    #[test]
    fn number_text_is_exact() {
        let mut s = Scanner::new(b"-12.500e+3");
        let (text, offset) = s.read_number("number").unwrap();
        assert_eq!(text, "-12.500e+3");
        assert_eq!(offset, 0);
    }

    #[test]
    fn opaque_values_keep_order_and_precision() {
        let mut s = Scanner::new(br#"{"z":1.50,"a":[null,false,{"k":"v"}],"big":123456789012345678901234567890}"#);
        let v = s.read_value().unwrap();
        let keys: Vec<&String> = match &v {
            OpaqueValue::Object(map) => map.keys().collect(),
            other => panic!("expected an object, got {other:?}"),
        };
        assert_eq!(keys, vec!["z", "a", "big"]);
        assert_eq!(v.get("z").and_then(OpaqueValue::as_number_text), Some("1.50"));
        assert_eq!(
            v.get("big").and_then(OpaqueValue::as_number_text),
            Some("123456789012345678901234567890")
        );
        assert_eq!(v.get("a"), Some(&OpaqueValue::from(json!([null, false, {"k": "v"}]))));
    }

    #[test]
    fn opaque_numbers_keep_their_literal_form() {
        let mut s = Scanner::new(b"[1e2, 1E+2, -0, 2.50, 1e-7]");
        let v = s.read_value().unwrap();
        let texts: Vec<&str> = match &v {
            OpaqueValue::Array(items) => items.iter().filter_map(OpaqueValue::as_number_text).collect(),
            other => panic!("expected an array, got {other:?}"),
        };
        assert_eq!(texts, vec!["1e2", "1E+2", "-0", "2.50", "1e-7"]);
    }

    #[test]
    fn opaque_depth_is_limited() {
        let options = ReadOptions {
            max_depth: 2,
            ..ReadOptions::default()
        };
        let mut s = Scanner::with_options(b"[[[1]]]", &options);
        let err = s.read_value().unwrap_err();
        assert!(matches!(err, AstError::DepthLimit { offset: 2, limit: 2 }));
    }

    #[test]
    fn locations_have_rows_and_paths() {
        let options = ReadOptions {
            path: Some("model.json".into()),
            ..ReadOptions::default()
        };
        let s = Scanner::with_options(b"{\n  \"a\": 1\n}", &options);
        let loc = s.location(4);
        assert_eq!(loc.path.as_deref(), Some("model.json"));
        assert_eq!((loc.offset, loc.row, loc.col), (4, 2, 3));
    }
}
