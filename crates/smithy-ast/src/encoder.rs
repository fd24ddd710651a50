//! `JsonEncoder`: compact JSON writer used by every node's `encode`.
//!
//! Writes straight into a byte buffer. Object and array separators are
//! tracked on a small stack so callers only say where keys and elements go.

use crate::value::OpaqueValue;

pub struct JsonEncoder {
    out: Vec<u8>,
    // One entry per open object/array: true until its first entry is written.
    first: Vec<bool>,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self {
            out: Vec::new(),
            first: Vec::new(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    fn separator(&mut self) {
        if let Some(first) = self.first.last_mut() {
            if *first {
                *first = false;
            } else {
                self.out.push(b',');
            }
        }
    }

    pub fn begin_object(&mut self) {
        self.out.push(b'{');
        self.first.push(true);
    }

    pub fn end_object(&mut self) {
        self.first.pop();
        self.out.push(b'}');
    }

    pub fn begin_array(&mut self) {
        self.out.push(b'[');
        self.first.push(true);
    }

    pub fn end_array(&mut self) {
        self.first.pop();
        self.out.push(b']');
    }

    /// Writes an object key; the value written next belongs to it.
    pub fn key(&mut self, key: &str) {
        self.separator();
        self.write_str(key);
        self.out.push(b':');
    }

    /// Marks the start of the next array element.
    pub fn element(&mut self) {
        self.separator();
    }

    pub fn write_null(&mut self) {
        self.out.extend_from_slice(b"null");
    }

    pub fn write_bool(&mut self, b: bool) {
        self.out
            .extend_from_slice(if b { b"true".as_slice() } else { b"false".as_slice() });
    }

    pub fn write_i64(&mut self, n: i64) {
        self.out.extend_from_slice(n.to_string().as_bytes());
    }

    /// Writes a number literal verbatim.
    pub fn write_number_text(&mut self, text: &str) {
        self.out.extend_from_slice(text.as_bytes());
    }

    pub fn write_str(&mut self, s: &str) {
        self.out.push(b'"');
        let bytes = s.as_bytes();
        let mut last = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let esc: &[u8] = match b {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                0x08 => b"\\b",
                0x0c => b"\\f",
                0x00..=0x1f => {
                    self.out.extend_from_slice(&bytes[last..i]);
                    self.out
                        .extend_from_slice(format!("\\u{:04x}", b).as_bytes());
                    last = i + 1;
                    continue;
                }
                _ => continue,
            };
            self.out.extend_from_slice(&bytes[last..i]);
            self.out.extend_from_slice(esc);
            last = i + 1;
        }
        self.out.extend_from_slice(&bytes[last..]);
        self.out.push(b'"');
    }

    /// Writes an untyped value, keeping object key order and number text.
    pub fn write_value(&mut self, value: &OpaqueValue) {
        match value {
            OpaqueValue::Null => self.write_null(),
            OpaqueValue::Bool(b) => self.write_bool(*b),
            OpaqueValue::Number(text) => self.write_number_text(text),
            OpaqueValue::String(s) => self.write_str(s),
            OpaqueValue::Array(items) => {
                self.begin_array();
                for item in items {
                    self.element();
                    self.write_value(item);
                }
                self.end_array();
            }
            OpaqueValue::Object(map) => {
                self.begin_object();
                for (k, v) in map {
                    self.key(k);
                    self.write_value(v);
                }
                self.end_object();
            }
        }
    }
}
