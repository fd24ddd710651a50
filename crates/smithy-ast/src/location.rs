//! Source locations attached to every decoded node.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Where a node started in its source document.
///
/// `row` and `col` are 1-based; `col` counts bytes. A default `Location`
/// (all zero, no path) marks a node that was built in memory rather than
/// decoded.
///
/// Locations are diagnostics only. Two locations always compare equal, so a
/// model decoded from its own re-encoding is equal to the original even
/// though every offset moved.
#[derive(Debug, Clone, Default)]
pub struct Location {
    pub path: Option<Arc<str>>,
    pub offset: usize,
    pub row: usize,
    pub col: usize,
}

impl Location {
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.offset == 0 && self.row == 0 && self.col == 0
    }
}

impl PartialEq for Location {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

/// Byte offsets of every line start in a document.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(data: &[u8]) -> Self {
        let mut starts = vec![0];
        for (i, &b) in data.iter().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self { starts }
    }

    /// 1-based `(row, col)` for a byte offset.
    pub(crate) fn position(&self, offset: usize) -> (usize, usize) {
        let row = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[row - 1];
        (row, offset - line_start + 1)
    }
}
