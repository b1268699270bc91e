//! Row sets, filters and the row/cell model shared by every backend.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open row-key range: `start` is inclusive, `end` is exclusive.
///
/// An empty `end` means the range is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: String,
    pub end: String,
}

impl RowRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Whether `key` falls inside the range
    pub fn contains(&self, key: &str) -> bool {
        key >= self.start.as_str() && (self.end.is_empty() || key < self.end.as_str())
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Which rows a read should touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSet {
    /// Every row whose key starts with the prefix
    Prefix(String),
    /// A batch of exact row keys
    Keys(Vec<String>),
    /// Union of several key ranges
    Ranges(Vec<RowRange>),
}

impl fmt::Display for RowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowSet::Prefix(prefix) => write!(f, "prefix {:?}", prefix),
            RowSet::Keys(keys) => write!(f, "keys {:?}", keys),
            RowSet::Ranges(ranges) => {
                write!(f, "ranges ")?;
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", range)?;
                }
                Ok(())
            }
        }
    }
}

/// Server-side row filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowFilter {
    /// Keep everything
    PassAll,
    /// Keep the N most recent versions of every column
    LatestN(u32),
    /// Keep rows whose full key matches the regular expression
    RowKeyRegex(String),
    /// Apply every filter in order (logical AND)
    Chain(Vec<RowFilter>),
}

/// One versioned value under a (row, family, column) coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub column: String,
    /// Write timestamp in microseconds since the Unix epoch
    pub timestamp_micros: i64,
    pub value: Bytes,
}

/// Cells of a single column family, newest version first within a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// A row as returned by a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub families: Vec<Family>,
}

impl Row {
    /// Total number of cells across all families
    pub fn cell_count(&self) -> usize {
        self.families.iter().map(|f| f.cells.len()).sum()
    }
}
