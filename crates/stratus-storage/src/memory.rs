//! In-memory wide-column store.
//!
//! Rows are kept in key order and every column keeps its versions newest first, so reads
//! come back in the same order a Bigtable server would produce them. Row filters are
//! evaluated on the "server" side, mirroring the remote semantics:
//! - `LatestN(n)` keeps the n most recent versions of every column;
//! - `RowKeyRegex` must match the entire row key;
//! - rows left without cells after filtering are not returned.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{RowStream, Table, WideColumnStore};
use crate::types::{Cell, Family, Row, RowFilter, RowRange, RowSet};

#[derive(Debug, Clone)]
struct StoredCell {
    timestamp_micros: i64,
    value: Bytes,
}

/// column -> versions, newest first
type Columns = BTreeMap<String, Vec<StoredCell>>;
/// family -> columns
type RowData = BTreeMap<String, Columns>;
/// row key -> row
type TableData = BTreeMap<String, RowData>;

/// In-memory implementation of [`WideColumnStore`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, TableData>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table. Existing tables are left untouched.
    pub async fn create_table(&self, name: &str) {
        let mut tables = self.tables.write().await;
        tables.entry(name.to_string()).or_default();
    }

    /// Write one cell version, creating the table and row as needed.
    ///
    /// Writing the same (row, family, column, timestamp) twice replaces the value.
    pub async fn put_cell(
        &self,
        table: &str,
        key: &str,
        family: &str,
        column: &str,
        timestamp_micros: i64,
        value: impl Into<Bytes>,
    ) {
        let mut tables = self.tables.write().await;
        let versions = tables
            .entry(table.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
            .entry(family.to_string())
            .or_default()
            .entry(column.to_string())
            .or_default();

        let cell = StoredCell {
            timestamp_micros,
            value: value.into(),
        };
        match versions.iter_mut().find(|c| c.timestamp_micros == timestamp_micros) {
            Some(existing) => *existing = cell,
            None => {
                versions.push(cell);
                versions.sort_by(|a, b| b.timestamp_micros.cmp(&a.timestamp_micros));
            }
        }
    }

    /// Number of rows in a table, `None` if the table does not exist
    pub async fn row_count(&self, table: &str) -> Option<usize> {
        let tables = self.tables.read().await;
        tables.get(table).map(|t| t.len())
    }
}

impl WideColumnStore for MemoryStore {
    fn open_table(&self, name: &str) -> Arc<dyn Table> {
        Arc::new(MemoryTable {
            name: name.to_string(),
            tables: self.tables.clone(),
        })
    }
}

struct MemoryTable {
    name: String,
    tables: Arc<RwLock<HashMap<String, TableData>>>,
}

#[async_trait]
impl Table for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_rows(&self, rows: RowSet, filter: RowFilter) -> StoreResult<RowStream> {
        let compiled = CompiledFilter::compile(&filter)?;

        let tables = self.tables.read().await;
        let data = tables
            .get(&self.name)
            .ok_or_else(|| StoreError::TableNotFound(self.name.clone()))?;

        let selected = select_rows(data, &rows);
        let scanned = selected.len();
        let out: Vec<Row> = selected
            .into_iter()
            .filter_map(|(key, row)| {
                compiled
                    .apply(key, row.clone())
                    .and_then(|filtered| into_row(key, filtered))
            })
            .collect();

        debug!(
            table = %self.name,
            rows_scanned = scanned,
            rows_returned = out.len(),
            "memory store read"
        );

        Ok(stream::iter(out.into_iter().map(Ok)).boxed())
    }
}

/// Select candidate rows in key order without duplicates.
fn select_rows<'a>(data: &'a TableData, rows: &RowSet) -> Vec<(&'a str, &'a RowData)> {
    match rows {
        RowSet::Prefix(prefix) => data
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix.as_str()))
            .map(|(key, row)| (key.as_str(), row))
            .collect(),
        RowSet::Keys(keys) => {
            let mut found: BTreeMap<&str, &RowData> = BTreeMap::new();
            for key in keys {
                if let Some((k, row)) = data.get_key_value(key.as_str()) {
                    found.insert(k.as_str(), row);
                }
            }
            found.into_iter().collect()
        }
        RowSet::Ranges(ranges) => {
            let mut found: BTreeMap<&str, &RowData> = BTreeMap::new();
            for range in ranges {
                for (key, row) in scan_range(data, range) {
                    found.insert(key.as_str(), row);
                }
            }
            found.into_iter().collect()
        }
    }
}

fn scan_range<'a>(
    data: &'a TableData,
    range: &RowRange,
) -> Box<dyn Iterator<Item = (&'a String, &'a RowData)> + 'a> {
    if range.end.is_empty() {
        return Box::new(data.range::<str, _>((
            Bound::Included(range.start.as_str()),
            Bound::Unbounded,
        )));
    }
    // BTreeMap::range panics on inverted bounds
    if range.start > range.end {
        return Box::new(std::iter::empty());
    }
    Box::new(data.range::<str, _>((
        Bound::Included(range.start.as_str()),
        Bound::Excluded(range.end.as_str()),
    )))
}

fn into_row(key: &str, data: RowData) -> Option<Row> {
    let families: Vec<Family> = data
        .into_iter()
        .map(|(name, columns)| Family {
            name,
            cells: columns
                .into_iter()
                .flat_map(|(column, versions)| {
                    versions.into_iter().map(move |cell| Cell {
                        column: column.clone(),
                        timestamp_micros: cell.timestamp_micros,
                        value: cell.value,
                    })
                })
                .collect(),
        })
        .filter(|family| !family.cells.is_empty())
        .collect();

    if families.is_empty() {
        return None;
    }
    Some(Row {
        key: key.to_string(),
        families,
    })
}

/// Row filter ready for evaluation
enum CompiledFilter {
    PassAll,
    LatestN(usize),
    RowKeyRegex(Regex),
    Chain(Vec<CompiledFilter>),
}

impl CompiledFilter {
    fn compile(filter: &RowFilter) -> StoreResult<Self> {
        Ok(match filter {
            RowFilter::PassAll => CompiledFilter::PassAll,
            RowFilter::LatestN(0) => {
                return Err(StoreError::InvalidFilter(
                    "cells per column limit must be positive".to_string(),
                ))
            }
            RowFilter::LatestN(n) => CompiledFilter::LatestN(*n as usize),
            RowFilter::RowKeyRegex(pattern) => {
                let anchored = format!("^(?:{})$", pattern);
                let regex = Regex::new(&anchored).map_err(|e| {
                    StoreError::InvalidFilter(format!("row key regex {:?}: {}", pattern, e))
                })?;
                CompiledFilter::RowKeyRegex(regex)
            }
            RowFilter::Chain(filters) => CompiledFilter::Chain(
                filters
                    .iter()
                    .map(CompiledFilter::compile)
                    .collect::<StoreResult<Vec<_>>>()?,
            ),
        })
    }

    fn apply(&self, key: &str, mut row: RowData) -> Option<RowData> {
        match self {
            CompiledFilter::PassAll => Some(row),
            CompiledFilter::LatestN(n) => {
                for columns in row.values_mut() {
                    for versions in columns.values_mut() {
                        versions.truncate(*n);
                    }
                }
                Some(row)
            }
            CompiledFilter::RowKeyRegex(regex) => regex.is_match(key).then_some(row),
            CompiledFilter::Chain(filters) => {
                filters.iter().try_fold(row, |acc, filter| filter.apply(key, acc))
            }
        }
    }
}
