//! Shared fixtures for the read API tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use stratus_query::{ReadApi, ReadApiConfig, ReadOrchestrator};
use stratus_storage::{
    MemoryStore, RowFilter, RowSet, RowStream, StoreError, StoreResult, Table, WideColumnStore,
};

pub const TABLE: &str = "climate_data";

/// One read the store saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRead {
    pub table: String,
    pub rows: RowSet,
    pub filter: RowFilter,
}

/// Store double that records every read and either delegates to a memory store or fails.
#[derive(Clone)]
pub struct RecordingStore {
    inner: MemoryStore,
    reads: Arc<Mutex<Vec<RecordedRead>>>,
    failure: Option<String>,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            reads: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(MemoryStore::new())
        }
    }

    pub fn reads(&self) -> Vec<RecordedRead> {
        self.reads.lock().clone()
    }
}

impl WideColumnStore for RecordingStore {
    fn open_table(&self, name: &str) -> Arc<dyn Table> {
        Arc::new(RecordingTable {
            name: name.to_string(),
            inner: self.inner.open_table(name),
            reads: self.reads.clone(),
            failure: self.failure.clone(),
        })
    }
}

struct RecordingTable {
    name: String,
    inner: Arc<dyn Table>,
    reads: Arc<Mutex<Vec<RecordedRead>>>,
    failure: Option<String>,
}

#[async_trait]
impl Table for RecordingTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_rows(&self, rows: RowSet, filter: RowFilter) -> StoreResult<RowStream> {
        self.reads.lock().push(RecordedRead {
            table: self.name.clone(),
            rows: rows.clone(),
            filter: filter.clone(),
        });
        if let Some(ref message) = self.failure {
            return Err(StoreError::Connection(message.clone()));
        }
        self.inner.read_rows(rows, filter).await
    }
}

/// Microseconds for a `YYYY-MM-DD HH:MM:SS` UTC timestamp
pub fn micros(ts: &str) -> i64 {
    chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
        .unwrap()
        .and_utc()
        .timestamp_micros()
}

/// Hourly weather rows for two days and three areas, three versions per cell, plus a
/// few rows of another data type.
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for area in ["A1", "A2", "A10"] {
        for day in ["2023-10-10", "2023-10-11"] {
            for hour in 0..24 {
                let date = format!("{} {:02}:00:00", day, hour);
                let key = format!("w/{}/{}", area, date);
                for (offset, value) in [(0, "v1"), (60, "v2"), (120, "v3")] {
                    let ts = micros(&date) + offset * 1_000_000;
                    store.put_cell(TABLE, &key, "cf", "temp", ts, value).await;
                }
                store
                    .put_cell(TABLE, &key, "cf", "humidity", micros(&date), "55")
                    .await;
            }
        }
    }
    for area in ["A1", "A2"] {
        let key = format!("p/{}/2023-10-10 00:00:00", area);
        store
            .put_cell(TABLE, &key, "cf", "pm25", micros("2023-10-10 00:00:00"), "12")
            .await;
    }
    store
}

pub fn router_for(store: Arc<dyn WideColumnStore>) -> axum::Router {
    let orchestrator = Arc::new(ReadOrchestrator::new(store, TABLE));
    ReadApi::new(ReadApiConfig::default(), orchestrator).router()
}
