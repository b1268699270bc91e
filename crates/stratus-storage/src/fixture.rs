//! JSON fixtures for the in-memory store.
//!
//! A fixture file is a JSON array of cells:
//!
//! ```json
//! [
//!   {"table": "climate_data", "key": "w/A1/2023-10-10 00:00:00",
//!    "family": "cf", "column": "temp", "timestamp": "2023-10-10T00:05:00Z", "value": "21.4"}
//! ]
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryStore;

/// One cell version in a fixture file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCell {
    pub table: String,
    pub key: String,
    #[serde(default = "default_family")]
    pub family: String,
    pub column: String,
    pub timestamp: DateTime<Utc>,
    pub value: String,
}

fn default_family() -> String {
    "cf".to_string()
}

impl MemoryStore {
    /// Load every cell of a fixture file into the store. Returns the number of cells written.
    pub async fn load_fixture(&self, path: &Path) -> StoreResult<usize> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            StoreError::Fixture(format!("failed to read {}: {}", path.display(), e))
        })?;
        let cells: Vec<FixtureCell> = serde_json::from_str(&content)?;
        let count = self.load_cells(cells).await;
        info!(path = %path.display(), cells = count, "loaded store fixture");
        Ok(count)
    }

    /// Write a batch of fixture cells. Returns the number of cells written.
    pub async fn load_cells(&self, cells: Vec<FixtureCell>) -> usize {
        let count = cells.len();
        for cell in cells {
            self.put_cell(
                &cell.table,
                &cell.key,
                &cell.family,
                &cell.column,
                cell.timestamp.timestamp_micros(),
                cell.value,
            )
            .await;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"table": "climate_data", "key": "w/A1/2023-10-10 00:00:00", "column": "temp",
                  "timestamp": "2023-10-10T00:05:00Z", "value": "21.4"}},
                {{"table": "climate_data", "key": "w/A2/2023-10-10 00:00:00", "family": "obs",
                  "column": "temp", "timestamp": "2023-10-10T00:06:00Z", "value": "19.0"}}
            ]"#
        )
        .unwrap();

        let store = MemoryStore::new();
        let count = store.load_fixture(file.path()).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.row_count("climate_data").await, Some(2));
    }

    #[tokio::test]
    async fn test_malformed_fixture_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"not": "an array"}}"#).unwrap();

        let store = MemoryStore::new();
        let err = store.load_fixture(file.path()).await.unwrap_err();
        assert!(matches!(err, StoreError::Fixture(_)));
    }

    #[tokio::test]
    async fn test_missing_fixture_file() {
        let store = MemoryStore::new();
        let err = store
            .load_fixture(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Fixture(_)));
    }
}
