//! Flat output record.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// One (row, cell) pair returned by a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub key: String,
    pub created: DateTime<Utc>,
    #[serde(serialize_with = "serialize_value")]
    pub value: Bytes,
}

impl OutputRecord {
    /// Cell payload as text, replacing invalid UTF-8
    pub fn value_lossy(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

fn serialize_value<S: Serializer>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(value))
}
