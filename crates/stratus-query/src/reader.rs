//! Row reader: executes a read and flattens rows into output records.

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use stratus_storage::{Row, RowSet, StoreError, StoreResult, Table};
use tracing::{debug, info};

use crate::filter::FilterSpec;
use crate::keys::KeySelector;
use crate::record::OutputRecord;

/// Read the rows addressed by `selector` and flatten every retained cell version.
///
/// Output order is the store's iteration order. Store errors are returned unchanged.
pub async fn read_records(
    table: &dyn Table,
    selector: KeySelector,
    filter: &FilterSpec,
) -> StoreResult<Vec<OutputRecord>> {
    let rows: RowSet = selector.into();
    info!("Reading from table {} with {}", table.name(), rows);

    let mut stream = table.read_rows(rows, filter.to_row_filter()).await?;

    let mut records = Vec::new();
    let mut row_count = 0usize;
    while let Some(row) = stream.try_next().await? {
        row_count += 1;
        flatten_row(row, &mut records)?;
    }

    debug!(
        table = table.name(),
        rows = row_count,
        records = records.len(),
        "read complete"
    );
    Ok(records)
}

fn flatten_row(row: Row, out: &mut Vec<OutputRecord>) -> StoreResult<()> {
    let Row { key, families } = row;
    for family in families {
        for cell in family.cells {
            let created = to_utc(cell.timestamp_micros).ok_or_else(|| StoreError::MalformedCell {
                key: key.clone(),
                reason: format!("timestamp {} out of range", cell.timestamp_micros),
            })?;
            out.push(OutputRecord {
                key: key.clone(),
                created,
                value: cell.value,
            });
        }
    }
    Ok(())
}

fn to_utc(timestamp_micros: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(timestamp_micros)
}
