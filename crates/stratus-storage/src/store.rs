//! Read contract every wide-column backend implements.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::types::{Row, RowFilter, RowSet};

/// Lazy, finite, non-restartable stream of rows in store order.
pub type RowStream = BoxStream<'static, StoreResult<Row>>;

/// Handle to a wide-column store instance.
///
/// Implementations are shared across concurrent requests and must be cheap to clone
/// behind an `Arc`.
pub trait WideColumnStore: Send + Sync {
    /// Open a table by name. Opening never touches the network; a missing table is
    /// reported by the first read.
    fn open_table(&self, name: &str) -> Arc<dyn Table>;
}

/// A single table inside a store.
#[async_trait]
pub trait Table: Send + Sync {
    /// Table name
    fn name(&self) -> &str;

    /// Read the rows selected by `rows`, applying `filter` server-side.
    async fn read_rows(&self, rows: RowSet, filter: RowFilter) -> StoreResult<RowStream>;
}
