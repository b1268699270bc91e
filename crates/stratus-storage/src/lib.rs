//! Storage layer for Stratus.
//!
//! Stratus reads from a sparse wide-column store (Bigtable-style): tables of rows keyed
//! by strings, each row holding column families of versioned cells. This crate defines
//! the narrow read contract the query layer depends on, plus an in-memory backend used
//! by the server binary and the test suites.
//!
//! - [`store`] - `WideColumnStore` / `Table` traits and the row stream type
//! - [`types`] - row sets, row filters and the row/cell model
//! - [`memory`] - in-process backend with Bigtable-like read semantics
//! - [`fixture`] - JSON fixture loading for the in-memory backend

pub mod error;
pub mod fixture;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use fixture::FixtureCell;
pub use memory::MemoryStore;
pub use store::{RowStream, Table, WideColumnStore};
pub use types::{Cell, Family, Row, RowFilter, RowRange, RowSet};
