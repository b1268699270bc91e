//! Query layer for Stratus.
//!
//! Turns the loosely structured parameters of a climate-data read (type, areas, dates,
//! version count, key regexp) into prefix scans, key batches or range scans against a
//! wide-column store, and flattens the returned cells into [`OutputRecord`]s.
//!
//! Row keys have the shape `<type>/<area>/<date>`.

pub mod api;
pub mod error;
pub mod filter;
pub mod keys;
pub mod orchestrator;
pub mod reader;
pub mod record;

pub use api::{ReadApi, ReadApiConfig};
pub use error::{QueryError, QueryResult};
pub use filter::{FilterOptions, FilterPrimitive, FilterSpec};
pub use keys::{build_keys_or_ranges, build_prefix, KeySelector};
pub use orchestrator::{ReadMode, ReadOrchestrator, ReadParams, ReadPlan, ReadResponse};
pub use reader::read_records;
pub use record::OutputRecord;
