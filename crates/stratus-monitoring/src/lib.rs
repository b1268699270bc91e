//! Monitoring and observability for Stratus.

pub mod tracing;

pub use crate::tracing::{build_filter, init_tracing, TracingConfig};
