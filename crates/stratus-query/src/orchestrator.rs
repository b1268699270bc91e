//! Request orchestration: validation, access-pattern selection and response assembly.
//!
//! Validation runs in a fixed order and always finishes before the store is touched:
//! 1. `type` is mandatory;
//! 2. dates without an area are rejected;
//! 3. when more than one area or date is given (range mode) every date must be a full
//!    `YYYY-MM-DD HH:MM:SS` timestamp, since ranges compare the composite key bytes;
//! 4. the version filter must be a positive integer.
//!
//! A single area with at most one date, or no area and no date, is served by a prefix
//! scan over `type[/area[/date]]`; the date is then used verbatim, so a date-only value
//! selects a whole day.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stratus_storage::WideColumnStore;
use tracing::{debug, warn};

use crate::error::{QueryError, QueryResult};
use crate::filter::FilterSpec;
use crate::keys::{build_keys_or_ranges, build_prefix, KeySelector};
use crate::reader::read_records;
use crate::record::OutputRecord;

/// Layout every date must follow in range mode
pub const FULL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw query parameters of `GET /read/climate-data`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadParams {
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    pub area_id: Option<String>,
    pub date: Option<String>,
    pub version: Option<String>,
    pub regexp: Option<String>,
    pub count: Option<String>,
}

/// Which access pattern a request was dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    Prefix,
    Range,
}

/// Validated, store-ready description of a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPlan {
    pub mode: ReadMode,
    pub selector: KeySelector,
    pub filter: FilterSpec,
    pub include_count: bool,
}

/// Successful read payload
#[derive(Debug, Clone, Serialize)]
pub struct ReadResponse {
    pub status: &'static str,
    pub result: Vec<OutputRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ReadResponse {
    fn success(result: Vec<OutputRecord>, include_count: bool) -> Self {
        let count = include_count.then_some(result.len());
        Self {
            status: "success",
            result,
            count,
        }
    }
}

/// Serves climate-data reads against one table of an injected store.
pub struct ReadOrchestrator {
    store: Arc<dyn WideColumnStore>,
    table: String,
}

impl ReadOrchestrator {
    pub fn new(store: Arc<dyn WideColumnStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Validate the parameters and decide how the rows are addressed.
    pub fn plan(params: &ReadParams) -> QueryResult<ReadPlan> {
        let data_type = non_empty(&params.data_type).ok_or(QueryError::MissingType)?;
        let areas = split_list(&params.area_id);
        let dates = split_list(&params.date);

        if areas.is_empty() && !dates.is_empty() {
            return Err(QueryError::MissingArea);
        }

        let (mode, selector) = if areas.len() > 1 || dates.len() > 1 {
            if !dates.iter().all(|d| is_full_date(d)) {
                return Err(QueryError::IncompleteDate);
            }
            if dates.len() > 2 {
                warn!(
                    dates = dates.len(),
                    "only the first two dates bound a range; the rest are ignored"
                );
            }
            if dates.is_empty() {
                // Several areas and no date: one prefix per area, expressed as ranges.
                (ReadMode::Range, area_prefix_ranges(data_type, &areas))
            } else {
                (ReadMode::Range, build_keys_or_ranges(data_type, &areas, &dates))
            }
        } else {
            let mut parts = vec![data_type];
            if let [area] = areas.as_slice() {
                parts.push(*area);
                if let [date] = dates.as_slice() {
                    parts.push(*date);
                }
            }
            (ReadMode::Prefix, KeySelector::Prefix(build_prefix(&parts)))
        };

        let filter = FilterSpec::build(params.version.as_deref(), params.regexp.as_deref())?;

        Ok(ReadPlan {
            mode,
            selector,
            filter,
            include_count: params.count.as_deref() == Some("true"),
        })
    }

    /// Validate, read and assemble the response. Nothing is returned on partial failure.
    pub async fn execute(&self, params: &ReadParams) -> QueryResult<ReadResponse> {
        let plan = Self::plan(params)?;
        debug!(mode = ?plan.mode, selector = ?plan.selector, "read plan");

        let table = self.store.open_table(&self.table);
        let records = read_records(table.as_ref(), plan.selector, &plan.filter).await?;

        Ok(ReadResponse::success(records, plan.include_count))
    }
}

/// Full row-key prefixes for several areas with no date, as `[prefix/, prefix0)` ranges.
fn area_prefix_ranges(data_type: &str, areas: &[&str]) -> KeySelector {
    KeySelector::KeyRanges(
        areas
            .iter()
            .map(|area| {
                let prefix = build_prefix(&[data_type, *area]);
                // '0' is the byte right after '/', so this covers every key under prefix/
                (format!("{}/", prefix), format!("{}0", prefix))
            })
            .collect(),
    )
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Comma-separated entries, blanks dropped so they never reach key construction.
fn split_list(value: &Option<String>) -> Vec<&str> {
    match non_empty(value) {
        Some(list) => list.split(',').filter(|part| !part.is_empty()).collect(),
        None => Vec::new(),
    }
}

/// Whether `date` is a complete, zero-padded `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// Keys compare byte-wise, so only the fixed-width form orders correctly.
pub fn is_full_date(date: &str) -> bool {
    let fixed_width = date.len() == 19
        && date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            10 => b == b' ',
            13 | 16 => b == b':',
            _ => b.is_ascii_digit(),
        });
    if !fixed_width {
        return false;
    }
    match NaiveDateTime::parse_from_str(date, FULL_DATE_FORMAT) {
        // chrono reports a leap second as nanos past 1e9
        Ok(parsed) => parsed.nanosecond() < 1_000_000_000,
        Err(_) => false,
    }
}
