//! Cell filter composition.
//!
//! Raw `version` / `regexp` query values are validated once into [`FilterOptions`] and then
//! expanded into an ordered [`FilterSpec`]: the version limit always comes first (defaulting
//! to the single most recent version), the row-key regexp second.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use stratus_storage::RowFilter;

use crate::error::{QueryError, QueryResult};

const WRONG_VERSION: &str = "wrong version filter";

/// Versions returned per (row, column) when the caller does not ask for more
pub const DEFAULT_LATEST_VERSIONS: u32 = 1;

/// Typed filter options, validated at the HTTP boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub latest_versions: Option<NonZeroU32>,
    pub key_regexp: Option<String>,
}

impl FilterOptions {
    /// Parse raw query values. Empty strings count as absent.
    pub fn parse(version: Option<&str>, regexp: Option<&str>) -> QueryResult<Self> {
        let latest_versions = match version.filter(|v| !v.is_empty()) {
            Some(raw) => Some(
                raw.parse::<NonZeroU32>()
                    .map_err(|_| QueryError::InvalidFilter(WRONG_VERSION.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            latest_versions,
            key_regexp: regexp.filter(|r| !r.is_empty()).map(str::to_string),
        })
    }
}

/// A single filter primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterPrimitive {
    LatestN(u32),
    KeyRegexp(String),
}

impl From<&FilterPrimitive> for RowFilter {
    fn from(primitive: &FilterPrimitive) -> Self {
        match primitive {
            FilterPrimitive::LatestN(n) => RowFilter::LatestN(*n),
            FilterPrimitive::KeyRegexp(pattern) => RowFilter::RowKeyRegex(pattern.clone()),
        }
    }
}

/// Ordered filter description; primitives are ANDed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    primitives: Vec<FilterPrimitive>,
}

impl FilterSpec {
    /// Build a filter spec straight from raw query values
    pub fn build(version: Option<&str>, regexp: Option<&str>) -> QueryResult<Self> {
        FilterOptions::parse(version, regexp).map(|options| Self::from_options(&options))
    }

    pub fn from_options(options: &FilterOptions) -> Self {
        let versions = options
            .latest_versions
            .map(NonZeroU32::get)
            .unwrap_or(DEFAULT_LATEST_VERSIONS);

        let mut primitives = vec![FilterPrimitive::LatestN(versions)];
        if let Some(ref pattern) = options.key_regexp {
            primitives.push(FilterPrimitive::KeyRegexp(pattern.clone()));
        }
        Self { primitives }
    }

    pub fn primitives(&self) -> &[FilterPrimitive] {
        &self.primitives
    }

    /// Versions kept per (row, column)
    pub fn latest_versions(&self) -> u32 {
        self.primitives
            .iter()
            .find_map(|p| match p {
                FilterPrimitive::LatestN(n) => Some(*n),
                _ => None,
            })
            .unwrap_or(DEFAULT_LATEST_VERSIONS)
    }

    /// Compose into the store's filter: a lone primitive as-is, several as a chain.
    pub fn to_row_filter(&self) -> RowFilter {
        match self.primitives.as_slice() {
            [] => RowFilter::PassAll,
            [single] => single.into(),
            many => RowFilter::Chain(many.iter().map(RowFilter::from).collect()),
        }
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::from_options(&FilterOptions::default())
    }
}
