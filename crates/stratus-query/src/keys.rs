//! Row-key and row-range construction.

use serde::{Deserialize, Serialize};
use stratus_storage::{RowRange, RowSet};

/// Separator between row-key segments
pub const KEY_SEPARATOR: char = '/';

/// How the rows of a request are addressed. Exactly one variant per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeySelector {
    Prefix(String),
    ExactKeys(Vec<String>),
    /// `(start, end)` pairs, start inclusive, end exclusive
    KeyRanges(Vec<(String, String)>),
}

impl From<KeySelector> for RowSet {
    fn from(selector: KeySelector) -> Self {
        match selector {
            KeySelector::Prefix(prefix) => RowSet::Prefix(prefix),
            KeySelector::ExactKeys(keys) => RowSet::Keys(keys),
            KeySelector::KeyRanges(ranges) => RowSet::Ranges(
                ranges
                    .into_iter()
                    .map(|(start, end)| RowRange::new(start, end))
                    .collect(),
            ),
        }
    }
}

/// Join the non-empty parts with `/`, in order, without a trailing separator.
pub fn build_prefix<S: AsRef<str>>(parts: &[S]) -> String {
    let mut prefix = String::new();
    for part in parts.iter().map(AsRef::as_ref).filter(|p| !p.is_empty()) {
        if !prefix.is_empty() {
            prefix.push(KEY_SEPARATOR);
        }
        prefix.push_str(part);
    }
    prefix
}

/// Full row key `<type>/<area>/<date>`. Every part is kept, so the key always has three segments.
pub fn row_key(data_type: &str, area: &str, date: &str) -> String {
    format!("{data_type}{KEY_SEPARATOR}{area}{KEY_SEPARATOR}{date}")
}

/// Exact keys for a single date, or one range per area when two or more dates are given.
///
/// Only the first two dates are used for ranges. `areas` must be non-empty and `dates`
/// must hold at least one entry; both are checked by the orchestrator.
pub fn build_keys_or_ranges<S: AsRef<str>>(data_type: &str, areas: &[S], dates: &[S]) -> KeySelector {
    match dates {
        [start, end, ..] => KeySelector::KeyRanges(
            areas
                .iter()
                .map(|area| {
                    (
                        row_key(data_type, area.as_ref(), start.as_ref()),
                        row_key(data_type, area.as_ref(), end.as_ref()),
                    )
                })
                .collect(),
        ),
        [date] => KeySelector::ExactKeys(
            areas
                .iter()
                .map(|area| row_key(data_type, area.as_ref(), date.as_ref()))
                .collect(),
        ),
        [] => KeySelector::ExactKeys(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_skips_empty_parts() {
        assert_eq!(build_prefix(&["w"]), "w");
        assert_eq!(build_prefix(&["w", "A1"]), "w/A1");
        assert_eq!(build_prefix(&["w", "", "2023-10-10"]), "w/2023-10-10");
        assert_eq!(build_prefix(&["", "A1", ""]), "A1");
        assert_eq!(build_prefix::<&str>(&[]), "");
    }

    #[test]
    fn test_key_splits_back_into_parts() {
        let key = row_key("w", "A327734", "2023-10-10 00:00:00");
        let parts: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        assert_eq!(parts, vec!["w", "A327734", "2023-10-10 00:00:00"]);
    }

    #[test]
    fn test_key_keeps_three_segments() {
        assert_eq!(row_key("w", "", "2023-10-10 00:00:00"), "w//2023-10-10 00:00:00");
        assert_eq!(row_key("w", "A1", "2023-10-10").split(KEY_SEPARATOR).count(), 3);
    }

    #[test]
    fn test_single_date_gives_exact_keys() {
        let selector = build_keys_or_ranges("w", &["A1", "A2"], &["2023-10-10 00:00:00"]);
        assert_eq!(
            selector,
            KeySelector::ExactKeys(vec![
                "w/A1/2023-10-10 00:00:00".into(),
                "w/A2/2023-10-10 00:00:00".into(),
            ])
        );
    }

    #[test]
    fn test_two_dates_give_one_range_per_area() {
        let selector = build_keys_or_ranges(
            "p",
            &["A1", "A2"],
            &["2023-10-10 00:00:00", "2023-10-11 00:00:00"],
        );
        assert_eq!(
            selector,
            KeySelector::KeyRanges(vec![
                (
                    "p/A1/2023-10-10 00:00:00".into(),
                    "p/A1/2023-10-11 00:00:00".into()
                ),
                (
                    "p/A2/2023-10-10 00:00:00".into(),
                    "p/A2/2023-10-11 00:00:00".into()
                ),
            ])
        );
    }

    #[test]
    fn test_extra_dates_are_ignored() {
        let selector = build_keys_or_ranges(
            "w",
            &["A1"],
            &["2023-10-10 00:00:00", "2023-10-11 00:00:00", "2023-10-12 00:00:00"],
        );
        assert_eq!(
            selector,
            KeySelector::KeyRanges(vec![(
                "w/A1/2023-10-10 00:00:00".into(),
                "w/A1/2023-10-11 00:00:00".into()
            )])
        );
    }

    #[test]
    fn test_selector_into_row_set() {
        let set: RowSet = KeySelector::KeyRanges(vec![("a".into(), "b".into())]).into();
        assert_eq!(set, RowSet::Ranges(vec![RowRange::new("a", "b")]));
        let set: RowSet = KeySelector::Prefix("w/A1".into()).into();
        assert_eq!(set, RowSet::Prefix("w/A1".into()));
    }
}
