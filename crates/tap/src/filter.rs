//! Record matching for viewer subscriptions
//!
//! `matches` decides whether one log record is visible under one selector.
//! It only looks at metadata, never at the log body.
//!
//! # Filter Logic
//!
//! - Namespace must match exactly
//! - Empty pod/container/labels are wildcards (never "match nothing")
//! - Every label pair in the selector must be present on the record
//! - All constraints are AND'd
//!
//! # Example
//!
//! ```
//! use logurt_protocol::{FilterRequest, FilterSpec, LogRecord};
//! use logurt_tap::matches;
//!
//! let filter = FilterSpec::try_from(FilterRequest::new("prod")).unwrap();
//! let record = LogRecord::new("prod", "web-1", "app", "GET / 200");
//! assert!(matches(&filter, &record));
//! ```

use logurt_protocol::{FilterSpec, LogRecord};

/// Check if a record is visible under a selector
///
/// Pure and total. Checks run cheapest first and stop at the first
/// mismatch.
#[inline]
pub fn matches(filter: &FilterSpec, record: &LogRecord) -> bool {
    if filter.namespace() != record.namespace {
        return false;
    }

    if !filter.pod().is_empty() && filter.pod() != record.pod {
        return false;
    }

    if !filter.container().is_empty() && filter.container() != record.container {
        return false;
    }

    filter
        .labels()
        .iter()
        .all(|(key, value)| record.label(key) == Some(value.as_str()))
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
