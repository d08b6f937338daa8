//! Case-insensitive substring filter over customer listings.
//!
//! # Responsibility
//! - Turn optional search criteria into a composed predicate.
//! - Apply the predicate over a full scan, preserving store order.
//!
//! # Invariants
//! - A criterion counts as present only when non-empty after trim.
//! - Present criteria compose with logical AND.
//! - Matching is substring, never prefix or exact.

use crate::model::customer::Customer;
use serde::{Deserialize, Serialize};

/// Optional substring criteria for narrowing a customer listing.
///
/// Absence of a field means "no filter on that field"; absence of both
/// returns the full unfiltered set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl CustomerSearch {
    /// Criteria matching every record.
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Returns whether any criterion is present (non-empty after trim).
    pub fn is_empty(&self) -> bool {
        present(&self.first_name).is_none() && present(&self.last_name).is_none()
    }

    /// Returns whether the record satisfies every present criterion.
    pub fn matches(&self, record: &Customer) -> bool {
        if let Some(criterion) = present(&self.first_name) {
            if !contains_insensitive(&record.first_name, criterion) {
                return false;
            }
        }
        if let Some(criterion) = present(&self.last_name) {
            if !contains_insensitive(&record.last_name, criterion) {
                return false;
            }
        }
        true
    }
}

fn present(criterion: &Option<String>) -> Option<&str> {
    criterion
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

fn contains_insensitive(field: &str, criterion: &str) -> bool {
    field
        .to_lowercase()
        .trim()
        .contains(criterion.to_lowercase().trim())
}

#[cfg(test)]
mod tests {
    use super::CustomerSearch;
    use crate::model::customer::Customer;
    use chrono::NaiveDate;

    fn customer(first: &str, last: &str) -> Customer {
        Customer::new(
            first,
            last,
            NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date"),
        )
    }

    fn search(first: Option<&str>, last: Option<&str>) -> CustomerSearch {
        CustomerSearch {
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn no_criteria_matches_everything() {
        let search = CustomerSearch::unfiltered();
        assert!(search.is_empty());
        assert!(search.matches(&customer("Allan", "Donald")));
    }

    #[test]
    fn whitespace_only_criterion_counts_as_absent() {
        let search = search(Some("   "), None);
        assert!(search.is_empty());
        assert!(search.matches(&customer("Kane", "Doe")));
    }

    #[test]
    fn matching_is_substring_and_case_insensitive() {
        let search = search(Some("AN"), None);
        assert!(search.matches(&customer("Allan", "Donald")));
        assert!(search.matches(&customer("Kane", "Doe")));
        assert!(!search.matches(&customer("John", "Doe")));
        assert!(search.matches(&customer("Jane", "Doe")));
    }

    #[test]
    fn criteria_are_trimmed_before_matching() {
        let search = search(Some("  allan  "), None);
        assert!(search.matches(&customer("Allan", "Donald")));
    }

    #[test]
    fn multiple_criteria_compose_with_and() {
        let search = search(Some("ane"), Some("do"));
        assert!(search.matches(&customer("Jane", "Doe")));
        assert!(!search.matches(&customer("Allan", "Donald")));
        assert!(!search.matches(&customer("Kane", "Smith")));
    }
}
