//! Customer record and field constraints.
//!
//! # Responsibility
//! - Define the persisted customer shape and its identity sentinel.
//! - Enforce field constraints as pure checks usable at every boundary.
//!
//! # Invariants
//! - `id` is assigned by the store on commit and never reused or rewritten.
//! - Name fields are non-empty after trim and at most 100 characters.
//! - `date_of_birth` lies within `[today - 150 years, today]`.

use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned integer identity.
pub type CustomerId = i64;

/// Sentinel for records that have not been through a committed insert yet.
pub const UNASSIGNED_ID: CustomerId = 0;

/// Maximum character length for name fields.
pub const NAME_MAX_CHARS: usize = 100;

/// How far back a plausible date of birth may lie, in years.
pub const DATE_OF_BIRTH_MAX_AGE_YEARS: u32 = 150;

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerValidationError {
    /// Required field is absent or blank after trim.
    MissingField(&'static str),
    /// Field exceeds its maximum character length.
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Date of birth falls outside the accepted calendar window.
    DateOutOfRange {
        value: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },
}

impl Display for CustomerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is missing"),
            Self::FieldTooLong { field, max, actual } => write!(
                f,
                "field `{field}` can have only {max} characters, got {actual}"
            ),
            Self::DateOutOfRange { value, min, max } => {
                write!(f, "date of birth {value} is out of range [{min}, {max}]")
            }
        }
    }
}

impl Error for CustomerValidationError {}

/// Canonical persisted customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Store-assigned identity; `UNASSIGNED_ID` until the first `save`.
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl Customer {
    /// Creates an unsaved record; the store assigns `id` on commit.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
        }
    }

    /// Returns whether the store has assigned this record an identity.
    pub fn has_assigned_id(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    /// Collects every violated constraint over the data fields.
    pub fn violations(&self) -> Vec<CustomerValidationError> {
        check_fields(&self.first_name, &self.last_name, self.date_of_birth)
    }

    /// Fails with the first violated constraint, if any.
    pub fn validate(&self) -> Result<(), CustomerValidationError> {
        match self.violations().into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}

/// Checks the shared field constraints over any customer-shaped input.
pub(crate) fn check_fields(
    first_name: &str,
    last_name: &str,
    date_of_birth: NaiveDate,
) -> Vec<CustomerValidationError> {
    let mut violations = Vec::new();

    if let Some(violation) = check_name("first_name", first_name) {
        violations.push(violation);
    }
    if let Some(violation) = check_name("last_name", last_name) {
        violations.push(violation);
    }
    if let Some(violation) = check_date_of_birth(date_of_birth) {
        violations.push(violation);
    }

    violations
}

fn check_name(field: &'static str, value: &str) -> Option<CustomerValidationError> {
    if value.trim().is_empty() {
        return Some(CustomerValidationError::MissingField(field));
    }

    let actual = value.chars().count();
    if actual > NAME_MAX_CHARS {
        return Some(CustomerValidationError::FieldTooLong {
            field,
            max: NAME_MAX_CHARS,
            actual,
        });
    }

    None
}

fn check_date_of_birth(value: NaiveDate) -> Option<CustomerValidationError> {
    let today = Local::now().date_naive();
    let min = today
        .checked_sub_months(Months::new(DATE_OF_BIRTH_MAX_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN);

    if value < min || value > today {
        return Some(CustomerValidationError::DateOutOfRange {
            value,
            min,
            max: today,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{Customer, CustomerValidationError, NAME_MAX_CHARS, UNASSIGNED_ID};
    use chrono::{Local, Months, NaiveDate};

    fn dob(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 6, 15).expect("valid date")
    }

    #[test]
    fn new_customer_has_no_assigned_id() {
        let customer = Customer::new("John", "Doe", dob(1990));
        assert_eq!(customer.id, UNASSIGNED_ID);
        assert!(!customer.has_assigned_id());
    }

    #[test]
    fn valid_customer_passes() {
        let customer = Customer::new("John", "Doe", dob(1990));
        assert!(customer.validate().is_ok());
        assert!(customer.violations().is_empty());
    }

    #[test]
    fn blank_names_are_missing_fields() {
        let customer = Customer::new("  ", "", dob(1990));
        let violations = customer.violations();
        assert_eq!(
            violations,
            vec![
                CustomerValidationError::MissingField("first_name"),
                CustomerValidationError::MissingField("last_name"),
            ]
        );
    }

    #[test]
    fn name_length_boundary_is_100_characters() {
        let at_limit = "x".repeat(NAME_MAX_CHARS);
        let over_limit = "x".repeat(NAME_MAX_CHARS + 1);

        assert!(Customer::new(at_limit, "Doe", dob(1990)).validate().is_ok());

        let err = Customer::new(over_limit, "Doe", dob(1990))
            .validate()
            .expect_err("101 characters must fail");
        assert!(matches!(
            err,
            CustomerValidationError::FieldTooLong {
                field: "first_name",
                max: 100,
                actual: 101,
            }
        ));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 100 two-byte characters stay within the limit.
        let umlauts = "ö".repeat(NAME_MAX_CHARS);
        assert!(Customer::new(umlauts, "Doe", dob(1990)).validate().is_ok());
    }

    #[test]
    fn future_date_of_birth_is_rejected() {
        let tomorrow = Local::now().date_naive().succ_opt().expect("valid date");
        let err = Customer::new("John", "Doe", tomorrow)
            .validate()
            .expect_err("future date must fail");
        assert!(matches!(err, CustomerValidationError::DateOutOfRange { .. }));
    }

    #[test]
    fn today_is_an_accepted_date_of_birth() {
        let today = Local::now().date_naive();
        assert!(Customer::new("New", "Born", today).validate().is_ok());
    }

    #[test]
    fn older_than_150_years_is_rejected() {
        let too_old = Local::now()
            .date_naive()
            .checked_sub_months(Months::new(151 * 12))
            .expect("valid date");
        let err = Customer::new("Old", "Timer", too_old)
            .validate()
            .expect_err("over 150 years must fail");
        assert!(matches!(err, CustomerValidationError::DateOutOfRange { .. }));
    }
}
