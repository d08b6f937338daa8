//! Boundary representations and field-by-field mapping.
//!
//! # Responsibility
//! - Define the full view and the create/update input shapes.
//! - Provide the four mapping directions between records and inputs.
//!
//! # Invariants
//! - Mapping is total and lossless for the declared field set.
//! - The merge direction never touches `id`.
//! - No mapping substitutes defaults; unset record fields stay unchanged.

use crate::model::customer::{check_fields, Customer, CustomerId, CustomerValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Externally visible representation of a persisted customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerView {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl From<&Customer> for CustomerView {
    fn from(record: &Customer) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            date_of_birth: record.date_of_birth,
        }
    }
}

/// Create/update input: record fields minus `id`.
///
/// One shape serves both directions; the store assigns identity for the
/// create direction and keeps it for the merge direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl CustomerDraft {
    /// Reverse mapping: seeds a patch sequence with the record's current
    /// field values.
    pub fn from_record(record: &Customer) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            date_of_birth: record.date_of_birth,
        }
    }

    /// Create direction: builds an unsaved record from this input.
    pub fn into_record(self) -> Customer {
        Customer::new(self.first_name, self.last_name, self.date_of_birth)
    }

    /// Merge direction: overwrites the data fields of an existing record
    /// in place, leaving `id` untouched.
    pub fn apply_to(&self, record: &mut Customer) {
        record.first_name = self.first_name.clone();
        record.last_name = self.last_name.clone();
        record.date_of_birth = self.date_of_birth;
    }

    /// Collects every violated constraint over the input fields.
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
