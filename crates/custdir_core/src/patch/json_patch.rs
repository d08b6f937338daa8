//! JSON-patch style interpreter over customer update inputs.
//!
//! # Responsibility
//! - Apply {add, remove, replace, move, copy, test} operations to a
//!   working copy seeded from a record's current values.
//! - Reject unknown field paths and failed `test` operations hard.
//!
//! # Invariants
//! - Operations apply strictly in sequence; each observes the cumulative
//!   effect of prior operations in the same request.
//! - Any failure discards the whole sequence; callers re-validate before
//!   merging the result back onto a record.

use crate::model::customer::CustomerValidationError;
use crate::model::representation::CustomerDraft;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PATH_FIRST_NAME: &str = "/first_name";
const PATH_LAST_NAME: &str = "/last_name";
const PATH_DATE_OF_BIRTH: &str = "/date_of_birth";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type PatchResult<T> = Result<T, PatchError>;

/// Malformed or non-applicable patch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// Operation targets a path outside the update-input shape.
    UnknownPath(String),
    /// `add`/`replace`/`test` without the required `value` member, or
    /// `move`/`copy` without `from`.
    MissingValue { op: &'static str, path: String },
    /// Value cannot be interpreted for the targeted field.
    InvalidValue { path: String, message: String },
    /// `move`/`copy`/`test` read a field that holds no value.
    NoValueAtPath(String),
    /// `test` compared unequal; the whole sequence is discarded.
    TestFailed { path: String },
}

impl Display for PatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPath(path) => write!(f, "unknown patch path `{path}`"),
            Self::MissingValue { op, path } => {
                write!(f, "patch op `{op}` on `{path}` is missing its value")
            }
            Self::InvalidValue { path, message } => {
                write!(f, "invalid patch value for `{path}`: {message}")
            }
            Self::NoValueAtPath(path) => write!(f, "no value at patch path `{path}`"),
            Self::TestFailed { path } => write!(f, "patch test failed at `{path}`"),
        }
    }
}

impl Error for PatchError {}

/// Operation kind; closed set, serde-compatible with the RFC 6902 shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl PatchKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Test => "test",
        }
    }
}

/// One step of a partial-update sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Working copy of an update input during patch application.
///
/// Fields are optional so `remove` is expressible mid-sequence; converting
/// back to a draft re-imposes the required-field constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchTarget {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl PatchTarget {
    /// Seeds the working copy from a record's current update input.
    pub fn from_draft(draft: &CustomerDraft) -> Self {
        Self {
            first_name: Some(draft.first_name.clone()),
            last_name: Some(draft.last_name.clone()),
            date_of_birth: Some(draft.date_of_birth),
        }
    }

    /// Converts back to an update input; a field left unset by the patch
    /// sequence violates the required-field constraint.
    pub fn into_draft(self) -> Result<CustomerDraft, CustomerValidationError> {
        let first_name = self
            .first_name
            .ok_or(CustomerValidationError::MissingField("first_name"))?;
        let last_name = self
            .last_name
            .ok_or(CustomerValidationError::MissingField("last_name"))?;
        let date_of_birth = self
            .date_of_birth
            .ok_or(CustomerValidationError::MissingField("date_of_birth"))?;

        Ok(CustomerDraft {
            first_name,
            last_name,
            date_of_birth,
        })
    }

    fn read(&self, path: &str) -> PatchResult<Option<Value>> {
        match path {
            PATH_FIRST_NAME => Ok(self.first_name.clone().map(Value::String)),
            PATH_LAST_NAME => Ok(self.last_name.clone().map(Value::String)),
            PATH_DATE_OF_BIRTH => Ok(self
                .date_of_birth
                .map(|date| Value::String(date.format(DATE_FORMAT).to_string()))),
            other => Err(PatchError::UnknownPath(other.to_string())),
        }
    }

    fn write(&mut self, path: &str, value: Option<Value>) -> PatchResult<()> {
        match path {
            PATH_FIRST_NAME => {
                self.first_name = value.map(|v| parse_string(path, v)).transpose()?;
            }
            PATH_LAST_NAME => {
                self.last_name = value.map(|v| parse_string(path, v)).transpose()?;
            }
            PATH_DATE_OF_BIRTH => {
                self.date_of_birth = value.map(|v| parse_date(path, v)).transpose()?;
            }
            other => return Err(PatchError::UnknownPath(other.to_string())),
        }
        Ok(())
    }
}

/// Applies the operation sequence to a working copy seeded from `seed`.
///
/// Returns the patched working copy, or the first failure; the seed and the
/// underlying record stay untouched either way.
pub fn apply_operations(
    seed: &CustomerDraft,
    operations: &[PatchOperation],
) -> PatchResult<PatchTarget> {
    let mut target = PatchTarget::from_draft(seed);

    for operation in operations {
        apply_one(&mut target, operation)?;
    }

    Ok(target)
}

fn apply_one(target: &mut PatchTarget, operation: &PatchOperation) -> PatchResult<()> {
    match operation.op {
        PatchKind::Add | PatchKind::Replace => {
            let value = require_value(operation)?;
            target.write(&operation.path, Some(value))
        }
        PatchKind::Remove => target.write(&operation.path, None),
        PatchKind::Move => {
            let from = require_from(operation)?;
            let value = read_existing(target, &from)?;
            target.write(&from, None)?;
            target.write(&operation.path, Some(value))
        }
        PatchKind::Copy => {
            let from = require_from(operation)?;
            let value = read_existing(target, &from)?;
            target.write(&operation.path, Some(value))
        }
        PatchKind::Test => {
            let expected = require_value(operation)?;
            let actual = read_existing(target, &operation.path)?;
            if actual != expected {
                return Err(PatchError::TestFailed {
                    path: operation.path.clone(),
                });
            }
            Ok(())
        }
    }
}

fn require_value(operation: &PatchOperation) -> PatchResult<Value> {
    operation.value.clone().ok_or(PatchError::MissingValue {
        op: operation.op.as_str(),
        path: operation.path.clone(),
    })
}

fn require_from(operation: &PatchOperation) -> PatchResult<String> {
    operation.from.clone().ok_or(PatchError::MissingValue {
        op: operation.op.as_str(),
        path: operation.path.clone(),
    })
}

fn read_existing(target: &PatchTarget, path: &str) -> PatchResult<Value> {
    target
        .read(path)?
        .ok_or_else(|| PatchError::NoValueAtPath(path.to_string()))
}

fn parse_string(path: &str, value: Value) -> PatchResult<String> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(PatchError::InvalidValue {
            path: path.to_string(),
            message: format!("expected a string, got {other}"),
        }),
    }
}

fn parse_date(path: &str, value: Value) -> PatchResult<NaiveDate> {
    let text = parse_string(path, value)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|err| PatchError::InvalidValue {
        path: path.to_string(),
        message: format!("expected a {DATE_FORMAT} date, got `{text}`: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::{apply_operations, PatchError, PatchKind, PatchOperation};
    use crate::model::representation::CustomerDraft;
    use chrono::NaiveDate;
    use serde_json::json;

    fn seed() -> CustomerDraft {
        CustomerDraft {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date"),
        }
    }

    fn op(kind: PatchKind, path: &str) -> PatchOperation {
        PatchOperation {
            op: kind,
            path: path.to_string(),
            from: None,
            value: None,
        }
    }

    #[test]
    fn replace_sets_the_targeted_field() {
        let mut replace = op(PatchKind::Replace, "/first_name");
        replace.value = Some(json!("Janet"));

        let target = apply_operations(&seed(), &[replace]).expect("patch applies");
        assert_eq!(target.first_name.as_deref(), Some("Janet"));
        assert_eq!(target.last_name.as_deref(), Some("Doe"));
    }

    #[test]
    fn operations_observe_prior_effects_in_sequence() {
        let mut first = op(PatchKind::Replace, "/first_name");
        first.value = Some(json!("Janet"));
        let mut second = op(PatchKind::Test, "/first_name");
        second.value = Some(json!("Janet"));

        assert!(apply_operations(&seed(), &[first, second]).is_ok());
    }

    #[test]
    fn remove_unsets_and_into_draft_reports_missing_field() {
        let remove = op(PatchKind::Remove, "/first_name");
        let target = apply_operations(&seed(), &[remove]).expect("remove applies");
        assert!(target.first_name.is_none());

        let err = target.into_draft().expect_err("missing field must fail");
        assert_eq!(
            err,
            crate::model::customer::CustomerValidationError::MissingField("first_name")
        );
    }

    #[test]
    fn move_transfers_value_and_unsets_source() {
        let mut mv = op(PatchKind::Move, "/last_name");
        mv.from = Some("/first_name".to_string());

        let target = apply_operations(&seed(), &[mv]).expect("move applies");
        assert!(target.first_name.is_none());
        assert_eq!(target.last_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn copy_keeps_the_source() {
        let mut cp = op(PatchKind::Copy, "/last_name");
        cp.from = Some("/first_name".to_string());

        let target = apply_operations(&seed(), &[cp]).expect("copy applies");
        assert_eq!(target.first_name.as_deref(), Some("Jane"));
        assert_eq!(target.last_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn failed_test_aborts_with_test_failed() {
        let mut test = op(PatchKind::Test, "/last_name");
        test.value = Some(json!("Smith"));

        let err = apply_operations(&seed(), &[test]).expect_err("test must fail");
        assert_eq!(
            err,
            PatchError::TestFailed {
                path: "/last_name".to_string()
            }
        );
    }

    #[test]
    fn unknown_path_is_a_hard_error() {
        let mut replace = op(PatchKind::Replace, "/nickname");
        replace.value = Some(json!("JJ"));

        let err = apply_operations(&seed(), &[replace]).expect_err("unknown path must fail");
        assert_eq!(err, PatchError::UnknownPath("/nickname".to_string()));
    }

    #[test]
    fn add_without_value_is_rejected() {
        let add = op(PatchKind::Add, "/first_name");
        let err = apply_operations(&seed(), &[add]).expect_err("missing value must fail");
        assert!(matches!(err, PatchError::MissingValue { op: "add", .. }));
    }

    #[test]
    fn non_string_and_unparseable_dates_are_invalid_values() {
        let mut numeric = op(PatchKind::Replace, "/first_name");
        numeric.value = Some(json!(42));
        assert!(matches!(
            apply_operations(&seed(), &[numeric]),
            Err(PatchError::InvalidValue { .. })
        ));

        let mut bad_date = op(PatchKind::Replace, "/date_of_birth");
        bad_date.value = Some(json!("01/04/1990"));
        assert!(matches!(
            apply_operations(&seed(), &[bad_date]),
            Err(PatchError::InvalidValue { .. })
        ));
    }

    #[test]
    fn move_from_unset_source_is_rejected() {
        let remove = op(PatchKind::Remove, "/first_name");
        let mut mv = op(PatchKind::Move, "/last_name");
        mv.from = Some("/first_name".to_string());

        let err = apply_operations(&seed(), &[remove, mv]).expect_err("unset source must fail");
        assert_eq!(err, PatchError::NoValueAtPath("/first_name".to_string()));
    }

    #[test]
    fn operations_deserialize_from_rfc6902_json() {
        let ops: Vec<PatchOperation> = serde_json::from_value(json!([
            { "op": "replace", "path": "/first_name", "value": "Janet" },
            { "op": "test", "path": "/last_name", "value": "Doe" },
            { "op": "move", "path": "/last_name", "from": "/first_name" }
        ]))
        .expect("valid patch document");

        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].op, PatchKind::Replace);
        assert_eq!(ops[2].from.as_deref(), Some("/first_name"));
    }
}
