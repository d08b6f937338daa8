//! Core resource access and mutation layer for the customer directory.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod patch;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::customer::{Customer, CustomerId, CustomerValidationError, UNASSIGNED_ID};
pub use model::representation::{CustomerDraft, CustomerView};
pub use patch::json_patch::{apply_operations, PatchError, PatchKind, PatchOperation};
pub use repo::customer_repo::{
    CustomerRepository, RepoError, RepoResult, SqliteCustomerRepository,
};
pub use search::filter::CustomerSearch;
pub use service::customer_service::{CustomerService, PatchCustomerError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
