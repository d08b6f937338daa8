//! Customer use-case service.
//!
//! # Responsibility
//! - Provide the create/get/list/replace/patch/remove entry points the
//!   request-handling layer calls.
//! - Translate between records and external representations via the mapper.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or staging contracts.
//! - Absence is expressed as `Ok(None)` / `Ok(false)`, never as an error;
//!   callers decide how to surface "not found".
//! - Nothing is staged until drafts and patch results validate cleanly.

use crate::model::customer::{CustomerId, CustomerValidationError};
use crate::model::representation::{CustomerDraft, CustomerView};
use crate::patch::json_patch::{apply_operations, PatchError, PatchOperation};
use crate::repo::customer_repo::{CustomerRepository, RepoError, RepoResult};
use crate::search::filter::CustomerSearch;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure surface of the patch use-case, covering all three layers a
/// partial update can fail in.
#[derive(Debug)]
pub enum PatchCustomerError {
    /// Malformed or non-applicable operation sequence.
    Patch(PatchError),
    /// Patched representation violates field constraints.
    Validation(CustomerValidationError),
    /// Repository or store failure.
    Repo(RepoError),
}

impl Display for PatchCustomerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patch(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PatchCustomerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Patch(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<PatchError> for PatchCustomerError {
    fn from(value: PatchError) -> Self {
        Self::Patch(value)
    }
}

impl From<CustomerValidationError> for PatchCustomerError {
    fn from(value: CustomerValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for PatchCustomerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper around a customer repository.
///
/// One instance is bound to one unit of work, like the repository it wraps.
pub struct CustomerService<R: CustomerRepository> {
    repo: R,
}

impl<R: CustomerRepository> CustomerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Looks up one customer; `Ok(None)` when the id is unknown.
    pub fn get(&self, id: CustomerId) -> RepoResult<Option<CustomerView>> {
        Ok(self.repo.get_by_id(id)?.map(|record| (&record).into()))
    }

    /// Lists customers narrowed by the search criteria, in store order.
    pub fn list(&self, search: &CustomerSearch) -> RepoResult<Vec<CustomerView>> {
        let records = self.repo.list(search)?;
        Ok(records.iter().map(CustomerView::from).collect())
    }

    /// Creates a customer from a validated create input.
    ///
    /// Returns the full view under the store-assigned id, or `Ok(None)`
    /// when the store reported zero persisted changes.
    pub fn create(&mut self, draft: &CustomerDraft) -> RepoResult<Option<CustomerView>> {
        draft.validate()?;
        self.repo.add(draft.clone().into_record())?;

        if !self.repo.save()? {
            warn!("event=customer_create module=service status=error error_code=not_persisted");
            return Ok(None);
        }

        let Some(&id) = self.repo.assigned_ids().first() else {
            warn!("event=customer_create module=service status=error error_code=no_assigned_id");
            return Ok(None);
        };

        info!("event=customer_create module=service status=ok id={id}");
        Ok(self.repo.get_by_id(id)?.map(|record| (&record).into()))
    }

    /// Fully replaces an existing customer's data fields.
    ///
    /// Returns `Ok(None)` when the id is unknown.
    pub fn replace(
        &mut self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> RepoResult<Option<CustomerView>> {
        draft.validate()?;

        let Some(mut record) = self.repo.get_by_id(id)? else {
            return Ok(None);
        };

        draft.apply_to(&mut record);
        self.repo.update(record)?;
        self.repo.save()?;

        info!("event=customer_replace module=service status=ok id={id}");
        Ok(self.repo.get_by_id(id)?.map(|record| (&record).into()))
    }

    /// Applies a patch-operation sequence to an existing customer.
    ///
    /// Seeds the working copy from the record's current values, applies the
    /// operations in order, re-validates, then merges and saves. Any
    /// failure leaves the persisted record untouched. Returns `Ok(None)`
    /// when the id is unknown.
    pub fn patch(
        &mut self,
        id: CustomerId,
        operations: &[PatchOperation],
    ) -> Result<Option<CustomerView>, PatchCustomerError> {
        let Some(mut record) = self.repo.get_by_id(id)? else {
            return Ok(None);
        };

        let seed = CustomerDraft::from_record(&record);
        let patched = apply_operations(&seed, operations)?;
        let draft = patched.into_draft()?;
        draft.validate()?;

        draft.apply_to(&mut record);
        self.repo.update(record)?;
        self.repo.save()?;

        info!(
            "event=customer_patch module=service status=ok id={id} ops={}",
            operations.len()
        );
        Ok(self.repo.get_by_id(id)?.map(|r| (&r).into()))
    }

    /// Removes an existing customer; `Ok(false)` when the id is unknown.
    pub fn remove(&mut self, id: CustomerId) -> RepoResult<bool> {
        let Some(record) = self.repo.get_by_id(id)? else {
            return Ok(false);
        };

        self.repo.delete(record)?;
        self.repo.save()?;

        info!("event=customer_remove module=service status=ok id={id}");
        Ok(true)
    }
}
