//! Customer domain model and boundary representations.
//!
//! # Responsibility
//! - Define the canonical customer record persisted by the store.
//! - Define the transient shapes exchanged with request handlers.
//!
//! # Invariants
//! - Every persisted record satisfies the field constraints; the write path
//!   validates before the store ever sees a row.
//! - Constraint checks are pure functions shared by records and drafts.

pub mod customer;
pub mod representation;
