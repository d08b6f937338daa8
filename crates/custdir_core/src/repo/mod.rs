//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the customer data access contract used by services.
//! - Isolate SQLite query details and unit-of-work staging from callers.
//!
//! # Invariants
//! - Repository writes validate records before anything is staged.
//! - Staged changes become visible only through a successful `save`.

pub mod customer_repo;
