//! Listing filter entry points.
//!
//! # Responsibility
//! - Expose the search criteria shape used to narrow customer listings.
//! - Keep the matching predicate pure and store-agnostic.

pub mod filter;
