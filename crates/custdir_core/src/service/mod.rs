//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, mapper and patch calls into the use-case
//!   surface a request handler consumes.
//! - Keep transport concerns (status codes, routing) out of core.

pub mod customer_service;
