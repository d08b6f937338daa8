//! Partial-update (patch) application over the update-input shape.
//!
//! # Responsibility
//! - Interpret an ordered sequence of patch operations against a working
//!   copy of a customer's update input.
//! - Keep application pure; persistence stays with repository callers.

pub mod json_patch;
