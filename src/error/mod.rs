//! Error types for validation failures.
//!
//! This module provides [`Violation`] for a single failed constraint reported
//! by an engine and [`ErrorAggregate`] for the failure a runner raises.

mod aggregate;
mod violation;

pub use aggregate::{ErrorAggregate, DEFAULT_MESSAGE};
pub use violation::Violation;
