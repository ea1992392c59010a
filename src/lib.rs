//! # Verdict Relay
//!
//! Runs an injected validation engine over an entity and relays its verdict as
//! a single structured error.
//!
//! ## Overview
//!
//! This crate does not define constraints. An external engine, anything that
//! implements [`Validator`], decides what is wrong with an entity and reports
//! [`Violation`]s. A [`ValidationRunner`] collects those violations into a flat
//! property path → message mapping and, if there is at least one, fails with
//! [`RunError::ValidationFailed`] carrying an [`ErrorAggregate`]. Faults raised
//! by the engine itself pass through untouched as [`RunError::Engine`].
//!
//! ## Core Types
//!
//! - [`Validator`]: The capability a runner is given (the external engine)
//! - [`Violation`]: One failed constraint with its property path and message
//! - [`ErrorAggregate`]: The flat path → message mapping plus a summary message
//! - [`ValidationRunner`]: Runs the engine and raises the aggregate on failure
//!
//! ## Example
//!
//! ```rust
//! use std::convert::Infallible;
//! use verdict_relay::{RunError, ValidationRunner, Violation};
//!
//! struct Signup {
//!     name: String,
//!     email: String,
//! }
//!
//! let engine = |signup: &Signup| -> Result<Vec<Violation>, Infallible> {
//!     let mut found = Vec::new();
//!     if signup.name.is_empty() {
//!         found.push(Violation::new("name", "required"));
//!     }
//!     if !signup.email.contains('@') {
//!         found.push(Violation::new("email", "invalid format"));
//!     }
//!     Ok(found)
//! };
//!
//! let runner = ValidationRunner::new(&engine);
//! let signup = Signup { name: String::new(), email: "nope".into() };
//!
//! match runner.validate(&signup) {
//!     Err(RunError::ValidationFailed(aggregate)) => {
//!         assert_eq!(aggregate.get("name"), Some("required"));
//!         assert_eq!(aggregate.get("email"), Some("invalid format"));
//!     }
//!     other => panic!("expected a validation failure, got {other:?}"),
//! }
//! ```

pub mod engine;
pub mod error;
pub mod runner;

pub use engine::Validator;
pub use error::{ErrorAggregate, Violation, DEFAULT_MESSAGE};
pub use runner::{RunError, ValidationRunner};
