//! The validation engine capability a runner depends on.
//!
//! This module provides the [`Validator`] trait. Any object that can inspect an
//! entity and report [`Violation`]s can be injected into a
//! [`ValidationRunner`](crate::ValidationRunner); how constraints are declared
//! and where their metadata lives is entirely up to the engine.

use std::sync::Arc;

use crate::error::Violation;

/// An external validation engine.
///
/// `validate` returns the violations found on `entity` (empty when the entity
/// is valid) or `Err` when the engine itself cannot do its job. Engine errors
/// are never folded into violations by this crate; they reach the caller
/// unchanged.
///
/// Closures of the shape `Fn(&E) -> Result<Vec<Violation>, Err>` implement
/// this trait, as does an `Arc` of any validator. A boxed engine is injected
/// by borrowing its contents (`&*boxed`).
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
/// use verdict_relay::{Validator, Violation};
///
/// struct Signup {
///     email: String,
/// }
///
/// struct SignupRules;
///
/// impl Validator<Signup> for SignupRules {
///     type Error = Infallible;
///
///     fn validate(&self, entity: &Signup) -> Result<Vec<Violation>, Infallible> {
///         let mut violations = Vec::new();
///         if !entity.email.contains('@') {
///             violations.push(Violation::new("email", "invalid format"));
///         }
///         Ok(violations)
///     }
/// }
///
/// let found = SignupRules.validate(&Signup { email: "nope".into() }).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
pub trait Validator<E: ?Sized> {
    /// Failure raised by the engine itself (misconfiguration, unsupported entity).
    type Error;

    /// Validates `entity`, returning violations in the engine's own order.
    fn validate(&self, entity: &E) -> Result<Vec<Violation>, Self::Error>;
}

impl<E, F, Err> Validator<E> for F
where
    E: ?Sized,
    F: Fn(&E) -> Result<Vec<Violation>, Err>,
{
    type Error = Err;

    fn validate(&self, entity: &E) -> Result<Vec<Violation>, Err> {
        self(entity)
    }
}

impl<E: ?Sized, V: Validator<E> + ?Sized> Validator<E> for Arc<V> {
    type Error = V::Error;

    fn validate(&self, entity: &E) -> Result<Vec<Violation>, Self::Error> {
        (**self).validate(entity)
    }
}
