//! Running an injected validation engine over entities.
//!
//! This module provides [`ValidationRunner`], which asks a [`Validator`] about
//! an entity and turns any violations it reports into a single
//! [`ErrorAggregate`], and [`RunError`], the error type of every runner
//! operation.

use rayon::prelude::*;
use stillwater::prelude::*;

use crate::engine::Validator;
use crate::error::{ErrorAggregate, Violation};

/// Errors produced by [`ValidationRunner`].
///
/// Exactly one failure is produced per call. Engine faults are relayed as
/// [`RunError::Engine`] without being inspected or rewrapped, so their
/// `Display` and `source` are the engine's own.
#[derive(Debug, thiserror::Error)]
pub enum RunError<F> {
    /// The entity violated one or more constraints.
    #[error(transparent)]
    ValidationFailed(#[from] ErrorAggregate),

    /// The engine failed before it could report violations.
    #[error(transparent)]
    Engine(F),
}

impl<F> RunError<F> {
    /// Returns true for [`RunError::ValidationFailed`].
    pub fn is_validation_failed(&self) -> bool {
        matches!(self, RunError::ValidationFailed(_))
    }

    /// Returns the aggregate if the entity failed validation.
    pub fn aggregate(&self) -> Option<&ErrorAggregate> {
        match self {
            RunError::ValidationFailed(aggregate) => Some(aggregate),
            RunError::Engine(_) => None,
        }
    }

    /// Splits the error into the aggregate or the untouched engine fault.
    pub fn into_aggregate(self) -> Result<ErrorAggregate, F> {
        match self {
            RunError::ValidationFailed(aggregate) => Ok(aggregate),
            RunError::Engine(fault) => Err(fault),
        }
    }
}

/// Runs an injected validation engine and relays its verdict.
///
/// The runner borrows its engine; it never owns or configures it. It holds no
/// mutable state, so one runner may be shared between threads whenever the
/// engine is `Sync`.
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
/// use verdict_relay::{RunError, ValidationRunner, Violation};
///
/// let engine = |email: &String| -> Result<Vec<Violation>, Infallible> {
///     if email.contains('@') {
///         Ok(vec![])
///     } else {
///         Ok(vec![Violation::new("email", "invalid format")])
///     }
/// };
/// let runner = ValidationRunner::new(&engine);
///
/// assert!(runner.validate(&"a@example.com".to_string()).is_ok());
///
/// match runner.validate(&"nope".to_string()) {
///     Err(RunError::ValidationFailed(aggregate)) => {
///         assert_eq!(aggregate.get("email"), Some("invalid format"));
///     }
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
pub struct ValidationRunner<'v, V: ?Sized> {
    engine: &'v V,
    message: Option<String>,
}

impl<'v, V: ?Sized> ValidationRunner<'v, V> {
    /// Creates a runner around an externally owned engine.
    pub fn new(engine: &'v V) -> Self {
        Self {
            engine,
            message: None,
        }
    }

    /// Sets the summary message attached to failures from this runner.
    ///
    /// Without it, failures carry [`DEFAULT_MESSAGE`](crate::DEFAULT_MESSAGE).
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the injected engine.
    pub fn engine(&self) -> &'v V {
        self.engine
    }

    /// Validates `entity`, failing with [`RunError::ValidationFailed`] if the
    /// engine reports any violation.
    ///
    /// Violations sharing a property path collapse to the last one reported.
    /// Engine faults are returned as [`RunError::Engine`].
    pub fn validate<E>(&self, entity: &E) -> Result<(), RunError<V::Error>>
    where
        E: ?Sized,
        V: Validator<E>,
    {
        match self.check(entity).map_err(RunError::Engine)? {
            Validation::Success(()) => Ok(()),
            Validation::Failure(aggregate) => Err(RunError::ValidationFailed(aggregate)),
        }
    }

    /// Validates `entity`, expressing a constraint failure as a `Validation`.
    ///
    /// The outer `Result` carries engine faults only. Failures from several
    /// checks can be merged with `Semigroup::combine`.
    ///
    /// ```rust
    /// use std::convert::Infallible;
    /// use verdict_relay::{ValidationRunner, Violation};
    ///
    /// let engine = |n: &i64| -> Result<Vec<Violation>, Infallible> {
    ///     Ok(if *n < 0 { vec![Violation::new("amount", "must be positive")] } else { vec![] })
    /// };
    /// let runner = ValidationRunner::new(&engine);
    ///
    /// assert!(runner.check(&-1_i64).unwrap().is_failure());
    /// assert!(runner.check(&5_i64).unwrap().is_success());
    /// ```
    pub fn check<E>(&self, entity: &E) -> Result<Validation<(), ErrorAggregate>, V::Error>
    where
        E: ?Sized,
        V: Validator<E>,
    {
        let violations = self.run_engine(entity)?;
        if violations.is_empty() {
            Ok(Validation::Success(()))
        } else {
            Ok(Validation::Failure(self.fail(violations)))
        }
    }

    /// Validates every entity in `entities`, reporting all failures at once.
    ///
    /// Each violation's path is re-rooted under the entity's position, so a
    /// failure on `email` of the third entity is keyed `[2].email`. The first
    /// engine fault stops the run and is returned unchanged.
    pub fn validate_each<'e, E, I>(&self, entities: I) -> Result<(), RunError<V::Error>>
    where
        E: ?Sized + 'e,
        I: IntoIterator<Item = &'e E>,
        V: Validator<E>,
    {
        let mut failed = None;
        for (index, entity) in entities.into_iter().enumerate() {
            let violations = self.run_engine(entity).map_err(RunError::Engine)?;
            failed = self.accumulate(failed, index, violations);
        }
        self.finish(failed)
    }

    /// Parallel form of [`validate_each`](Self::validate_each).
    ///
    /// Entities are validated on the rayon thread pool; the resulting
    /// aggregate is identical to the sequential one. If several engine calls
    /// fault, any one of those faults may be returned.
    pub fn validate_each_par<E>(&self, entities: &[E]) -> Result<(), RunError<V::Error>>
    where
        E: Sync,
        V: Validator<E> + Sync,
        V::Error: Send,
    {
        let reports: Vec<Vec<Violation>> = entities
            .par_iter()
            .map(|entity| self.run_engine(entity))
            .collect::<Result<_, _>>()
            .map_err(RunError::Engine)?;

        let failed = reports
            .into_iter()
            .enumerate()
            .fold(None, |acc, (index, violations)| {
                self.accumulate(acc, index, violations)
            });
        self.finish(failed)
    }

    fn run_engine<E>(&self, entity: &E) -> Result<Vec<Violation>, V::Error>
    where
        E: ?Sized,
        V: Validator<E>,
    {
        #[cfg(feature = "tracing")]
        tracing::trace!("running validation engine");

        self.engine.validate(entity)
    }

    fn accumulate(
        &self,
        acc: Option<ErrorAggregate>,
        index: usize,
        violations: Vec<Violation>,
    ) -> Option<ErrorAggregate> {
        if violations.is_empty() {
            return acc;
        }

        let position = format!("[{}]", index);
        let aggregate = self.fail(violations.into_iter().map(|v| v.under(&position)));
        Some(match acc {
            Some(acc) => acc.combine(aggregate),
            None => aggregate,
        })
    }

    fn finish<F>(&self, failed: Option<ErrorAggregate>) -> Result<(), RunError<F>> {
        match failed {
            Some(aggregate) => Err(RunError::ValidationFailed(aggregate)),
            None => Ok(()),
        }
    }

    fn fail<I>(&self, violations: I) -> ErrorAggregate
    where
        I: IntoIterator<Item = Violation>,
    {
        let aggregate = ErrorAggregate::from_violations(violations);
        let aggregate = match &self.message {
            Some(message) => aggregate.with_message(message.clone()),
            None => aggregate,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(fields = aggregate.len(), "entity failed validation");

        aggregate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DEFAULT_MESSAGE;
    use std::convert::Infallible;

    /// Engine that reports a fixed list of violations for every entity.
    struct Scripted(Vec<(&'static str, &'static str)>);

    impl<E: ?Sized> Validator<E> for Scripted {
        type Error = Infallible;

        fn validate(&self, _entity: &E) -> Result<Vec<Violation>, Infallible> {
            Ok(self
                .0
                .iter()
                .map(|(path, message)| Violation::new(*path, *message))
                .collect())
        }
    }

    #[test]
    fn test_no_violations_is_ok() {
        let engine = Scripted(vec![]);
        let runner = ValidationRunner::new(&engine);
        assert!(runner.validate("anything").is_ok());
    }

    #[test]
    fn test_single_violation() {
        let engine = Scripted(vec![("email", "invalid format")]);
        let runner = ValidationRunner::new(&engine);

        let aggregate = runner.validate(&()).unwrap_err().into_aggregate().unwrap();
        assert_eq!(aggregate.len(), 1);
        assert_eq!(aggregate.get("email"), Some("invalid format"));
        assert_eq!(aggregate.message(), DEFAULT_MESSAGE);
    }

    #[test]
    fn test_repeated_path_last_message_wins() {
        let engine = Scripted(vec![("name", "required"), ("name", "too short")]);
        let runner = ValidationRunner::new(&engine);

        let err = runner.validate(&()).unwrap_err();
        assert!(err.is_validation_failed());
        let aggregate = err.aggregate().unwrap();
        assert_eq!(aggregate.len(), 1);
        assert_eq!(aggregate.get("name"), Some("too short"));
    }

    #[test]
    fn test_engine_fault_is_passed_through() {
        let engine = |_: &u8| -> Result<Vec<Violation>, String> { Err("no metadata for u8".into()) };
        let runner = ValidationRunner::new(&engine);

        match runner.validate(&7u8) {
            Err(RunError::Engine(fault)) => assert_eq!(fault, "no metadata for u8"),
            other => panic!("expected engine fault, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_message() {
        let engine = Scripted(vec![("email", "invalid format")]);
        let runner = ValidationRunner::new(&engine).with_message("profile rejected");

        let err = runner.validate(&()).unwrap_err();
        assert_eq!(err.to_string(), "profile rejected");
    }

    #[test]
    fn test_check_reports_validation() {
        let engine = Scripted(vec![("email", "invalid format")]);
        let runner = ValidationRunner::new(&engine);

        match runner.check(&()).unwrap() {
            Validation::Failure(aggregate) => assert!(aggregate.contains("email")),
            Validation::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_validate_each_reroots_paths() {
        let engine = |n: &i32| -> Result<Vec<Violation>, Infallible> {
            Ok(if *n < 0 {
                vec![Violation::new("amount", "must be positive")]
            } else {
                vec![]
            })
        };
        let runner = ValidationRunner::new(&engine);

        let err = runner.validate_each(&[5, -1, 3, -2]).unwrap_err();
        let aggregate = err.into_aggregate().unwrap();
        let keys: Vec<_> = aggregate.errors().keys().collect();
        assert_eq!(keys, ["[1].amount", "[3].amount"]);
    }

    #[test]
    fn test_validate_each_all_valid() {
        let engine = Scripted(vec![]);
        let runner = ValidationRunner::new(&engine);
        assert!(runner.validate_each(["a", "b"].iter().copied()).is_ok());
    }

    #[test]
    fn test_validate_each_stops_at_engine_fault() {
        let calls = std::cell::Cell::new(0);
        let engine = |n: &i32| -> Result<Vec<Violation>, String> {
            calls.set(calls.get() + 1);
            if *n == 0 {
                Err("division by zero rule".into())
            } else {
                Ok(vec![Violation::new("", "odd")])
            }
        };
        let runner = ValidationRunner::new(&engine);

        let err = runner.validate_each(&[1, 0, 3]).unwrap_err();
        assert!(matches!(err, RunError::Engine(ref f) if f == "division by zero rule"));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_validate_each_par_matches_sequential() {
        let engine = |n: &u32| -> Result<Vec<Violation>, Infallible> {
            let mut found = Vec::new();
            if n % 3 == 0 {
                found.push(Violation::new("value", "divisible by three"));
            }
            if n % 5 == 0 {
                found.push(Violation::new("value", "divisible by five"));
            }
            Ok(found)
        };
        let runner = ValidationRunner::new(&engine);
        let entities: Vec<u32> = (1..=40).collect();

        let sequential = runner.validate_each(&entities).unwrap_err().into_aggregate().unwrap();
        let parallel = runner.validate_each_par(&entities).unwrap_err().into_aggregate().unwrap();

        assert_eq!(sequential.errors(), parallel.errors());
        assert_eq!(parallel.get("[14].value"), Some("divisible by five"));
    }

    #[test]
    fn test_validate_each_keeps_engine_paths_verbatim() {
        let engine = Scripted(vec![
            ("items[007]", "bad item"),
            ("a[b]c", "bad suffix"),
            ("tags[+1]", "bad tag"),
        ]);
        let runner = ValidationRunner::new(&engine);

        let aggregate = runner.validate_each(&[0u8]).unwrap_err().into_aggregate().unwrap();
        let keys: Vec<_> = aggregate.errors().keys().map(String::as_str).collect();
        assert_eq!(keys, ["[0].items[007]", "[0].a[b]c", "[0].tags[+1]"]);
    }

    #[test]
    fn test_validate_each_keeps_paths_differing_in_leading_zeros() {
        let engine = Scripted(vec![("x[1]", "first"), ("x[01]", "second")]);
        let runner = ValidationRunner::new(&engine);

        let single = runner.validate(&0u8).unwrap_err().into_aggregate().unwrap();
        let each = runner.validate_each(&[0u8]).unwrap_err().into_aggregate().unwrap();
        let each_par = runner.validate_each_par(&[0u8]).unwrap_err().into_aggregate().unwrap();

        assert_eq!(single.len(), 2);
        assert_eq!(each.len(), 2);
        assert_eq!(each_par.len(), 2);
        assert_eq!(each.get("[0].x[1]"), Some("first"));
        assert_eq!(each.get("[0].x[01]"), Some("second"));
    }

    #[test]
    fn test_check_returns_engine_fault() {
        let engine = |_: &str| -> Result<Vec<Violation>, String> { Err("rules not loaded".into()) };
        let runner = ValidationRunner::new(&engine);

        match runner.check("entity") {
            Err(fault) => assert_eq!(fault, "rules not loaded"),
            Ok(_) => panic!("expected engine fault"),
        }
    }
}
