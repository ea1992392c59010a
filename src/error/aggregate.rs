//! The structured failure raised when an entity does not validate.
//!
//! [`ErrorAggregate`] carries a flat field-path → message mapping that a form or
//! request layer can render next to its inputs, plus a summary message and an
//! optional underlying cause.

use std::error::Error as StdError;

use indexmap::IndexMap;
use stillwater::prelude::*;

use super::violation::Violation;

/// Summary message used when none is supplied.
pub const DEFAULT_MESSAGE: &str = "Errors occurred while validating your entity";

type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Validation failures for one entity, keyed by property path.
///
/// Each property path maps to a single message. When the engine reports more
/// than one violation for the same path, the last one reported wins and the
/// earlier messages are discarded.
///
/// # Example
///
/// ```rust
/// use verdict_relay::{ErrorAggregate, Violation};
///
/// let aggregate = ErrorAggregate::from_violations(vec![
///     Violation::new("name", "required"),
///     Violation::new("name", "too short"),
/// ]);
///
/// assert_eq!(aggregate.get("name"), Some("too short"));
/// assert_eq!(aggregate.len(), 1);
/// assert_eq!(aggregate.message(), "Errors occurred while validating your entity");
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ErrorAggregate {
    errors: IndexMap<String, String>,
    message: String,
    code: i64,
    #[source]
    cause: Option<Cause>,
}

impl ErrorAggregate {
    /// Creates an aggregate holding `errors` with the default summary message.
    pub fn new(errors: IndexMap<String, String>) -> Self {
        Self {
            errors,
            message: DEFAULT_MESSAGE.to_string(),
            code: 0,
            cause: None,
        }
    }

    /// Builds an aggregate from violations in the order the engine produced them.
    ///
    /// A repeated property path keeps the position of its first occurrence and
    /// the message of its last.
    pub fn from_violations<I>(violations: I) -> Self
    where
        I: IntoIterator<Item = Violation>,
    {
        let mut aggregate = Self::default();
        for violation in violations {
            aggregate
                .errors
                .insert(violation.property_path, violation.message);
        }
        aggregate
    }

    /// Replaces the summary message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches the underlying error that led to this failure.
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Sets the numeric error code.
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Returns the property path → message mapping.
    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    /// Returns the summary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the numeric error code (0 unless set).
    pub fn code(&self) -> i64 {
        self.code
    }

    /// Returns the wrapped cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Returns the message recorded for `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    /// Returns true if a message is recorded for `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.errors.contains_key(path)
    }

    /// Number of distinct property paths.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no property path has a message.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consumes the aggregate, returning the mapping.
    pub fn into_errors(self) -> IndexMap<String, String> {
        self.errors
    }
}

impl Default for ErrorAggregate {
    fn default() -> Self {
        Self::new(IndexMap::new())
    }
}

/// Merges failures from separate validations.
///
/// Paths from `other` overwrite paths already present, matching the
/// last-write-wins rule for a single validation. The summary message, code and
/// cause of `self` are kept.
impl Semigroup for ErrorAggregate {
    fn combine(mut self, other: Self) -> Self {
        self.errors.extend(other.errors);
        self
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ErrorAggregate>();
    assert_sync::<ErrorAggregate>();
};
