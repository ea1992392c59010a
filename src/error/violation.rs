//! A single constraint violation reported by a validation engine.

use std::fmt::{self, Display};

/// One failed constraint, as reported by the validation engine.
///
/// The property path is kept exactly as the engine reported it; this crate
/// never parses or normalizes it.
///
/// # Example
///
/// ```rust
/// use verdict_relay::Violation;
///
/// let violation = Violation::new("addresses[0].street", "required");
///
/// assert_eq!(violation.property_path, "addresses[0].street");
/// assert_eq!(violation.to_string(), "addresses[0].street: required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The property path of the field that failed validation.
    pub property_path: String,
    /// Human-readable error message.
    pub message: String,
}

impl Violation {
    /// Creates a new violation with the given property path and message.
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }

    /// Returns this violation relocated beneath `parent`.
    ///
    /// The engine's path is appended to `parent` as text: a `.` separates the
    /// two unless the path is empty or starts with `[`.
    ///
    /// ```rust
    /// use verdict_relay::Violation;
    ///
    /// let v = Violation::new("email", "required").under("[2]");
    /// assert_eq!(v.property_path, "[2].email");
    ///
    /// let v = Violation::new("[key]", "required").under("[2]");
    /// assert_eq!(v.property_path, "[2][key]");
    /// ```
    pub fn under(mut self, parent: &str) -> Self {
        if parent.is_empty() {
            return self;
        }

        let mut path = String::with_capacity(parent.len() + self.property_path.len() + 1);
        path.push_str(parent);
        if !self.property_path.is_empty() && !self.property_path.starts_with('[') {
            path.push('.');
        }
        path.push_str(&self.property_path);
        self.property_path = path;
        self
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.property_path, self.message)
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violation>();
    assert_sync::<Violation>();
};
