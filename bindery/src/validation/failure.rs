//! Failure records produced by constraints.

use std::fmt;

/// Identity of one registered constraint.
///
/// Two failures with the same identity, members and message are the same
/// failure; the error map uses this to collapse duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintId {
    /// Property the constraint was registered under.
    pub property: String,
    /// Constraint kind (e.g. `"min_length"`, `"rule"`).
    pub kind: &'static str,
    /// Position of the constraint within its property.
    pub index: usize,
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}:{}", self.property, self.index, self.kind)
    }
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    members: Vec<String>,
    message: String,
    constraint: ConstraintId,
}

impl FailureRecord {
    pub(crate) fn new(constraint: ConstraintId, members: Vec<String>, message: String) -> Self {
        Self {
            members,
            message,
            constraint,
        }
    }

    /// Properties this failure applies to (never empty).
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The constraint that produced this failure.
    pub fn constraint(&self) -> &ConstraintId {
        &self.constraint
    }

    /// Returns `true` if this failure concerns `property`.
    pub fn concerns(&self, property: &str) -> bool {
        self.members.iter().any(|member| member == property)
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.members.join(", "), self.message)
    }
}
