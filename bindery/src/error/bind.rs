//! Argument and registration error types

/// Errors returned at the call boundary of notifier and validation operations.
///
/// These are never recorded as validation failures. Domain-level failures end
/// up in the error map as [`FailureRecord`](crate::validation::FailureRecord)s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// A required identifier or argument was empty or otherwise unusable.
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The value handed to `validate_property` has a different type than the
    /// one registered for the property.
    #[error("Property '{property}' expects a value of type {expected}")]
    TypeMismatch {
        /// The property being validated.
        property: String,
        /// Type name registered for the property.
        expected: &'static str,
    },
}

impl BindError {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(property: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            property: property.into(),
            expected,
        }
    }
}

/// Rejects empty property names.
pub(crate) fn check_property_name(name: &str) -> Result<(), BindError> {
    if name.is_empty() {
        return Err(BindError::invalid_argument(
            "property_name",
            "property name must not be empty",
        ));
    }
    Ok(())
}
