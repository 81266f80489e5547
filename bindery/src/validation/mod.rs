//! Declarative per-property validation for view-models.
//!
//! A [`Rules`] table lists, for each named property of a model type, how to
//! read the property and which constraints it must satisfy. A
//! [`ValidationEngine`] owns the error map for one model instance and keeps it
//! in sync as properties are set.
//!
//! # Example
//!
//! ```ignore
//! use bindery::validation::{Rules, ValidationEngine};
//!
//! let rules = Arc::new(
//!     Rules::<User>::builder()
//!         .property("Age", |u: &User| u.age)
//!             .rule(|age| *age >= 18, "Age must be greater than 18")
//!         .build()?,
//! );
//! let validation = ValidationEngine::new(rules);
//!
//! validation.set_property(&mut user, "Age", 10, |u| &mut u.age)?;
//! assert!(validation.has_errors());
//! ```

mod config;
mod constraint;
mod engine;
mod errors;
mod failure;
mod pending;
mod rules;

pub use config::ValidationConfig;
pub use engine::{ERRORS, HAS_ERRORS, ValidationEngine};
pub use errors::ErrorsChanged;
pub use failure::{ConstraintId, FailureRecord};
pub use pending::PendingValidation;
pub use rules::{PropertyBuilder, Rules, RulesBuilder};
