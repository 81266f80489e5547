//! Validation engine: change notification plus per-property error tracking.

use std::sync::Arc;

use super::config::ValidationConfig;
use super::errors::{ErrorMap, ErrorsChanged};
use super::failure::{ConstraintId, FailureRecord};
use super::pending::PendingValidation;
use super::rules::Rules;
use crate::error::{BindError, check_property_name};
use crate::notifier::ChangeNotifier;
use crate::observer::ObserverList;

/// Pseudo-property notified when [`ValidationEngine::has_errors`] may change.
pub const HAS_ERRORS: &str = "HasErrors";

/// Pseudo-property notified when [`ValidationEngine::error_messages`] may change.
pub const ERRORS: &str = "Errors";

struct EngineInner<M> {
    rules: Arc<Rules<M>>,
    errors: ErrorMap,
    notifier: ChangeNotifier,
    errors_changed: ObserverList<ErrorsChanged>,
    config: ValidationConfig,
}

impl<M: 'static> EngineInner<M> {
    /// Validate the value `model` currently holds for `property`.
    fn validate_current(&self, model: &M, property: &str) -> bool {
        match self.rules.get(property) {
            Some(rules) => {
                let failures = rules.validate(model);
                self.record(property, failures)
            }
            None => true,
        }
    }

    /// Replace the failures of `property`. Returns `true` if none remain.
    ///
    /// Failures of `property`'s constraints filed under other members by a
    /// whole-object pass are retracted once the constraint passes.
    fn record(&self, property: &str, failures: Vec<FailureRecord>) -> bool {
        let failing: Vec<ConstraintId> = failures
            .iter()
            .map(|failure| failure.constraint().clone())
            .collect();
        let previous = self.errors.replace(property, failures);
        let present = self.errors.contains(property);

        if present {
            if previous
                .as_ref()
                .is_some_and(|previous| *previous == self.errors.get(property))
            {
                log::trace!("[validation] {}: failures re-asserted", property);
            } else {
                log::debug!("[validation] {}: failures updated", property);
            }
            self.notify_errors_changed(property);
        } else if previous.is_some() {
            log::debug!("[validation] {}: failures cleared", property);
            self.notify_errors_changed(property);
        }

        self.retract_spanning(property, &failing);

        !present
    }

    fn retract_spanning(&self, property: &str, failing: &[ConstraintId]) {
        for member in self.errors.properties() {
            if member == property {
                continue;
            }
            let retracted = self.errors.retain(&member, |record| {
                let constraint = record.constraint();
                constraint.property != property || failing.contains(constraint)
            });
            if retracted {
                log::debug!(
                    "[validation] {}: retracted failures owned by {}",
                    member,
                    property
                );
                self.notify_errors_changed(&member);
            }
        }
    }

    fn clear(&self) {
        for property in self.errors.properties() {
            if self.errors.remove(&property).is_some() {
                self.notify_errors_changed(&property);
            }
        }
    }

    fn validate_all(&self, model: &M) -> bool {
        self.clear();

        let mut groups: Vec<(String, Vec<FailureRecord>)> = Vec::new();
        for property in self.rules.iter() {
            for failure in property.validate(model) {
                for member in failure.members() {
                    match groups.iter_mut().find(|(name, _)| name == member) {
                        Some((_, records)) => records.push(failure.clone()),
                        None => groups.push((member.clone(), vec![failure.clone()])),
                    }
                }
            }
        }

        for (property, records) in groups {
            self.errors.replace(&property, records);
            self.notify_errors_changed(&property);
        }

        let valid = self.errors.is_empty();
        log::debug!(
            "[validation] whole-object pass finished: {} properties with failures",
            self.errors.len()
        );
        valid
    }

    fn notify_errors_changed(&self, property: &str) {
        if self.config.notify_aggregates {
            self.notifier.notify_changed(HAS_ERRORS);
            self.notifier.notify_changed(ERRORS);
        }
        self.errors_changed.emit(&ErrorsChanged {
            property: property.to_string(),
        });
    }
}

/// Keeps an error map consistent with the properties of a model `M`.
///
/// Embed one next to the model's fields. Cloning shares the same error map and
/// subscribers.
///
/// # Example
///
/// ```ignore
/// struct UserViewModel {
///     user: User,
///     validation: ValidationEngine<User>,
/// }
///
/// impl UserViewModel {
///     fn set_age(&mut self, age: u32) -> Result<bool, BindError> {
///         self.validation
///             .set_property(&mut self.user, "Age", age, |u| &mut u.age)
///     }
/// }
/// ```
pub struct ValidationEngine<M> {
    inner: Arc<EngineInner<M>>,
}

impl<M: 'static> ValidationEngine<M> {
    /// Create an engine with the default configuration.
    pub fn new(rules: Arc<Rules<M>>) -> Self {
        Self::with_config(rules, ValidationConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(rules: Arc<Rules<M>>, config: ValidationConfig) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                rules,
                errors: ErrorMap::new(),
                notifier: ChangeNotifier::new(),
                errors_changed: ObserverList::new(),
                config,
            }),
        }
    }

    /// Property changing/changed subscribers, including the `HasErrors` and
    /// `Errors` pseudo-properties.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.inner.notifier
    }

    /// Subscribers notified when a property's failures change.
    pub fn errors_changed(&self) -> &ObserverList<ErrorsChanged> {
        &self.inner.errors_changed
    }

    /// The constraint table in use.
    pub fn rules(&self) -> &Rules<M> {
        &self.inner.rules
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidationConfig {
        &self.inner.config
    }

    /// Assign `value` to the field selected by `field`, notify, then validate
    /// the property.
    ///
    /// Returns `Ok(true)` if the value changed, whether or not it is valid.
    /// An equal value is a no-op unless
    /// [`revalidate_unchanged`](ValidationConfig::revalidate_unchanged) is set.
    pub fn set_property<V, F>(
        &self,
        model: &mut M,
        name: &str,
        value: V,
        field: F,
    ) -> Result<bool, BindError>
    where
        V: PartialEq,
        F: FnOnce(&mut M) -> &mut V,
    {
        let changed = self
            .inner
            .notifier
            .set_property(field(&mut *model), value, name)?;

        if changed || self.inner.config.revalidate_unchanged {
            self.inner.validate_current(&*model, name);
        }

        Ok(changed)
    }

    /// Validate `value` as the value of `name`, in the context of `model`.
    ///
    /// Previous failures of `name` are replaced. Returns `Ok(true)` if the
    /// value satisfies every constraint; properties without constraints are
    /// always valid.
    pub fn validate_property<V: 'static>(
        &self,
        model: &M,
        name: &str,
        value: &V,
    ) -> Result<bool, BindError> {
        check_property_name(name)?;

        let Some(rules) = self.inner.rules.get(name) else {
            return Ok(true);
        };

        let failures = rules
            .validate_value(model, value)
            .ok_or_else(|| BindError::type_mismatch(name, rules.value_type()))?;

        Ok(self.inner.record(name, failures))
    }

    /// Validate the value `model` currently holds for `name`.
    pub fn revalidate(&self, model: &M, name: &str) -> Result<bool, BindError> {
        check_property_name(name)?;
        Ok(self.inner.validate_current(model, name))
    }

    /// Clear the error map and validate every property of a snapshot of
    /// `model` on the blocking pool.
    ///
    /// Outside a tokio runtime the pass runs on the calling thread and the
    /// returned handle is already complete.
    pub fn validate_all(&self, model: &M) -> PendingValidation
    where
        M: Clone + Send,
    {
        let snapshot = model.clone();
        let inner = Arc::clone(&self.inner);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => PendingValidation::running(
                handle.spawn_blocking(move || inner.validate_all(&snapshot)),
            ),
            Err(_) => {
                log::debug!("[validation] no runtime, validating on the calling thread");
                PendingValidation::done(inner.validate_all(&snapshot))
            }
        }
    }

    /// Clear the error map and validate every property on the calling thread.
    pub fn validate_all_blocking(&self, model: &M) -> bool {
        self.inner.validate_all(model)
    }

    /// Current failures of `name`; empty if there are none.
    pub fn get_errors(&self, name: &str) -> Vec<FailureRecord> {
        self.inner.errors.get(name)
    }

    /// Returns `true` if any property has failures.
    pub fn has_errors(&self) -> bool {
        !self.inner.errors.is_empty()
    }

    /// Every failure message, flattened, in no particular order.
    pub fn error_messages(&self) -> Vec<String> {
        self.inner.errors.messages()
    }

    /// Total number of failure records.
    pub fn error_count(&self) -> usize {
        self.inner.errors.failure_count()
    }

    /// Names of the properties that currently have failures.
    pub fn properties_with_errors(&self) -> Vec<String> {
        self.inner.errors.properties()
    }

    /// Remove every failure, notifying once per cleared property.
    pub fn clear_errors(&self) {
        self.inner.clear();
    }
}

impl<M> Clone for ValidationEngine<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> std::fmt::Debug for ValidationEngine<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("rules", &self.inner.rules)
            .field("errors", &self.inner.errors)
            .field("config", &self.inner.config)
            .finish()
    }
}
