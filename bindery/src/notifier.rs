//! Property change notification.

use crate::error::{BindError, check_property_name};
use crate::observer::ObserverList;

/// Fired before a property value is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChanging {
    /// Name of the property about to change.
    pub property: String,
}

/// Fired after a property value has been committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChanged {
    /// Name of the property that changed.
    pub property: String,
}

/// Broadcasts property transitions to subscribers.
///
/// Embed one in a view-model and route every property write through
/// [`set_property`](Self::set_property).
///
/// # Example
///
/// ```ignore
/// struct Profile {
///     name: String,
///     notifier: ChangeNotifier,
/// }
///
/// impl Profile {
///     fn set_name(&mut self, name: String) -> Result<bool, BindError> {
///         self.notifier.set_property(&mut self.name, name, "Name")
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    changing: ObserverList<PropertyChanging>,
    changed: ObserverList<PropertyChanged>,
}

impl ChangeNotifier {
    /// Create a notifier with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribers notified before a value is committed.
    pub fn property_changing(&self) -> &ObserverList<PropertyChanging> {
        &self.changing
    }

    /// Subscribers notified after a value is committed.
    pub fn property_changed(&self) -> &ObserverList<PropertyChanged> {
        &self.changed
    }

    /// Assign `value` to `field` if it differs, notifying around the write.
    ///
    /// Returns `Ok(false)` without side effects when the values are equal.
    pub fn set_property<T: PartialEq>(
        &self,
        field: &mut T,
        value: T,
        name: &str,
    ) -> Result<bool, BindError> {
        check_property_name(name)?;

        if *field == value {
            return Ok(false);
        }

        self.notify_changing(name);
        *field = value;
        self.notify_changed(name);

        Ok(true)
    }

    /// Fire a "changing" event for `name` without touching any value.
    pub fn raise_property_changing(&self, name: &str) -> Result<(), BindError> {
        check_property_name(name)?;
        self.notify_changing(name);
        Ok(())
    }

    /// Fire a "changed" event for `name` without touching any value.
    pub fn raise_property_changed(&self, name: &str) -> Result<(), BindError> {
        check_property_name(name)?;
        self.notify_changed(name);
        Ok(())
    }

    // Callers pass crate-owned constant names here.
    pub(crate) fn notify_changing(&self, name: &str) {
        log::trace!("[notify] changing: {}", name);
        self.changing.emit(&PropertyChanging {
            property: name.to_string(),
        });
    }

    pub(crate) fn notify_changed(&self, name: &str) {
        log::trace!("[notify] changed: {}", name);
        self.changed.emit(&PropertyChanged {
            property: name.to_string(),
        });
    }
}
