//! Validation engine configuration

/// Behaviour switches for a [`ValidationEngine`](super::ValidationEngine).
///
/// # Example
///
/// ```
/// use bindery::validation::ValidationConfig;
///
/// let config = ValidationConfig::default()
///     .with_revalidate_unchanged(true)
///     .with_notify_aggregates(false);
/// assert!(config.revalidate_unchanged);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Re-run property validation when `set_property` receives a value equal
    /// to the current one.
    ///
    /// Default: `false` (an unchanged value is neither stored nor validated)
    pub revalidate_unchanged: bool,

    /// Fire "changed" for the `HasErrors` and `Errors` pseudo-properties on
    /// every error map mutation.
    ///
    /// Default: `true`
    pub notify_aggregates: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            revalidate_unchanged: false,
            notify_aggregates: true,
        }
    }
}

impl ValidationConfig {
    /// Sets whether unchanged values are re-validated.
    pub fn with_revalidate_unchanged(mut self, revalidate: bool) -> Self {
        self.revalidate_unchanged = revalidate;
        self
    }

    /// Sets whether aggregate pseudo-properties are notified.
    pub fn with_notify_aggregates(mut self, notify: bool) -> Self {
        self.notify_aggregates = notify;
        self
    }
}
