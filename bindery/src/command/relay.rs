//! Synchronous relay command.

use std::sync::Arc;

use super::{CanExecuteChanged, Command};
use crate::observer::ObserverList;

type Action<P> = Arc<dyn Fn(P) + Send + Sync>;
type Guard<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;

/// A command that forwards to a closure.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use bindery::command::{Command, RelayCommand};
///
/// let clicks = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&clicks);
/// let command = RelayCommand::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// if command.can_execute(&()) {
///     command.execute(());
/// }
/// assert_eq!(clicks.load(Ordering::SeqCst), 1);
/// ```
pub struct RelayCommand<P = ()> {
    action: Action<P>,
    guard: Guard<P>,
    can_execute_changed: Arc<ObserverList<CanExecuteChanged>>,
}

impl RelayCommand<()> {
    /// Create a parameterless command that is always executable.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::with_parameter(move |()| action())
    }
}

impl<P: 'static> RelayCommand<P> {
    /// Create a command taking a parameter, always executable.
    pub fn with_parameter<F>(action: F) -> Self
    where
        F: Fn(P) + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(action),
            guard: Arc::new(|_| true),
            can_execute_changed: Arc::new(ObserverList::new()),
        }
    }

    /// Replace the guard predicate.
    pub fn with_guard<G>(mut self, guard: G) -> Self
    where
        G: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.guard = Arc::new(guard);
        self
    }
}

impl<P> Command<P> for RelayCommand<P> {
    fn can_execute(&self, parameter: &P) -> bool {
        (self.guard)(parameter)
    }

    fn execute(&self, parameter: P) {
        (self.action)(parameter);
    }

    fn can_execute_changed(&self) -> &ObserverList<CanExecuteChanged> {
        &self.can_execute_changed
    }
}

impl<P> Clone for RelayCommand<P> {
    fn clone(&self) -> Self {
        Self {
            action: Arc::clone(&self.action),
            guard: Arc::clone(&self.guard),
            can_execute_changed: Arc::clone(&self.can_execute_changed),
        }
    }
}

impl<P> std::fmt::Debug for RelayCommand<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayCommand")
            .field("can_execute_changed", &self.can_execute_changed)
            .finish_non_exhaustive()
    }
}
