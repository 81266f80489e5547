//! Commands: actions paired with an executability guard.
//!
//! [`RelayCommand`] runs a synchronous action. [`AsyncRelayCommand`] runs an
//! asynchronous one and exposes an observable `IsBusy` flag so a UI can block
//! re-entry while it runs.
//!
//! Executability is never tracked implicitly: call
//! [`Command::notify_can_execute_changed`] whenever something the guard reads
//! has changed.

mod async_relay;
mod relay;

pub use async_relay::{AsyncRelayCommand, IS_BUSY};
pub use relay::RelayCommand;

use futures::future::BoxFuture;

use crate::error::CommandError;
use crate::notifier::ChangeNotifier;
use crate::observer::ObserverList;

/// Fired when a command's guard may return a different answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanExecuteChanged;

/// An executable unit with a guard predicate.
pub trait Command<P = ()>: Send + Sync {
    /// Evaluate the guard. Side-effect free.
    fn can_execute(&self, parameter: &P) -> bool;

    /// Run the action. The guard is not re-checked.
    fn execute(&self, parameter: P);

    /// Subscribers notified by [`notify_can_execute_changed`](Self::notify_can_execute_changed).
    fn can_execute_changed(&self) -> &ObserverList<CanExecuteChanged>;

    /// Tell subscribers to re-query [`can_execute`](Self::can_execute).
    fn notify_can_execute_changed(&self) {
        self.can_execute_changed().emit(&CanExecuteChanged);
    }
}

/// A command whose action completes asynchronously.
pub trait AsyncCommand<P = ()>: Command<P> {
    /// Run the action and wait for it.
    ///
    /// The command is busy from the call until the returned future finishes
    /// or is dropped. Failures are returned after busy has been cleared.
    fn execute_async(&self, parameter: P) -> BoxFuture<'static, Result<(), CommandError>>;

    /// Returns `true` while an execution is in flight.
    fn is_busy(&self) -> bool;

    /// Notifier carrying `IsBusy` transitions.
    fn notifier(&self) -> &ChangeNotifier;
}
