//! View-model building blocks for UI bindings.
//!
//! - [`notifier`]: property changing/changed notification.
//! - [`validation`]: per-property constraint tables and an error map that
//!   follows property writes, plus whole-object validation off the caller's
//!   thread.
//! - [`command`]: synchronous and asynchronous commands with a guard predicate
//!   and an observable busy flag.
//!
//! Every event is delivered through an [`ObserverList`](observer::ObserverList):
//! synchronous, in registration order, unsubscribed by handle.

pub mod command;
pub mod error;
pub mod notifier;
pub mod observer;
pub mod validation;

pub mod prelude {
    pub use crate::command::{
        AsyncCommand, AsyncRelayCommand, CanExecuteChanged, Command, RelayCommand,
    };
    pub use crate::error::{BindError, CommandError};
    pub use crate::notifier::{ChangeNotifier, PropertyChanged, PropertyChanging};
    pub use crate::observer::{ObserverList, SubscriptionId};
    pub use crate::validation::{
        ErrorsChanged, FailureRecord, PendingValidation, Rules, ValidationConfig, ValidationEngine,
    };
}
