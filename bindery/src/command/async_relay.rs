//! Asynchronous relay command with an observable busy flag.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::BoxFuture;

use super::{AsyncCommand, CanExecuteChanged, Command};
use crate::error::{BoxError, CommandError, extract_panic_message};
use crate::notifier::ChangeNotifier;
use crate::observer::ObserverList;

/// Property name carried by busy-state notifications.
pub const IS_BUSY: &str = "IsBusy";

type AsyncAction<P> =
    Arc<dyn Fn(P) -> BoxFuture<'static, Result<(), CommandError>> + Send + Sync>;
type Guard<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;

/// Busy flag shared by a command and its in-flight executions.
///
/// The in-flight count is only changed under its lock, and the 0 -> 1 and
/// 1 -> 0 transitions store the flag and notify before the lock is released.
/// `IsBusy` subscribers must not start or finish executions of the same
/// command from inside the callback.
#[derive(Debug, Default)]
struct BusyState {
    in_flight: Mutex<usize>,
    busy: AtomicBool,
    notifier: ChangeNotifier,
}

impl BusyState {
    fn enter(&self) {
        let mut in_flight = self.lock();
        *in_flight += 1;
        if *in_flight == 1 {
            self.transition(true);
        }
    }

    fn exit(&self) {
        let mut in_flight = self.lock();
        *in_flight = in_flight.saturating_sub(1);
        if *in_flight == 0 {
            self.transition(false);
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Caller holds the in-flight lock.
    fn transition(&self, busy: bool) {
        self.notifier.notify_changing(IS_BUSY);
        self.busy.store(busy, Ordering::SeqCst);
        self.notifier.notify_changed(IS_BUSY);
    }
}

/// Marks one execution as in flight until dropped.
struct BusyGuard {
    state: Arc<BusyState>,
}

impl BusyGuard {
    fn enter(state: Arc<BusyState>) -> Self {
        state.enter();
        Self { state }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.exit();
    }
}

/// A command whose action is a future.
///
/// `IsBusy` goes `false → true` when an execution starts and back to `false`
/// when the last in-flight execution ends, however it ends.
///
/// # Example
///
/// ```ignore
/// let save = AsyncRelayCommand::new(move || {
///     let store = store.clone();
///     async move { store.save().await }
/// });
///
/// save.notifier().property_changed().subscribe(|e| log::info!("{}", e.property));
/// save.execute_async(()).await?;
/// ```
pub struct AsyncRelayCommand<P = ()> {
    action: AsyncAction<P>,
    guard: Guard<P>,
    busy: Arc<BusyState>,
    can_execute_changed: Arc<ObserverList<CanExecuteChanged>>,
    faults: Arc<ObserverList<CommandError>>,
}

impl AsyncRelayCommand<()> {
    /// Create a parameterless command that is always executable.
    pub fn new<F, Fut, E>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        Self::with_parameter(move |()| action())
    }
}

impl<P: Send + 'static> AsyncRelayCommand<P> {
    /// Create a command taking a parameter, always executable.
    pub fn with_parameter<F, Fut, E>(action: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let action: AsyncAction<P> = Arc::new(move |parameter| {
            let fut = action(parameter);
            async move { fut.await.map_err(|err| CommandError::Failed(err.into())) }.boxed()
        });

        Self {
            action,
            guard: Arc::new(|_| true),
            busy: Arc::new(BusyState::default()),
            can_execute_changed: Arc::new(ObserverList::new()),
            faults: Arc::new(ObserverList::new()),
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

    /// Run the action and wait for it. See [`AsyncCommand::execute_async`].
    pub fn execute_async(&self, parameter: P) -> BoxFuture<'static, Result<(), CommandError>> {
        let busy = BusyGuard::enter(Arc::clone(&self.busy));
        let fut = (self.action)(parameter);

        async move {
            let _busy = busy;
            fut.await
        }
        .boxed()
    }

    /// Returns `true` while an execution is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.busy.load(Ordering::SeqCst)
    }

    /// Notifier carrying `IsBusy` transitions.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.busy.notifier
    }

    /// Faults from fire-and-forget executions.
    ///
    /// Every `Err` or panic from [`Command::execute`] is logged and emitted
    /// here.
    pub fn faults(&self) -> &ObserverList<CommandError> {
        &self.faults
    }
}

fn report_fault(faults: &ObserverList<CommandError>, err: CommandError) {
    log::error!("[command] unhandled fault: {}", err);
    faults.emit(&err);
}

impl<P: Send + 'static> Command<P> for AsyncRelayCommand<P> {
    fn can_execute(&self, parameter: &P) -> bool {
        (self.guard)(parameter)
    }

    /// Spawn the action on the current tokio runtime without waiting.
    fn execute(&self, parameter: P) {
        let faults = Arc::clone(&self.faults);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            report_fault(&faults, CommandError::NoRuntime);
            return;
        };

        let fut = self.execute_async(parameter);
        handle.spawn(async move {
            let outcome = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(CommandError::Panicked {
                    message: extract_panic_message(&*panic),
                }),
            };

            if let Err(err) = outcome {
                report_fault(&faults, err);
            }
        });
    }

    fn can_execute_changed(&self) -> &ObserverList<CanExecuteChanged> {
        &self.can_execute_changed
    }
}

impl<P: Send + 'static> AsyncCommand<P> for AsyncRelayCommand<P> {
    fn execute_async(&self, parameter: P) -> BoxFuture<'static, Result<(), CommandError>> {
        AsyncRelayCommand::execute_async(self, parameter)
    }

    fn is_busy(&self) -> bool {
        AsyncRelayCommand::is_busy(self)
    }

    fn notifier(&self) -> &ChangeNotifier {
        AsyncRelayCommand::notifier(self)
    }
}

impl<P> Clone for AsyncRelayCommand<P> {
    fn clone(&self) -> Self {
        Self {
            action: Arc::clone(&self.action),
            guard: Arc::clone(&self.guard),
            busy: Arc::clone(&self.busy),
            can_execute_changed: Arc::clone(&self.can_execute_changed),
            faults: Arc::clone(&self.faults),
        }
    }
}

impl<P> std::fmt::Debug for AsyncRelayCommand<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRelayCommand")
            .field("busy", &self.busy)
            .finish_non_exhaustive()
    }
}
