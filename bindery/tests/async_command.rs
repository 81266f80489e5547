mod common;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use bindery::command::{AsyncCommand, AsyncRelayCommand, Command, IS_BUSY};
use bindery::error::CommandError;
use futures::FutureExt;
use tokio::sync::{Notify, mpsc};

use common::{EventLog, init_logging};

fn busy_log<P: Send + 'static>(command: &AsyncRelayCommand<P>) -> EventLog {
    let log = EventLog::default();
    let sink = log.clone();
    let observed = command.clone();
    command.notifier().property_changed().subscribe(move |e| {
        if e.property == IS_BUSY {
            sink.push(observed.is_busy().to_string());
        }
    });
    log
}

async fn explode() -> Result<(), String> {
    panic!("kaboom")
}

#[tokio::test]
async fn test_busy_transitions_on_success() {
    init_logging();
    let command = AsyncRelayCommand::new(|| async { Ok::<(), String>(()) });
    let log = busy_log(&command);
    assert!(!command.is_busy());

    command.execute_async(()).await.unwrap();

    assert!(!command.is_busy());
    assert_eq!(log.entries(), vec!["true", "false"]);
}

#[tokio::test]
async fn test_busy_while_running() {
    let gate = Arc::new(Notify::new());
    let opened = Arc::clone(&gate);
    let command = AsyncRelayCommand::new(move || {
        let opened = Arc::clone(&opened);
        async move {
            opened.notified().await;
            Ok::<(), String>(())
        }
    });

    let running = tokio::spawn(command.execute_async(()));
    assert!(command.is_busy());

    gate.notify_one();
    running.await.unwrap().unwrap();
    assert!(!command.is_busy());
}

#[tokio::test]
async fn test_failure_clears_busy_and_reaches_caller() {
    let command = AsyncRelayCommand::new(|| async { Err::<(), _>("boom".to_string()) });
    let log = busy_log(&command);

    let err = command.execute_async(()).await.unwrap_err();

    assert!(matches!(err, CommandError::Failed(_)));
    assert_eq!(err.to_string(), "Command failed: boom");
    assert!(!command.is_busy());
    assert_eq!(log.entries(), vec!["true", "false"]);
}

#[tokio::test]
async fn test_panic_clears_busy_and_unwinds_to_caller() {
    let command = AsyncRelayCommand::new(explode);

    let outcome = AssertUnwindSafe(command.execute_async(())).catch_unwind().await;

    assert!(outcome.is_err());
    assert!(!command.is_busy());
}

#[tokio::test]
async fn test_dropping_execution_clears_busy() {
    let command = AsyncRelayCommand::new(|| async { Ok::<(), String>(()) });

    let pending = command.execute_async(());
    assert!(command.is_busy());
    drop(pending);

    assert!(!command.is_busy());
}

#[tokio::test]
async fn test_overlapping_executions_stay_busy_until_last_finishes() {
    let command = AsyncRelayCommand::with_parameter(|gate: Arc<Notify>| async move {
        gate.notified().await;
        Ok::<(), String>(())
    });
    let log = busy_log(&command);
    let first_gate = Arc::new(Notify::new());
    let second_gate = Arc::new(Notify::new());

    let first = tokio::spawn(command.execute_async(Arc::clone(&first_gate)));
    let second = tokio::spawn(command.execute_async(Arc::clone(&second_gate)));

    first_gate.notify_one();
    first.await.unwrap().unwrap();
    assert!(command.is_busy());

    second_gate.notify_one();
    second.await.unwrap().unwrap();
    assert!(!command.is_busy());
    assert_eq!(log.entries(), vec!["true", "false"]);
}

#[test]
fn test_busy_holds_across_threads_while_any_execution_is_held() {
    init_logging();
    let command = AsyncRelayCommand::new(|| async { Ok::<(), String>(()) });
    let log = busy_log(&command);

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let command = command.clone();
            std::thread::spawn(move || {
                let mut idle_while_held = 0;
                for _ in 0..1_000 {
                    let execution = command.execute_async(());
                    if !command.is_busy() {
                        idle_while_held += 1;
                    }
                    drop(execution);
                }
                idle_while_held
            })
        })
        .collect();

    let idle_while_held: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();

    assert_eq!(idle_while_held, 0);
    assert!(!command.is_busy());

    let entries = log.entries();
    assert_eq!(entries.len() % 2, 0);
    for (i, entry) in entries.iter().enumerate() {
        let expected = if i % 2 == 0 { "true" } else { "false" };
        assert_eq!(entry, expected, "IsBusy transition {} out of order", i);
    }
}

#[tokio::test]
async fn test_fire_and_forget_failure_is_surfaced() {
    let command = AsyncRelayCommand::new(|| async { Err::<(), _>("lost".to_string()) });
    let (tx, mut rx) = mpsc::unbounded_channel();
    command.faults().subscribe(move |err| {
        let _ = tx.send(err.to_string());
    });

    command.execute(());

    let fault = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fault, "Command failed: lost");
}

#[tokio::test]
async fn test_fire_and_forget_panic_is_surfaced() {
    let command = AsyncRelayCommand::new(explode);
    let (tx, mut rx) = mpsc::unbounded_channel();
    command.faults().subscribe(move |err: &CommandError| {
        let _ = tx.send((err.is_panic(), err.to_string()));
    });

    command.execute(());

    let (is_panic, message) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(is_panic);
    assert!(message.contains("kaboom"));
    assert!(!command.is_busy());
}

#[test]
fn test_fire_and_forget_without_runtime_is_surfaced() {
    let command = AsyncRelayCommand::new(|| async { Ok::<(), String>(()) });
    let log = EventLog::default();
    let sink = log.clone();
    command
        .faults()
        .subscribe(move |err| sink.push(err.to_string()));

    command.execute(());

    assert_eq!(
        log.entries(),
        vec![CommandError::NoRuntime.to_string()]
    );
    assert!(!command.is_busy());
}

#[tokio::test]
async fn test_guard_with_parameter() {
    let command = AsyncRelayCommand::with_parameter(|_: u32| async { Ok::<(), String>(()) })
        .with_guard(|n| *n > 0);

    assert!(command.can_execute(&1));
    assert!(!command.can_execute(&0));
}

#[tokio::test]
async fn test_usable_through_async_command_trait() {
    let command: Box<dyn AsyncCommand> =
        Box::new(AsyncRelayCommand::new(|| async { Ok::<(), String>(()) }));

    command.execute_async(()).await.unwrap();

    assert!(!command.is_busy());
    assert!(command.notifier().property_changed().is_empty());
}
