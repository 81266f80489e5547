use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bindery::command::{Command, RelayCommand};

#[test]
fn test_execute_runs_action() {
    let executed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&executed);
    let command = RelayCommand::new(move || flag.store(true, Ordering::SeqCst));

    command.execute(());

    assert!(executed.load(Ordering::SeqCst));
}

#[test]
fn test_can_execute_defaults_to_true() {
    let command = RelayCommand::new(|| {});
    assert!(command.can_execute(&()));
}

#[test]
fn test_can_execute_with_guard_false() {
    let command = RelayCommand::new(|| {}).with_guard(|_| false);
    assert!(!command.can_execute(&()));
}

#[test]
fn test_execute_does_not_recheck_guard() {
    let executed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&executed);
    let command =
        RelayCommand::new(move || flag.store(true, Ordering::SeqCst)).with_guard(|_| false);

    command.execute(());

    assert!(executed.load(Ordering::SeqCst));
}

#[test]
fn test_execute_with_string_parameter() {
    let sentence = "Hello world !";
    let executed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&executed);
    let command = RelayCommand::with_parameter(move |s: String| {
        flag.store(s == sentence, Ordering::SeqCst)
    });

    command.execute(sentence.to_string());

    assert!(executed.load(Ordering::SeqCst));
}

#[test]
fn test_execute_with_none_parameter() {
    let executed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&executed);
    let command = RelayCommand::with_parameter(move |s: Option<String>| {
        flag.store(s.is_none(), Ordering::SeqCst)
    });

    command.execute(None);

    assert!(executed.load(Ordering::SeqCst));
}

#[test]
fn test_execute_with_integer_parameter() {
    let executed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&executed);
    let command = RelayCommand::with_parameter(move |n: i32| flag.store(n == 42, Ordering::SeqCst));

    command.execute(42);

    assert!(executed.load(Ordering::SeqCst));
}

#[test]
fn test_can_execute_with_string_parameter() {
    let command = RelayCommand::with_parameter(|_: Option<String>| {})
        .with_guard(|s| s.as_deref().is_some_and(|s| !s.is_empty()));

    assert!(command.can_execute(&Some("Hello world !".to_string())));
    assert!(!command.can_execute(&None));
    assert!(!command.can_execute(&Some(String::new())));
}

#[test]
fn test_can_execute_with_optional_integer_parameter() {
    let command = RelayCommand::with_parameter(|_: Option<i32>| {}).with_guard(|n| n.is_none());

    assert!(command.can_execute(&None));
    assert!(!command.can_execute(&Some(42)));
}

#[test]
fn test_notify_can_execute_changed_reaches_subscribers() {
    let enabled = Arc::new(AtomicBool::new(false));
    let guard_flag = Arc::clone(&enabled);
    let command = RelayCommand::new(|| {}).with_guard(move |_| guard_flag.load(Ordering::SeqCst));
    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notifications);
    command.can_execute_changed().subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!command.can_execute(&()));
    enabled.store(true, Ordering::SeqCst);
    command.notify_can_execute_changed();

    assert_eq!(notifications.load(Ordering::SeqCst), 1);
    assert!(command.can_execute(&()));
}

#[test]
fn test_clones_share_subscribers() {
    let command = RelayCommand::new(|| {});
    let clone = command.clone();
    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notifications);
    command.can_execute_changed().subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    clone.notify_can_execute_changed();

    assert_eq!(notifications.load(Ordering::SeqCst), 1);
}

#[test]
fn test_command_as_trait_object() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let command: Box<dyn Command<usize>> =
        Box::new(RelayCommand::with_parameter(move |n: usize| {
            counter.fetch_add(n, Ordering::SeqCst);
        }));

    if command.can_execute(&3) {
        command.execute(3);
    }

    assert_eq!(count.load(Ordering::SeqCst), 3);
}
