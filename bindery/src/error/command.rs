//! Command fault types

use std::any::Any;

/// Boxed error returned by a failing command action.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A fault raised while executing an asynchronous command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The wrapped action returned an error.
    #[error("Command failed: {0}")]
    Failed(#[source] BoxError),

    /// The wrapped action panicked while running detached.
    #[error("Command panicked: {message}")]
    Panicked {
        /// Panic message extracted from the panic payload.
        message: String,
    },

    /// Fire-and-forget execution was requested outside a tokio runtime.
    #[error("No async runtime available to execute the command")]
    NoRuntime,
}

impl CommandError {
    /// Wraps any error as a command failure.
    pub fn failed(err: impl Into<BoxError>) -> Self {
        Self::Failed(err.into())
    }

    /// Returns `true` if the action panicked rather than returning an error.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }
}

/// Message carried by a panic payload.
///
/// Pass the payload itself (`&*payload`), not the box holding it. Payloads
/// other than `&str` or `String` yield `"Unknown panic"`.
pub fn extract_panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Unknown panic".to_owned())
}
