//! Errors raised while talking to the interpreter process.
//!
//! Faults raised by user code are not errors here: they come back as
//! [`crate::execution::Outcome::Fault`] and are rendered like any other result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to start interpreter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("interpreter did not complete its handshake: {0}")]
    Handshake(String),

    #[error("failed to install package `{package}`:\n{detail}")]
    Install { package: String, detail: String },

    #[error("malformed message from interpreter: {0}")]
    Protocol(String),

    #[error("interpreter I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("interpreter process exited")]
    Closed,

    #[error("interpreter failed to start: {0}")]
    Startup(String),
}

impl From<serde_json::Error> for RuntimeError {
    fn from(e: serde_json::Error) -> Self {
        RuntimeError::Protocol(e.to_string())
    }
}
