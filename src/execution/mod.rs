//! Execution engine: interpreter contract and result types.

use std::future::Future;

use crate::error::RuntimeError;

pub mod python;
#[cfg(test)]
pub mod scripted;

/// What a single evaluation unit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rendered value of the trailing expression; `None` for statements.
    Value(Option<String>),
    /// Rendered exception raised by the unit.
    Fault(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub outcome: Outcome,
}

impl ExecutionResult {
    pub fn value(value: Option<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            outcome: Outcome::Value(value),
        }
    }

    pub fn fault(text: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            outcome: Outcome::Fault(text.into()),
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self.outcome, Outcome::Fault(_))
    }

    /// Text shown in a single output field: captured output first, then the
    /// value or the fault.
    pub fn render(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        match &self.outcome {
            Outcome::Value(Some(v)) => text.push_str(v),
            Outcome::Value(None) => {}
            Outcome::Fault(f) => text.push_str(f.trim_end()),
        }
        text
    }
}

/// An embedded interpreter with one persistent top-level namespace.
///
/// Implementations are owned by a single task; callers serialise access.
pub trait Interpreter: Send + 'static {
    /// Install a named package so later units can import it.
    fn install(&mut self, package: &str) -> impl Future<Output = Result<(), RuntimeError>> + Send;

    /// Execute `code` and report its value or fault. An `Err` means the
    /// interpreter itself broke, not that the code raised.
    fn evaluate(
        &mut self,
        code: &str,
    ) -> impl Future<Output = Result<ExecutionResult, RuntimeError>> + Send;
}
