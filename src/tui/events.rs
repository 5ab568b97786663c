//! Custom event types for TUI application.

use crossterm::event::KeyEvent;

use crate::execution::ExecutionResult;
use crate::runtime::Phase;

/// Events that can occur in the TUI application
#[derive(Debug)]
pub enum TuiEvent {
    /// User keyboard input
    Key(KeyEvent),
    /// Bracketed paste content
    Paste(String),
    /// Bootstrap settled
    Phase(Phase),
    /// Code execution result returned from interpreter
    Evaluated(ExecutionResult),
    /// The interpreter broke while evaluating
    EvaluationFailed(String),
}

/// What the main loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    Evaluate(String),
}
