//! TUI application state management.

use crate::execution::{ExecutionResult, Outcome};
use crate::runtime::Phase;
use crate::utils::unicode::{next_boundary, prev_boundary, row_col};

/// Shown instead of evaluating while the runtime is not ready.
pub const LOADING_MESSAGE: &str = "Python is still loading, please wait...";

const HINTS: &str = "ctrl+r run | ctrl+l clear | F1 help | esc quit";

/// What the output field currently holds, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Empty,
    Loading,
    Value,
    Fault,
}

/// Application state for the TUI
#[derive(Debug)]
pub struct App {
    /// Pending source text
    pub input: String,
    /// Cursor position in input (byte index)
    pub input_cursor: usize,
    /// Text of the output field; overwritten on every trigger
    pub output: String,
    pub output_kind: OutputKind,
    /// Scroll offset for the output field
    pub output_scroll: u16,
    /// An evaluation is in flight
    pub evaluating: bool,
    /// Last known bootstrap phase
    pub phase: Phase,
    /// Status message to display
    pub status_message: String,
    /// Whether to show help
    pub show_help: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            input_cursor: 0,
            output: String::new(),
            output_kind: OutputKind::Empty,
            output_scroll: 0,
            evaluating: false,
            phase: Phase::Starting,
            status_message: format!("Loading Python... | {}", HINTS),
            show_help: false,
        }
    }

    /// Handle the run action. Returns the source text to evaluate, or `None`
    /// when nothing must reach the interpreter.
    pub fn trigger(&mut self, ready: bool) -> Option<String> {
        if !ready {
            self.set_output(LOADING_MESSAGE.to_string(), OutputKind::Loading);
            return None;
        }
        if self.evaluating {
            self.status_message = format!("Still running the previous evaluation | {}", HINTS);
            return None;
        }
        self.evaluating = true;
        self.status_message = format!("Running... | {}", HINTS);
        Some(self.input.clone())
    }

    pub fn show_result(&mut self, result: &ExecutionResult) {
        self.evaluating = false;
        let kind = match result.outcome {
            Outcome::Fault(_) => OutputKind::Fault,
            Outcome::Value(_) => OutputKind::Value,
        };
        self.set_output(result.render(), kind);
        self.update_status_message();
    }

    /// The interpreter broke while evaluating; report it like a fault.
    pub fn show_failure(&mut self, error: &str) {
        self.evaluating = false;
        self.set_output(error.to_string(), OutputKind::Fault);
        self.update_status_message();
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.update_status_message();
    }

    fn set_output(&mut self, text: String, kind: OutputKind) {
        self.output = text;
        self.output_kind = kind;
        self.output_scroll = 0;
    }

    fn update_status_message(&mut self) {
        let state = match &self.phase {
            Phase::Starting => "Loading Python...".to_string(),
            Phase::Ready => "Python ready".to_string(),
            Phase::Failed(reason) => {
                let first = reason.lines().next().unwrap_or_default();
                format!("Startup failed: {}", first)
            }
        };
        self.status_message = format!("{} | {}", state, HINTS);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn scroll_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = self.output.lines().count().saturating_sub(1) as u16;
        if self.output_scroll < max {
            self.output_scroll += 1;
        }
    }

    // ----- Input editing helpers -----
    pub fn move_cursor_left(&mut self) {
        self.input_cursor = prev_boundary(&self.input, self.input_cursor);
    }

    pub fn move_cursor_right(&mut self) {
        self.input_cursor = next_boundary(&self.input, self.input_cursor);
    }

    pub fn move_cursor_home(&mut self) {
        self.input_cursor = self.input[..self.input_cursor]
            .rfind('\n')
            .map(|p| p + 1)
            .unwrap_or(0);
    }

    pub fn move_cursor_end(&mut self) {
        self.input_cursor = self.input[self.input_cursor..]
            .find('\n')
            .map(|p| self.input_cursor + p)
            .unwrap_or(self.input.len());
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.input_cursor, c);
        self.input_cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.input.insert_str(self.input_cursor, s);
        self.input_cursor += s.len();
    }

    pub fn backspace(&mut self) {
        if self.input_cursor > 0 {
            let start = prev_boundary(&self.input, self.input_cursor);
            self.input.replace_range(start..self.input_cursor, "");
            self.input_cursor = start;
        }
    }

    pub fn delete(&mut self) {
        if self.input_cursor < self.input.len() {
            let end = next_boundary(&self.input, self.input_cursor);
            self.input.replace_range(self.input_cursor..end, "");
        }
    }

    /// Clear input buffer
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Cursor row and column inside the input field
    pub fn cursor_position(&self) -> (usize, usize) {
        row_col(&self.input, self.input_cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_before_ready_shows_loading_whatever_the_input() {
        let mut app = App::new();
        for text in ["", "x = 5", "import sys\nsys.exit()"] {
            app.clear_input();
            app.insert_str(text);
            assert_eq!(app.trigger(false), None);
            assert_eq!(app.output, LOADING_MESSAGE);
            assert_eq!(app.output_kind, OutputKind::Loading);
            assert!(!app.evaluating);
        }
    }

    #[test]
    fn trigger_after_ready_hands_out_the_same_input() {
        let mut app = App::new();
        app.insert_str("x + 1");
        assert_eq!(app.trigger(false), None);
        app.set_phase(Phase::Ready);
        assert_eq!(app.trigger(true).as_deref(), Some("x + 1"));
        assert!(app.evaluating);
        // Input stays in the field after submission.
        assert_eq!(app.input, "x + 1");
    }

    #[test]
    fn second_trigger_while_evaluating_is_ignored() {
        let mut app = App::new();
        assert!(app.trigger(true).is_some());
        assert_eq!(app.trigger(true), None);
        app.show_result(&ExecutionResult::value(Some("6".into())));
        assert!(app.trigger(true).is_some());
    }

    #[test]
    fn result_overwrites_output() {
        let mut app = App::new();
        app.trigger(false);
        app.trigger(true);
        app.show_result(&ExecutionResult::value(Some("6".into())));
        assert_eq!(app.output, "6");
        assert_eq!(app.output_kind, OutputKind::Value);

        app.trigger(true);
        app.show_result(&ExecutionResult::fault("NameError: name 'y' is not defined\n"));
        assert_eq!(app.output, "NameError: name 'y' is not defined");
        assert_eq!(app.output_kind, OutputKind::Fault);
    }

    #[test]
    fn failed_phase_is_reported_in_status() {
        let mut app = App::new();
        app.set_phase(Phase::Failed("failed to install package `x`:\nERROR: nope".into()));
        assert!(app.status_message.starts_with("Startup failed: failed to install package `x`:"));
        assert_eq!(app.trigger(false), None);
        assert_eq!(app.output, LOADING_MESSAGE);
    }

    #[test]
    fn editing_respects_char_boundaries() {
        let mut app = App::new();
        app.insert_str("s = '\u{e9}'");
        app.move_cursor_left();
        app.backspace();
        assert_eq!(app.input, "s = ''");
        app.move_cursor_home();
        app.delete();
        assert_eq!(app.input, " = ''");
        app.move_cursor_end();
        app.insert_char('\n');
        app.insert_char('s');
        assert_eq!(app.cursor_position(), (1, 1));
    }
}
