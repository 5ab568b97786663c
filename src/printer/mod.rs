//! Rendering of evaluation results for text sinks.

use owo_colors::OwoColorize;

use crate::execution::{ExecutionResult, Outcome};

/// Bytes destined for stdout and stderr for one evaluation unit.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub out: String,
    pub err: String,
}

pub struct TextPrinter {
    /// Colour fault text; only set when stderr is a terminal.
    pub color_faults: bool,
}

impl TextPrinter {
    pub fn render(&self, result: &ExecutionResult) -> Rendered {
        let mut out = result.stdout.clone();
        let mut err = result.stderr.clone();
        match &result.outcome {
            Outcome::Value(Some(v)) => {
                out.push_str(v);
                out.push('\n');
            }
            Outcome::Value(None) => {}
            Outcome::Fault(f) => {
                let f = f.trim_end();
                if self.color_faults {
                    err.push_str(&format!("{}", f.red()));
                } else {
                    err.push_str(f);
                }
                err.push('\n');
            }
        }
        Rendered { out, err }
    }
}
