//! In-memory interpreter used by unit tests.
//!
//! Understands just enough to exercise the loops: `name = 123`, `name + 1`,
//! integer literals, `print(text)`, `raise Kind`, and `__crash__` which breaks
//! the transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{ExecutionResult, Interpreter, Outcome};
use crate::error::RuntimeError;

#[derive(Debug, Default, Clone)]
pub struct Scripted {
    namespace: HashMap<String, i64>,
    /// Every unit passed to `evaluate`, in call order.
    pub calls: Arc<Mutex<Vec<String>>>,
    pub installed: Arc<Mutex<Vec<String>>>,
    pub reject_install: bool,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_install() -> Self {
        Self {
            reject_install: true,
            ..Self::default()
        }
    }

    fn run(&mut self, code: &str) -> Result<ExecutionResult, RuntimeError> {
        let code = code.trim();
        if code == "__crash__" {
            return Err(RuntimeError::Closed);
        }
        if let Some(kind) = code.strip_prefix("raise ") {
            return Ok(ExecutionResult::fault(format!("Traceback (most recent call last):\n{}\n", kind)));
        }
        if let Some(text) = code.strip_prefix("print(").and_then(|r| r.strip_suffix(')')) {
            return Ok(ExecutionResult {
                stdout: format!("{}\n", text),
                stderr: String::new(),
                outcome: Outcome::Value(None),
            });
        }
        if let Some((name, value)) = code.split_once('=') {
            return match value.trim().parse::<i64>() {
                Ok(v) => {
                    self.namespace.insert(name.trim().to_string(), v);
                    Ok(ExecutionResult::value(None))
                }
                Err(_) => Ok(ExecutionResult::fault("SyntaxError: invalid syntax")),
            };
        }
        if let Some((name, rhs)) = code.split_once('+') {
            let lhs = self.lookup(name.trim());
            let rhs = rhs.trim().parse::<i64>().ok();
            return Ok(match (lhs, rhs) {
                (Some(a), Some(b)) => ExecutionResult::value(Some((a + b).to_string())),
                _ => ExecutionResult::fault(format!("NameError: name '{}' is not defined", name.trim())),
            });
        }
        if code.is_empty() {
            return Ok(ExecutionResult::value(None));
        }
        Ok(match self.lookup(code) {
            Some(v) => ExecutionResult::value(Some(v.to_string())),
            None => ExecutionResult::fault(format!("NameError: name '{}' is not defined", code)),
        })
    }

    fn lookup(&self, token: &str) -> Option<i64> {
        token.parse::<i64>().ok().or_else(|| self.namespace.get(token).copied())
    }
}

impl Interpreter for Scripted {
    async fn install(&mut self, package: &str) -> Result<(), RuntimeError> {
        if self.reject_install {
            return Err(RuntimeError::Install {
                package: package.to_string(),
                detail: "No matching distribution found".into(),
            });
        }
        self.installed.lock().unwrap().push(package.to_string());
        Ok(())
    }

    async fn evaluate(&mut self, code: &str) -> Result<ExecutionResult, RuntimeError> {
        self.calls.lock().unwrap().push(code.to_string());
        self.run(code)
    }
}
