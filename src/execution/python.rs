//! Python execution over the child's NDJSON protocol.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout};

use super::{ExecutionResult, Interpreter};
use crate::error::RuntimeError;
use crate::process::{python::start_python, ProcessHandle};

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request<'a> {
    Install { package: &'a str },
    Eval { code: &'a str },
}

#[derive(Debug, Deserialize)]
struct Response {
    ok: bool,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
}

impl From<Response> for ExecutionResult {
    fn from(r: Response) -> Self {
        let base = if r.ok {
            ExecutionResult::value(r.value)
        } else {
            ExecutionResult::fault(r.error.unwrap_or_default())
        };
        ExecutionResult {
            stdout: r.stdout,
            stderr: r.stderr,
            ..base
        }
    }
}

#[derive(Debug, Deserialize)]
struct Handshake {
    event: String,
    #[serde(default)]
    python: String,
}

/// A live Python child holding the persistent `__main__` namespace.
pub struct PythonSession {
    _child: Child,
    writer: BufWriter<ChildStdin>,
    reader: BufReader<ChildStdout>,
}

impl PythonSession {
    /// Start `program` and wait for its handshake.
    pub async fn launch(program: &str) -> Result<Self, RuntimeError> {
        let handle = start_python(program).await?;
        Self::connect(handle).await
    }

    async fn connect(handle: ProcessHandle) -> Result<Self, RuntimeError> {
        let ProcessHandle {
            child,
            stdin,
            stdout,
        } = handle;
        let mut session = Self {
            _child: child,
            writer: BufWriter::new(stdin),
            reader: BufReader::new(stdout),
        };
        let line = session
            .read_line()
            .await
            .map_err(|e| RuntimeError::Handshake(e.to_string()))?;
        let hello: Handshake = serde_json::from_str(&line)
            .map_err(|_| RuntimeError::Handshake(format!("unexpected first line: {}", line.trim())))?;
        if hello.event != "ready" {
            return Err(RuntimeError::Handshake(format!("unexpected event `{}`", hello.event)));
        }
        tracing::info!(python = %hello.python, "interpreter ready for requests");
        Ok(session)
    }

    async fn read_line(&mut self) -> Result<String, RuntimeError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(RuntimeError::Closed);
        }
        Ok(line)
    }

    async fn request(&mut self, request: &Request<'_>) -> Result<Response, RuntimeError> {
        let mut payload = serde_json::to_vec(request)?;
        payload.push(b'\n');
        self.writer.write_all(&payload).await?;
        self.writer.flush().await?;
        let line = self.read_line().await?;
        Ok(serde_json::from_str(&line)?)
    }
}

impl Interpreter for PythonSession {
    async fn install(&mut self, package: &str) -> Result<(), RuntimeError> {
        let response = self.request(&Request::Install { package }).await?;
        if response.ok {
            Ok(())
        } else {
            Err(RuntimeError::Install {
                package: package.to_string(),
                detail: response.error.unwrap_or_default(),
            })
        }
    }

    async fn evaluate(&mut self, code: &str) -> Result<ExecutionResult, RuntimeError> {
        let response = self.request(&Request::Eval { code }).await?;
        Ok(response.into())
    }
}
