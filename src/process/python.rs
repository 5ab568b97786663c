//! Python interpreter process bootstrap and stderr glue.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

use super::ProcessHandle;
use crate::error::RuntimeError;

/// Program run inside the child: a request loop over one shared namespace.
pub const BOOTSTRAP: &str = include_str!("bootstrap.py");

pub fn default_program() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

/// Spawn `program` running the bootstrap loop with piped stdio.
pub async fn start_python(program: &str) -> Result<ProcessHandle, RuntimeError> {
    let mut cmd = Command::new(program);
    cmd.arg("-u") // unbuffered
        .arg("-c")
        .arg(BOOTSTRAP)
        .env("PYTHONIOENCODING", "utf-8")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child: Child = cmd.spawn().map_err(|source| RuntimeError::Spawn {
        program: program.to_string(),
        source,
    })?;
    tracing::debug!(program, pid = ?child.id(), "interpreter process spawned");

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| RuntimeError::Startup("no stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RuntimeError::Startup("no stdout".into()))?;

    // The child's own stderr never reaches the user directly: it would
    // interleave with results on the CLI and corrupt the screen in the UI.
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::warn!(target: "pyeval::python", "{}", line);
            }
        });
    }

    Ok(ProcessHandle {
        child,
        stdin,
        stdout,
    })
}
