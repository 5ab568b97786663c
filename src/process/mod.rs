//! Interpreter process management (startup/IO).

use tokio::process::{Child, ChildStdin, ChildStdout};

pub mod python;

/// A running interpreter child with its protocol pipes taken out.
///
/// Dropping the handle kills the child.
pub struct ProcessHandle {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.child.id())
            .finish()
    }
}
