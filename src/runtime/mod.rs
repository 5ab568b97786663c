//! Runtime bootstrap: acquire the interpreter, install the package, signal readiness.

use std::future::Future;

use crate::config::Config;
use crate::error::RuntimeError;
use crate::execution::{python::PythonSession, Interpreter};
use crate::process::python::default_program;

pub mod readiness;

pub use readiness::{Phase, ReadySignal, Readiness};

pub const DEFAULT_PACKAGE: &str = "osbot-utils";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    /// Python executable to launch.
    pub python: String,
    /// Package installed before the runtime reports ready; `None` skips it.
    pub package: Option<String>,
}

impl RuntimeSettings {
    pub fn from_config(cfg: &Config) -> Self {
        let python = cfg
            .get("PYEVAL_PYTHON")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| default_program().to_string());
        let package = if cfg.get_bool("PYEVAL_SKIP_INSTALL") {
            None
        } else {
            Some(
                cfg.get("PYEVAL_PACKAGE")
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
            )
        };
        Self { python, package }
    }
}

/// Run `launch`, install `package` into the result, then settle `signal`.
///
/// On failure the signal moves to [`Phase::Failed`] and the error is returned
/// untouched; nothing is retried.
pub async fn bootstrap<I, F>(
    launch: F,
    package: Option<&str>,
    signal: ReadySignal,
) -> Result<I, RuntimeError>
where
    I: Interpreter,
    F: Future<Output = Result<I, RuntimeError>>,
{
    let result = async {
        let mut interpreter = launch.await?;
        if let Some(package) = package {
            tracing::info!(package, "installing package");
            interpreter.install(package).await?;
        }
        Ok::<I, RuntimeError>(interpreter)
    }
    .await;

    match &result {
        Ok(_) => {
            tracing::info!("runtime ready");
            signal.ready();
        }
        Err(e) => {
            tracing::error!(error = %e, "runtime bootstrap failed");
            signal.fail(e.to_string());
        }
    }
    result
}

/// Bootstrap a Python child according to `settings`.
pub async fn start(
    settings: &RuntimeSettings,
    signal: ReadySignal,
) -> Result<PythonSession, RuntimeError> {
    bootstrap(
        PythonSession::launch(&settings.python),
        settings.package.as_deref(),
        signal,
    )
    .await
}
