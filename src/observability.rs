//! Tracing initialization.
//!
//! Level comes from `RUST_LOG`, then `PYEVAL_LOG_LEVEL`; `PYEVAL_LOG_JSON=true`
//! switches to JSON lines.

use std::fs::{self, File};
use std::sync::Mutex;

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingMode {
    /// Log to stderr next to evaluation output.
    Cli,
    /// The terminal belongs to the UI: log to `PYEVAL_LOG_FILE` instead.
    Ui,
}

pub fn init_tracing(cfg: &Config, mode: TracingMode) {
    let level = cfg
        .get("PYEVAL_LOG_LEVEL")
        .unwrap_or_else(|| "warn".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));
    let json = cfg.get_bool("PYEVAL_LOG_JSON");

    let _ = match mode {
        TracingMode::Cli => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true);
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.json())
                    .try_init()
            } else {
                tracing_subscriber::registry().with(filter).with(layer).try_init()
            }
        }
        TracingMode::Ui => {
            let path = cfg.log_file();
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let Ok(file) = File::options().create(true).append(true).open(&path) else {
                // Nowhere safe to write; stay silent rather than draw over the UI.
                return;
            };
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true);
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.json())
                    .try_init()
            } else {
                tracing_subscriber::registry().with(filter).with(layer).try_init()
            }
        }
    };
}
