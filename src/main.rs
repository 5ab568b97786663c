mod cli;
mod config;
mod error;
mod execution;
mod handlers;
mod observability;
mod printer;
mod process;
mod runtime;
mod tui;
mod utils;

use anyhow::Result;
use config::Config;
use observability::TracingMode;
use runtime::RuntimeSettings;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:?}", e);
        // Exit here: a blocked stdin read would otherwise keep the runtime alive.
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = cli::Cli::parse();

    // Load config, then let flags override it
    let mut cfg = Config::load();
    if let Some(python) = &args.python {
        cfg.set("PYEVAL_PYTHON", python);
    }
    if let Some(package) = &args.package {
        cfg.set("PYEVAL_PACKAGE", package);
    }
    if args.skip_install {
        cfg.set("PYEVAL_SKIP_INSTALL", "true");
    }
    if let Some(level) = &args.log_level {
        cfg.set("PYEVAL_LOG_LEVEL", level);
    }

    let mode = if args.ui { TracingMode::Ui } else { TracingMode::Cli };
    observability::init_tracing(&cfg, mode);

    let settings = RuntimeSettings::from_config(&cfg);
    tracing::debug!(
        config = %cfg.config_path.display(),
        python = %settings.python,
        package = ?settings.package,
        "starting"
    );

    if args.ui {
        handlers::repl::run(settings).await
    } else {
        handlers::stdin::run(settings).await
    }
}
