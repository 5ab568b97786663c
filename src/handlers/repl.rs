//! Interactive page handler with TUI interface using Ratatui.

use anyhow::Result;
use std::io;

use crate::runtime::RuntimeSettings;
use crate::tui::run_tui;

/// Run the evaluation page
pub async fn run(settings: RuntimeSettings) -> Result<()> {
    // Check if TUI mode is available
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        eprintln!("Warning: TUI mode not available in this environment. --ui requires a proper terminal.");
        eprintln!("Pipe code into pyeval without --ui to evaluate it from stdin instead.");
        return Err(anyhow::anyhow!("TUI mode requires a proper terminal environment"));
    }

    run_tui(settings).await
}
