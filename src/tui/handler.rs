//! Async event handler for the TUI evaluation page.

use std::future::Future;
use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;

use super::{
    app::App,
    events::{KeyAction, TuiEvent},
    ui::render_ui,
};
use crate::error::RuntimeError;
use crate::execution::Interpreter;
use crate::runtime::{self, readiness, Phase, Readiness, RuntimeSettings};

/// Run the TUI evaluation page until the user quits.
pub async fn run_tui(settings: RuntimeSettings) -> Result<()> {
    // Check if we're in a proper terminal environment
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!("TUI mode requires a proper terminal environment"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (signal, readiness) = readiness::channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<TuiEvent>();
    let (code_tx, code_rx) = mpsc::unbounded_channel::<String>();

    // Bootstrap runs in the background; the page accepts input meanwhile.
    let worker_tx = event_tx.clone();
    tokio::spawn(async move {
        let startup = runtime::start(&settings, signal);
        evaluation_worker(startup, code_rx, worker_tx).await;
    });

    let phase_tx = event_tx.clone();
    let watched = readiness.clone();
    tokio::spawn(async move {
        let _ = phase_tx.send(TuiEvent::Phase(watched.settled().await));
    });

    let mut app = App::new();
    let result = run_app(&mut terminal, &mut app, &readiness, code_tx, event_tx, event_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Own the interpreter: await bootstrap, then evaluate submitted units one at
/// a time. A failed bootstrap leaves the readiness signal unset, so the page
/// never submits anything and this task just ends.
pub async fn evaluation_worker<I, F>(
    startup: F,
    mut code_rx: mpsc::UnboundedReceiver<String>,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
) where
    I: Interpreter,
    F: Future<Output = Result<I, RuntimeError>>,
{
    let mut interpreter = match startup.await {
        Ok(interpreter) => interpreter,
        Err(e) => {
            tracing::error!(error = %e, "evaluation page will stay in loading state");
            return;
        }
    };

    while let Some(code) = code_rx.recv().await {
        let event = match interpreter.evaluate(&code).await {
            Ok(result) => TuiEvent::Evaluated(result),
            Err(e) => {
                tracing::error!(error = %e, "evaluation did not complete");
                TuiEvent::EvaluationFailed(e.to_string())
            }
        };
        if event_tx.send(event).is_err() {
            break;
        }
    }
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    readiness: &Readiness,
    code_tx: mpsc::UnboundedSender<String>,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
    mut event_rx: mpsc::UnboundedReceiver<TuiEvent>,
) -> Result<()> {
    // Spawn input handler
    let input_tx = event_tx;
    tokio::task::spawn_blocking(move || {
        while !input_tx.is_closed() {
            // Poll for keyboard events
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                let sent = match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => input_tx.send(TuiEvent::Key(key)),
                    Ok(Event::Paste(text)) => input_tx.send(TuiEvent::Paste(text)),
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break; // Channel closed
                }
            }
        }
    });

    loop {
        // Render UI
        terminal.draw(|frame| render_ui(frame, app))?;

        let Some(tui_event) = event_rx.recv().await else {
            break;
        };
        match tui_event {
            TuiEvent::Key(key) => match handle_key_event(app, key, readiness.is_ready()) {
                KeyAction::Quit => break,
                KeyAction::Evaluate(code) => {
                    if code_tx.send(code).is_err() {
                        app.show_failure("interpreter task is gone");
                    }
                }
                KeyAction::None => {}
            },
            TuiEvent::Paste(text) => app.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n")),
            TuiEvent::Phase(phase) => {
                if let Phase::Failed(reason) = &phase {
                    tracing::warn!(reason = %reason, "runtime will not become ready");
                }
                app.set_phase(phase);
            }
            TuiEvent::Evaluated(result) => app.show_result(&result),
            TuiEvent::EvaluationFailed(error) => app.show_failure(&error),
        }
    }

    Ok(())
}

/// Handle keyboard events
pub fn handle_key_event(app: &mut App, key: KeyEvent, ready: bool) -> KeyAction {
    // Help overlay swallows the next key
    if app.show_help {
        app.toggle_help();
        return KeyAction::None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return KeyAction::Quit,
        KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('r') if ctrl => {
            return app.trigger(ready).map(KeyAction::Evaluate).unwrap_or(KeyAction::None);
        }
        KeyCode::F(5) => {
            return app.trigger(ready).map(KeyAction::Evaluate).unwrap_or(KeyAction::None);
        }
        KeyCode::Char('l') if ctrl => app.clear_input(),
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::PageUp => app.scroll_up(),
        KeyCode::PageDown => app.scroll_down(),
        KeyCode::Enter => app.insert_char('\n'),
        KeyCode::Tab => app.insert_str("    "),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_home(),
        KeyCode::End => app.move_cursor_end(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Char(c) if !ctrl => app.insert_char(c),
        _ => {}
    }
    KeyAction::None
}
