//! UI layout and rendering logic for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::{App, OutputKind};
use crate::runtime::Phase;

const MAX_INPUT_HEIGHT: u16 = 12;

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let input_lines = app.input.split('\n').count() as u16;
    let input_height = (input_lines + 2).clamp(3, MAX_INPUT_HEIGHT);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),               // Output area
            Constraint::Length(input_height), // Input area
            Constraint::Length(1),            // Status bar
        ])
        .split(frame.area());

    render_output_area(frame, app, main_layout[0]);
    render_input_area(frame, app, main_layout[1]);
    render_status_bar(frame, app, main_layout[2]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn render_output_area(frame: &mut Frame, app: &App, area: Rect) {
    let style = match app.output_kind {
        OutputKind::Empty | OutputKind::Value => Style::default().fg(Color::Cyan),
        OutputKind::Loading => Style::default().fg(Color::Yellow),
        OutputKind::Fault => Style::default().fg(Color::Red),
    };
    let paragraph = Paragraph::new(Text::styled(app.output.clone(), style))
        .block(Block::default().borders(Borders::ALL).title("Output"))
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_input_area(frame: &mut Frame, app: &App, area: Rect) {
    let (row, col) = app.cursor_position();
    let visible_rows = area.height.saturating_sub(2) as usize;
    // Keep the cursor row inside the box.
    let scroll = row.saturating_sub(visible_rows.saturating_sub(1)) as u16;

    let title = if app.evaluating { "Input (running...)" } else { "Input" };
    let paragraph = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    if !app.show_help {
        let x = area.x + 1 + col.min(area.width.saturating_sub(3) as usize) as u16;
        let y = area.y + 1 + (row as u16).saturating_sub(scroll);
        frame.set_cursor_position((x, y));
    }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = match app.phase {
        Phase::Starting => Color::DarkGray,
        Phase::Ready => Color::Blue,
        Phase::Failed(_) => Color::Red,
    };
    let status_paragraph =
        Paragraph::new(app.status_message.as_str()).style(Style::default().bg(bg).fg(Color::White));
    frame.render_widget(status_paragraph, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("Python Evaluation Help"),
        Line::from(""),
        Line::from("Run:"),
        Line::from("  Ctrl+R / F5  - Evaluate the input field"),
        Line::from("  Ctrl+L       - Clear the input field"),
        Line::from(""),
        Line::from("Editing:"),
        Line::from("  Enter        - New line"),
        Line::from("  Tab          - Indent"),
        Line::from("  ←/→ Home End - Move cursor"),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  PgUp/PgDn    - Scroll output"),
        Line::from("  F1           - Toggle this help"),
        Line::from("  Esc / Ctrl+C - Quit"),
    ];

    let help_paragraph = Paragraph::new(Text::from(help_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help_paragraph, popup_area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
