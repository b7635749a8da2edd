pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, KeepField, Tab};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

/// Rows taken by the info bar, the tab bar and the hints bar.
pub const SHELL_ROWS: u16 = 4;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.tab, &theme);

    match state.tab {
        Tab::Records => screens::records::render(frame, layout[2], state, &theme),
        Tab::Keep => screens::keep::render(frame, layout[2], state, &theme),
        Tab::Settings => screens::login::render(frame, layout[2], state, &theme),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

/// Current spinner frame.
pub fn spinner(ticks: usize) -> &'static str {
    SPINNER[ticks % SPINNER.len()]
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state.username.as_deref().unwrap_or("-");
    let (status, status_style) = if state.records.controller.is_fetching() {
        (spinner(state.ticks), Style::default().fg(theme.accent))
    } else if state.username.is_some() {
        ("OK", Style::default().fg(theme.positive))
    } else {
        ("LOGGED OUT", Style::default().fg(theme.error))
    };

    let line = Line::from(vec![
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = vec![
        Span::styled("F1", Style::default().fg(theme.accent)),
        Span::raw("/"),
        Span::styled("F2", Style::default().fg(theme.accent)),
        Span::raw("/"),
        Span::styled("F3", Style::default().fg(theme.accent)),
        Span::raw(" nav"),
    ];

    let context_hints = context_hints(state);
    if !context_hints.is_empty() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        for (i, (key, label)) in context_hints.into_iter().enumerate() {
            if i > 0 {
                parts.push(Span::raw("  "));
            }
            parts.push(Span::styled(key, Style::default().fg(theme.accent)));
            parts.push(Span::raw(format!(" {label}")));
        }
    }

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("Ctrl+C", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Keyboard hints for the active tab and mode.
fn context_hints(state: &AppState) -> Vec<(&'static str, &'static str)> {
    match state.tab {
        Tab::Records if state.records.searching => {
            vec![("Enter", "search"), ("Esc", "cancel")]
        }
        Tab::Records => vec![
            ("j/k", "move"),
            ("r", "refresh"),
            ("/", "search"),
            ("d", "delete"),
            ("c", "chart"),
            ("m", "month/day"),
        ],
        Tab::Keep => {
            let mut hints = vec![("Tab", "next"), ("Enter", "save"), ("Esc", "reset")];
            if matches!(state.keep.focus, KeepField::Kind | KeepField::SubType) {
                hints.insert(0, ("Space", "cycle"));
            }
            hints
        }
        Tab::Settings if state.username.is_some() => vec![("l", "log out")],
        Tab::Settings => vec![("Enter", "log in"), ("Esc", "clear")],
    }
}
