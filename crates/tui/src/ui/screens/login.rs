use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::AppState,
    ui::{spinner, theme::Theme},
};

/// Calculates a centered rect for the settings box
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card_area = centered_box(36, 5, area);
    frame.render_widget(Clear, card_area);

    let title = if state.username.is_some() {
        " account "
    } else {
        " login "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1)])
        .margin(1)
        .split(inner);

    match &state.username {
        Some(username) => {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("Logged in as ", Style::default().fg(theme.text_muted)),
                    Span::styled(username.as_str(), Style::default().fg(theme.accent)),
                ]))
                .alignment(Alignment::Center),
                rows[0],
            );
        }
        None => {
            let settings = &state.settings;
            let display = if settings.logging_in {
                format!("{} logging in", spinner(state.ticks))
            } else {
                format!("{}│", mask_password(&settings.password))
            };
            frame.render_widget(
                Paragraph::new(Span::styled(display, Style::default().fg(theme.accent))),
                rows[0],
            );
        }
    }
}

/// Masks password with bullets, one per character
fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_counts_characters() {
        assert_eq!(mask_password(""), "");
        assert_eq!(mask_password("鸭子ab"), "••••");
    }
}
