use ledger::catalog;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, KeepField, KeepState},
    ui::{components::card::Card, spinner, theme::Theme},
};

const LABEL_WIDTH: usize = 10;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let keep = &state.keep;
    let width = 56u16.min(area.width);
    let height = (KeepField::ALL.len() as u16 + 4).min(area.height);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(width), Constraint::Min(0)])
        .split(area);
    let form_area = Rect {
        height,
        ..columns[0]
    };

    let title = if keep.saving {
        format!("Keep {}", spinner(state.ticks))
    } else {
        "Keep".to_string()
    };
    let card = Card::new(&title, theme).focused(!keep.saving);

    let mut lines: Vec<Line<'_>> = KeepField::ALL
        .iter()
        .map(|field| field_line(keep, *field, theme))
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        if keep.saving { "saving" } else { "Enter saves" },
        Style::default().fg(theme.dim),
    )));

    card.render_with(frame, form_area, Paragraph::new(lines));
}

fn field_line(keep: &KeepState, field: KeepField, theme: &Theme) -> Line<'static> {
    let focused = keep.focus == field;
    let draft = &keep.draft;
    let value = match field {
        KeepField::Kind => format!("‹ {} ›", draft.kind.choice.label),
        KeepField::SubType => format!(
            "‹ {} ›",
            catalog::sub_type_label(draft.kind.choice.value, draft.sub_type)
        ),
        KeepField::Change => format!("¥ {}", draft.change),
        KeepField::Merchant => draft.merchant.clone(),
        KeepField::Datetime => keep.date_input.clone(),
        KeepField::Comments => draft.comments.clone(),
    };
    let cursor = if focused && !matches!(field, KeepField::Kind | KeepField::SubType) {
        "│"
    } else {
        ""
    };

    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let value_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };

    Line::from(vec![
        Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), label_style),
        Span::styled(format!("{value}{cursor}"), value_style),
    ])
}
