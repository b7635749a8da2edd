use ledger::format_amount;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::ui::{components::card::Card, theme::Theme};

/// Renders one bar per `(label, total)` pair inside a card.
///
/// Bar heights use whole currency units; the printed value keeps cents.
pub fn render_bar_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[(String, Decimal)],
    theme: &Theme,
) {
    let bars: Vec<Bar<'_>> = data
        .iter()
        .map(|(label, total)| {
            Bar::default()
                .label(Line::from(label.as_str()))
                .value(bar_height(*total))
                .text_value(format_amount(*total))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(area.width, data.len()))
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.dim));

    Card::new(title, theme).render_with(frame, area, chart);
}

fn bar_height(total: Decimal) -> u64 {
    total.max(Decimal::ZERO).ceil().to_u64().unwrap_or(u64::MAX)
}

/// Widest bar that still fits `count` bars (plus gaps) in `width` columns.
fn bar_width(width: u16, count: usize) -> u16 {
    let count = count.max(1) as u16;
    let inner = width.saturating_sub(2);
    (inner / count).saturating_sub(1).clamp(3, 12)
}
