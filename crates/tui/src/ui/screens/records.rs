use api_types::record::Record;
use ledger::{
    SectionList, catalog, format_amount,
    view::{self, Row},
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use rust_decimal::Decimal;

use crate::{
    app::AppState,
    ui::{
        SHELL_ROWS,
        components::{card::Card, charts},
        spinner,
        theme::Theme,
    },
};

const HEADER_ROWS: u16 = 1;
const CHART_ROWS: u16 = 12;
const BORDER_ROWS: u16 = 2;
const AMOUNT_WIDTH: usize = 12;

/// List rows visible for a terminal `height`.
pub fn viewport(height: u16, chart_open: bool) -> usize {
    let chart = if chart_open { CHART_ROWS } else { 0 };
    let chrome = SHELL_ROWS + HEADER_ROWS + BORDER_ROWS + chart;
    usize::from(height.saturating_sub(chrome).max(1))
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let records = &state.records;
    let list = records.controller.list();

    let mut constraints = vec![Constraint::Length(HEADER_ROWS)];
    if records.chart_open {
        constraints.push(Constraint::Length(CHART_ROWS));
    }
    constraints.push(Constraint::Min(0));
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(frame, layout[0], state, theme);

    let list_area = if records.chart_open {
        let title = format!("Totals by {}", list.section_type.as_str());
        charts::render_bar_chart(
            frame,
            layout[1],
            &title,
            &view::chart_bars(&list.sections),
            theme,
        );
        layout[2]
    } else {
        layout[1]
    };

    render_list(frame, list_area, state, theme);

    if list.busy {
        render_busy(frame, list_area, state, theme);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let records = &state.records;
    let list = records.controller.list();

    let mut spans = vec![
        Span::styled(" By ", Style::default().fg(theme.text_muted)),
        Span::styled(
            list.section_type.as_str(),
            Style::default().fg(theme.accent),
        ),
    ];

    if records.searching {
        spans.push(Span::styled("  Search: ", Style::default().fg(theme.text_muted)));
        spans.push(Span::styled(
            format!("{}│", records.search_input),
            Style::default().fg(theme.accent),
        ));
    } else if let Some(keyword) = &list.keyword {
        spans.push(Span::styled("  Search: ", Style::default().fg(theme.text_muted)));
        spans.push(Span::styled(keyword.as_str(), Style::default().fg(theme.text)));
        spans.push(Span::styled(" (Esc clears)", Style::default().fg(theme.dim)));
    }

    if list.refreshing && !records.controller.is_loading_more() {
        spans.push(Span::styled(
            format!("  {} refreshing", spinner(state.ticks)),
            Style::default().fg(theme.accent),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let records = &state.records;
    let list = records.controller.list();
    let card = Card::new("Records", theme)
        .badge(format!("{} records", ledger::sections::count(&list.sections)))
        .focused(!records.searching);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let width = usize::from(inner.width);
    let rows = view::rows(list);
    let mut lines: Vec<Line<'_>> = rows
        .into_iter()
        .enumerate()
        .skip(records.view.offset())
        .take(records.viewport)
        .map(|(index, row)| {
            let selected = index == records.view.selected();
            match row {
                Row::Header { title, total } => header_line(title, total, width, theme),
                Row::Item(record) => {
                    let swiped = records.view.swiped() == Some(record.id);
                    item_line(record, width, selected, swiped, theme)
                }
            }
        })
        .collect();

    if lines.len() < records.viewport
        && let Some(footer) = footer_line(list, state.ticks, records.controller.is_loading_more())
    {
        lines.push(Line::from(Span::styled(footer, Style::default().fg(theme.dim))));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn header_line<'a>(title: &'a str, total: Decimal, width: usize, theme: &Theme) -> Line<'a> {
    let style = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);
    let pad = width.saturating_sub(title.chars().count() + AMOUNT_WIDTH);
    Line::from(vec![
        Span::styled(title, style),
        Span::raw(" ".repeat(pad)),
        Span::styled(format!("{:>AMOUNT_WIDTH$}", format_amount(total)), style),
    ])
}

fn item_line<'a>(
    record: &'a Record,
    width: usize,
    selected: bool,
    swiped: bool,
    theme: &Theme,
) -> Line<'a> {
    let kind = catalog::type_label(&record.kind);
    let sub_type = catalog::sub_type_label(&record.kind, &record.sub_type);
    let mut left = format!(
        "  {}  {kind} / {sub_type}",
        record.datetime.format("%m-%d %H:%M")
    );
    if let Some(merchant) = &record.merchant {
        left.push_str("  ");
        left.push_str(merchant);
    }

    let (right, right_style) = if swiped {
        (
            "d to delete".to_string(),
            Style::default()
                .fg(theme.negative)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format_amount(record.change),
            Style::default().fg(theme.text),
        )
    };

    let pad = width.saturating_sub(left.chars().count() + AMOUNT_WIDTH);
    let base = if selected {
        Style::default()
            .fg(theme.text)
            .bg(theme.surface)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(theme.text_muted)
    };

    Line::from(vec![
        Span::styled(left, base),
        Span::styled(" ".repeat(pad), base),
        Span::styled(format!("{right:>AMOUNT_WIDTH$}"), right_style),
    ])
}

/// Text under the last row: a spinner while paging, a marker once the feed
/// is exhausted.
fn footer_line(list: &SectionList, ticks: usize, loading_more: bool) -> Option<String> {
    if list.sections.is_empty() {
        return None;
    }
    if loading_more {
        Some(format!("  {} loading more", spinner(ticks)))
    } else if list.end_reached {
        Some("  end of records".to_string())
    } else {
        None
    }
}

fn render_busy(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let width = 20u16.min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(3) / 2,
        width,
        height: 3u16.min(area.height),
    };
    frame.render_widget(Clear, rect);
    let card = Card::new("", theme).focused(true);
    card.render_with(
        frame,
        rect,
        Paragraph::new(format!("{} deleting", spinner(state.ticks)))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.accent)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_subtracts_chrome_and_chart() {
        assert_eq!(viewport(30, false), 23);
        assert_eq!(viewport(30, true), 11);
        assert_eq!(viewport(5, true), 1);
    }

    #[test]
    fn footer_only_under_real_sections() {
        let mut list = SectionList {
            end_reached: true,
            ..SectionList::default()
        };
        assert_eq!(footer_line(&list, 0, false), None);

        list.sections.push(ledger::sections::section("2024-03", Vec::new()));
        assert_eq!(
            footer_line(&list, 0, false).as_deref(),
            Some("  end of records")
        );
        list.end_reached = false;
        assert_eq!(
            footer_line(&list, 0, true).as_deref(),
            Some("  | loading more")
        );
    }
}
