//! Row model of the section list and the user intents it produces.
//!
//! [`ListView`] only holds cursor state (selection, scroll offset, the row
//! whose delete action is revealed). It reads the [`SectionList`] owned by the
//! controller and answers user actions with [`Intent`]s for the caller to
//! forward.
use api_types::{
    record::{Record, RecordId},
    section::Section,
};
use rust_decimal::Decimal;

use crate::controller::SectionList;

/// Title of the placeholder section shown when nothing is held.
pub const EMPTY_TITLE: &str = "no records";

/// Bars shown by the summary chart.
pub const CHART_BARS: usize = 9;

/// Fraction of the viewport that may remain below the window before the
/// next page is requested.
const LOAD_MORE_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Row<'a> {
    Header { title: &'a str, total: Decimal },
    Item(&'a Record),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Delete(RecordId),
    LoadMore,
    Refresh,
}

/// Flattens sections into header and item rows.
///
/// An empty list yields the single placeholder header.
pub fn rows(list: &SectionList) -> Vec<Row<'_>> {
    if list.sections.is_empty() {
        return vec![Row::Header {
            title: EMPTY_TITLE,
            total: Decimal::ZERO,
        }];
    }

    let capacity = list.sections.len() + crate::sections::count(&list.sections);
    let mut rows = Vec::with_capacity(capacity);
    for section in &list.sections {
        rows.push(Row::Header {
            title: &section.title,
            total: section.total,
        });
        rows.extend(section.data.iter().map(Row::Item));
    }
    rows
}

/// Bars of the summary chart: the newest [`CHART_BARS`] sections, oldest
/// first, labelled by the last two parts of the title (`2024-03-15` becomes
/// `03-15`).
pub fn chart_bars(sections: &[Section]) -> Vec<(String, Decimal)> {
    sections
        .iter()
        .take(CHART_BARS)
        .rev()
        .map(|section| (short_label(&section.title), section.total))
        .collect()
}

fn short_label(title: &str) -> String {
    let parts: Vec<&str> = title.split('-').collect();
    let start = parts.len().saturating_sub(2);
    parts[start..].join("-")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    selected: usize,
    offset: usize,
    swiped: Option<RecordId>,
}

impl ListView {
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// First visible row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Record whose delete action is revealed.
    pub fn swiped(&self) -> Option<RecordId> {
        self.swiped
    }

    /// Back to the top, as after a refresh.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Moves the selection down; may ask for the next page.
    pub fn select_next(&mut self, list: &SectionList, viewport: usize) -> Option<Intent> {
        let len = rows(list).len();
        self.swiped = None;
        self.selected = (self.selected + 1).min(len.saturating_sub(1));
        self.scroll_into_view(viewport);
        self.near_end(len, viewport).then_some(Intent::LoadMore)
    }

    pub fn select_prev(&mut self, viewport: usize) {
        self.swiped = None;
        self.selected = self.selected.saturating_sub(1);
        self.scroll_into_view(viewport);
    }

    /// Record under the cursor, if the cursor is on an item row.
    pub fn selected_record<'a>(&self, list: &'a SectionList) -> Option<&'a Record> {
        match rows(list).get(self.selected) {
            Some(Row::Item(record)) => Some(record),
            _ => None,
        }
    }

    /// Delete gesture on the selected row: the first one reveals the delete
    /// action, the second one confirms it.
    pub fn delete_gesture(&mut self, list: &SectionList) -> Option<Intent> {
        let id = self.selected_record(list)?.id;
        if self.swiped == Some(id) {
            self.swiped = None;
            return Some(Intent::Delete(id));
        }
        self.swiped = Some(id);
        None
    }

    pub fn refresh_gesture(&mut self) -> Intent {
        self.reset();
        Intent::Refresh
    }

    /// Keeps the cursor within bounds after the list changed underneath.
    pub fn clamp(&mut self, list: &SectionList, viewport: usize) {
        let len = rows(list).len();
        self.selected = self.selected.min(len.saturating_sub(1));
        self.offset = self.offset.min(len.saturating_sub(1));
        self.scroll_into_view(viewport);
    }

    fn scroll_into_view(&mut self, viewport: usize) {
        let viewport = viewport.max(1);
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + viewport {
            self.offset = self.selected + 1 - viewport;
        }
    }

    fn near_end(&self, len: usize, viewport: usize) -> bool {
        let visible_end = (self.offset + viewport).min(len);
        let remaining = len - visible_end;
        remaining as f32 <= viewport as f32 * LOAD_MORE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::{section, tests::record};

    fn list_with(records_per_section: &[(&str, usize)]) -> SectionList {
        let mut id = 0;
        let sections = records_per_section
            .iter()
            .map(|(title, n)| {
                let data = (0..*n)
                    .map(|_| {
                        id += 1;
                        record(id, 1)
                    })
                    .collect();
                section(*title, data)
            })
            .collect();
        SectionList {
            sections,
            ..SectionList::default()
        }
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let list = SectionList::default();

        assert_eq!(
            rows(&list),
            vec![Row::Header {
                title: EMPTY_TITLE,
                total: Decimal::ZERO
            }]
        );
    }

    #[test]
    fn rows_interleave_headers_and_items() {
        let list = list_with(&[("2024-03", 2), ("2024-02", 1)]);
        let rows = rows(&list);

        assert_eq!(rows.len(), 5);
        assert!(matches!(rows[0], Row::Header { title: "2024-03", .. }));
        assert!(matches!(rows[1], Row::Item(r) if r.id == 1));
        assert!(matches!(rows[2], Row::Item(r) if r.id == 2));
        assert!(matches!(rows[3], Row::Header { title: "2024-02", .. }));
        assert!(matches!(rows[4], Row::Item(r) if r.id == 3));
    }

    #[test]
    fn scrolling_near_bottom_requests_more() {
        // 1 header + 40 items, viewport of 10 rows.
        let list = list_with(&[("2024-03", 40)]);
        let mut view = ListView::default();

        let mut intents = Vec::new();
        for _ in 0..40 {
            intents.push(view.select_next(&list, 10));
        }

        let first = intents
            .iter()
            .position(|i| *i == Some(Intent::LoadMore))
            .unwrap();
        // selected row 35: window 26..36, 5 rows remain = half a viewport.
        assert_eq!(first, 34);
        assert!(intents[..first].iter().all(Option::is_none));
        assert_eq!(view.selected(), 40);
        assert_eq!(view.offset(), 31);
    }

    #[test]
    fn delete_needs_reveal_then_confirm() {
        let list = list_with(&[("2024-03", 2)]);
        let mut view = ListView::default();

        // Header row is not deletable.
        assert_eq!(view.delete_gesture(&list), None);

        view.select_next(&list, 10);
        assert_eq!(view.delete_gesture(&list), None);
        assert_eq!(view.swiped(), Some(1));
        assert_eq!(view.delete_gesture(&list), Some(Intent::Delete(1)));
        assert_eq!(view.swiped(), None);
    }

    #[test]
    fn moving_closes_revealed_delete() {
        let list = list_with(&[("2024-03", 2)]);
        let mut view = ListView::default();

        view.select_next(&list, 10);
        view.delete_gesture(&list);
        view.select_next(&list, 10);

        assert_eq!(view.swiped(), None);
        assert_eq!(view.delete_gesture(&list), None);
        assert_eq!(view.swiped(), Some(2));
    }

    #[test]
    fn clamp_after_list_shrinks() {
        let long = list_with(&[("2024-03", 20)]);
        let short = list_with(&[("2024-03", 2)]);
        let mut view = ListView::default();
        for _ in 0..15 {
            view.select_next(&long, 5);
        }

        view.clamp(&short, 5);

        assert_eq!(view.selected(), 2);
        assert!(view.offset() <= view.selected());
    }

    #[test]
    fn chart_uses_newest_nine_oldest_first() {
        let titles: Vec<String> = (1..=12).rev().map(|m| format!("2024-{m:02}")).collect();
        let sections: Vec<Section> = titles
            .iter()
            .map(|t| section(t.as_str(), vec![record(1, 2)]))
            .collect();

        let bars = chart_bars(&sections);

        assert_eq!(bars.len(), CHART_BARS);
        assert_eq!(bars.first().map(|b| b.0.as_str()), Some("2024-04"));
        assert_eq!(bars.last().map(|b| b.0.as_str()), Some("2024-12"));
        assert_eq!(bars[0].1, Decimal::from(2));
    }

    #[test]
    fn chart_label_keeps_month_and_day() {
        let sections = vec![section("2024-03-15", Vec::new())];
        assert_eq!(chart_bars(&sections)[0].0, "03-15");
    }
}
