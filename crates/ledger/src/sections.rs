//! Merging of paginated section feeds.
//!
//! The backend pages records newest first, grouped in date buckets. A page
//! boundary may fall inside a bucket, in which case the last section already
//! held and the first section of the new page share a title and must be
//! folded into one.
use api_types::{record::Record, section::Section};
use rust_decimal::Decimal;

/// Builds a section whose `total` is the sum of `data`.
#[must_use]
pub fn section(title: impl Into<String>, data: Vec<Record>) -> Section {
    Section {
        title: title.into(),
        total: sum(&data),
        data,
    }
}

/// Sum of `change` over `records`.
#[must_use]
pub fn sum(records: &[Record]) -> Decimal {
    records.iter().map(|record| record.change).sum()
}

/// Number of records held across all sections.
#[must_use]
pub fn count(sections: &[Section]) -> usize {
    sections.iter().map(|section| section.data.len()).sum()
}

/// Appends `next` to `previous`.
///
/// When the last held section and the first fetched one have the same title
/// they are combined: records keep their order (held first) and the total is
/// recomputed from the combined records.
#[must_use]
pub fn merge(previous: Vec<Section>, next: Vec<Section>) -> Vec<Section> {
    if previous.is_empty() {
        return next;
    }
    if next.is_empty() {
        return previous;
    }

    let boundary =
        previous.last().map(|s| s.title.as_str()) == next.first().map(|s| s.title.as_str());
    if !boundary {
        let mut merged = previous;
        merged.extend(next);
        return merged;
    }

    let mut merged = previous;
    let mut next = next.into_iter();
    if let (Some(last), Some(first)) = (merged.last_mut(), next.next()) {
        last.data.extend(first.data);
        last.total = sum(&last.data);
    }
    merged.extend(next);
    merged
}
