use api_types::record::RecordNew;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

use crate::{
    Result,
    catalog::{self, NO_SUB_TYPE, RecordType, TYPES},
    error::LedgerError,
    money,
};

/// Display / input format of the draft's date.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Editable state of the record entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub kind: &'static RecordType,
    pub sub_type: &'static str,
    pub change: String,
    pub merchant: String,
    pub datetime: DateTime<FixedOffset>,
    pub comments: String,
}

impl RecordDraft {
    /// Fresh form: first type, no sub-type, dated `now`.
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            kind: &TYPES[0],
            sub_type: NO_SUB_TYPE.value,
            change: String::new(),
            merchant: String::new(),
            datetime: now,
            comments: String::new(),
        }
    }

    /// Switches the type; the sub-type goes back to "none".
    pub fn set_kind(&mut self, value: &str) -> Result<()> {
        let kind =
            catalog::find(value).ok_or_else(|| LedgerError::UnknownType(value.to_string()))?;
        self.kind = kind;
        self.sub_type = NO_SUB_TYPE.value;
        Ok(())
    }

    /// Cycles to the next type in the catalog.
    pub fn next_kind(&mut self) {
        let index = TYPES
            .iter()
            .position(|t| t.choice == self.kind.choice)
            .unwrap_or(0);
        self.kind = &TYPES[(index + 1) % TYPES.len()];
        self.sub_type = NO_SUB_TYPE.value;
    }

    /// Cycles to the next sub-type of the current type.
    pub fn next_sub_type(&mut self) {
        let sub_types = self.kind.sub_types;
        let index = sub_types
            .iter()
            .position(|s| s.value == self.sub_type)
            .unwrap_or(0);
        self.sub_type = sub_types[(index + 1) % sub_types.len()].value;
    }

    pub fn datetime_text(&self) -> String {
        self.datetime.format(DATETIME_FORMAT).to_string()
    }

    /// Parses `YYYY-MM-DD HH:MM` in the draft's current offset.
    pub fn set_datetime_text(&mut self, input: &str) -> Result<()> {
        let naive = NaiveDateTime::parse_from_str(input.trim(), DATETIME_FORMAT)
            .map_err(|err| LedgerError::InvalidDate(err.to_string()))?;
        self.datetime = self
            .datetime
            .offset()
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| LedgerError::InvalidDate(input.to_string()))?;
        Ok(())
    }

    /// Builds the create request. The amount must be strictly positive.
    pub fn validate(&self) -> Result<RecordNew> {
        let change = money::parse_amount(&self.change)
            .map_err(|_| LedgerError::InvalidAmount("enter an amount".to_string()))?;
        if change.is_zero() || change.is_sign_negative() {
            return Err(LedgerError::InvalidAmount("enter an amount".to_string()));
        }

        Ok(RecordNew {
            kind: self.kind.choice.value.to_string(),
            sub_type: self.sub_type.to_string(),
            change,
            merchant: non_empty(&self.merchant),
            datetime: self.datetime,
            comments: non_empty(&self.comments),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-02T08:15:00+08:00").unwrap()
    }

    #[test]
    fn new_draft_uses_first_type_and_no_sub_type() {
        let draft = RecordDraft::new(now());

        assert_eq!(draft.kind.choice.value, "吃吃吃");
        assert_eq!(draft.sub_type, NO_SUB_TYPE.value);
        assert_eq!(draft.datetime_text(), "2024-03-02 08:15");
    }

    #[test]
    fn changing_type_resets_sub_type() {
        let mut draft = RecordDraft::new(now());
        draft.next_sub_type();
        assert_eq!(draft.sub_type, "早餐");

        draft.set_kind("出行").unwrap();

        assert_eq!(draft.kind.choice.label, "Travel");
        assert_eq!(draft.sub_type, NO_SUB_TYPE.value);
        assert!(draft.set_kind("nope").is_err());
    }

    #[test]
    fn next_kind_wraps_around() {
        let mut draft = RecordDraft::new(now());
        for _ in 0..TYPES.len() {
            draft.next_kind();
        }
        assert_eq!(draft.kind, &TYPES[0]);
    }

    #[test]
    fn validate_rejects_missing_or_zero_amount() {
        let mut draft = RecordDraft::new(now());
        assert_eq!(
            draft.validate(),
            Err(LedgerError::InvalidAmount("enter an amount".to_string()))
        );

        draft.change = "0".to_string();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn validate_builds_request() {
        let mut draft = RecordDraft::new(now());
        draft.change = "12,5".to_string();
        draft.merchant = "  noodle bar ".to_string();

        let request = draft.validate().unwrap();

        assert_eq!(request.change, Decimal::new(125, 1));
        assert_eq!(request.merchant.as_deref(), Some("noodle bar"));
        assert_eq!(request.comments, None);
        assert_eq!(request.kind, "吃吃吃");
    }

    #[test]
    fn datetime_text_keeps_offset() {
        let mut draft = RecordDraft::new(now());

        draft.set_datetime_text("2024-01-31 23:59").unwrap();

        assert_eq!(draft.datetime.to_rfc3339(), "2024-01-31T23:59:00+08:00");
        assert!(draft.set_datetime_text("31/01/2024").is_err());
    }
}
