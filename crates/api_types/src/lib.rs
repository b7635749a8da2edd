use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod record {
    use super::*;

    /// Server-assigned record id.
    pub type RecordId = i64;

    /// A single bookkeeping entry as returned by the backend.
    ///
    /// Records are immutable once fetched: the only transitions are create
    /// and the server-side soft delete (`/accounts/{id}/inactive`).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Record {
        pub id: RecordId,
        #[serde(rename = "type")]
        pub kind: String,
        pub sub_type: String,
        /// Spent amount, always positive for expenses.
        #[serde(with = "rust_decimal::serde::float")]
        pub change: Decimal,
        pub merchant: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub datetime: DateTime<FixedOffset>,
        pub comments: Option<String>,
        #[serde(default)]
        pub username: String,
    }

    /// Request body for `POST /accounts`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct RecordNew {
        #[serde(rename = "type")]
        pub kind: String,
        pub sub_type: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub change: Decimal,
        pub merchant: Option<String>,
        pub datetime: DateTime<FixedOffset>,
        pub comments: Option<String>,
    }
}

pub mod section {
    use super::*;
    use crate::record::Record;

    /// Bucket granularity of the section feed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SectionType {
        #[default]
        Month,
        Day,
    }

    impl SectionType {
        /// Returns the value used in the `type` query parameter.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Month => "month",
                Self::Day => "day",
            }
        }

        pub fn toggled(self) -> Self {
            match self {
                Self::Month => Self::Day,
                Self::Day => Self::Month,
            }
        }
    }

    /// A date bucket (`2024-03` or `2024-03-15`) with its records.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Section {
        pub title: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub total: Decimal,
        pub data: Vec<Record>,
    }

    /// Query string of `GET /accounts/section`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SectionQuery {
        #[serde(rename = "type")]
        pub section_type: SectionType,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub keyword: Option<String>,
        /// Opaque pagination cursor, from the previous page's `anchor`.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub anchor: Option<String>,
    }

    /// One page of the section feed, newest bucket first.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SectionPage {
        pub accounts: Vec<Section>,
        /// Cursor for the next (older) page.
        pub anchor: Option<String>,
        pub end_reached: bool,
    }
}

pub mod auth {
    use super::*;

    /// Form body of `POST /authentication/login`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub password: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
        pub username: String,
    }
}

#[cfg(test)]
mod tests {
    use super::{record::Record, section::SectionPage};

    #[test]
    fn section_page_decodes_backend_payload() {
        let raw = r#"{
            "accounts": [{
                "title": "2024-03",
                "total": 12.5,
                "data": [{
                    "id": 7,
                    "type": "food",
                    "sub_type": "lunch",
                    "change": 12.5,
                    "merchant": null,
                    "datetime": "2024-03-02T12:30:00+08:00",
                    "comments": "noodles",
                    "username": "duck"
                }]
            }],
            "anchor": "abc",
            "end_reached": false
        }"#;

        let page: SectionPage = serde_json::from_str(raw).unwrap();
        assert_eq!(page.anchor.as_deref(), Some("abc"));
        assert!(!page.end_reached);
        let record: &Record = &page.accounts[0].data[0];
        assert_eq!(record.kind, "food");
        assert_eq!(record.change.to_string(), "12.5");
        assert_eq!(record.merchant, None);
    }

    #[test]
    fn record_without_username_defaults_to_empty() {
        let raw = r#"{
            "id": 1,
            "type": "food",
            "sub_type": "none",
            "change": 3,
            "merchant": "shop",
            "datetime": "2024-03-02T12:30:00Z",
            "comments": null
        }"#;
        let record: Record = serde_json::from_str(raw).unwrap();
        assert!(record.username.is_empty());
    }
}
