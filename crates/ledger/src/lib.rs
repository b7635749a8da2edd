//! Client-side core of the bookkeeping app.
//!
//! Everything here is pure and synchronous: the terminal client owns a
//! [`PaginationController`], executes the [`Command`]s it hands out and feeds
//! the results back.
pub use controller::{Command, FetchRequest, Notice, PaginationController, SectionList};
pub use debounce::Debouncer;
pub use draft::RecordDraft;
pub use error::{LedgerError, SyncError};
pub use money::{format_amount, parse_amount};
pub use view::{Intent, ListView, Row};

pub mod catalog;
pub mod controller;
pub mod debounce;
pub mod draft;
mod error;
mod money;
pub mod sections;
pub mod view;

pub type Result<T> = std::result::Result<T, LedgerError>;
