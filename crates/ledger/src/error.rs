//! The module contains the errors the ledger core can produce.
//!
//! - [`LedgerError`] is raised while validating user input (record drafts,
//!   amounts, dates).
//! - [`SyncError`] is the outcome of a failed fetch or delete, fed back into
//!   the [`PaginationController`] by whoever executed the request.
//!
//!  [`PaginationController`]: crate::controller::PaginationController
use thiserror::Error;

/// Input validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Unknown type: {0}")]
    UnknownType(String),
}

/// Failure of a request issued on behalf of the controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No valid session token: raised before any network call, or after the
    /// backend rejected the token.
    #[error("login required")]
    LoginRequired,
    /// Network failure, non-2xx status or an undecodable body.
    #[error("request failed: {0}")]
    Request(String),
}
