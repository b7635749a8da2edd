//! Fetch lifecycle of the section list.
//!
//! The controller never performs I/O. Operations that need the network return
//! a [`Command`]; the caller executes it and hands the outcome back through
//! [`PaginationController::complete_fetch`] or
//! [`PaginationController::complete_delete`]. All calls are expected on one
//! logical thread (the UI event loop).
//!
//! Each fetch carries a sequence number. Only the most recently issued fetch
//! is in flight: a completion with an older number is dropped, so a refresh
//! issued while another request is outstanding always wins.
use std::time::Instant;

use api_types::{
    record::RecordId,
    section::{Section, SectionPage, SectionQuery, SectionType},
};
use tracing::{debug, warn};

use crate::{debounce::Debouncer, error::SyncError, sections};

/// Locally held state of the section feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionList {
    pub sections: Vec<Section>,
    /// Resumption cursor for the next page; `None` means first page.
    pub anchor: Option<String>,
    pub end_reached: bool,
    pub keyword: Option<String>,
    pub section_type: SectionType,
    /// A fetch is in flight.
    pub refreshing: bool,
    /// At least one delete is in flight.
    pub busy: bool,
    pub pending_load_more: bool,
}

/// A fetch the caller must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: SectionQuery,
    /// `true` when the page is merged into the held list.
    pub load_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch(FetchRequest),
    Delete { id: RecordId },
}

/// Transient user-facing outcome, drained by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Loaded,
    LoadFailed(SyncError),
    Deleted,
    DeleteFailed(SyncError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    seq: u64,
    load_more: bool,
}

#[derive(Debug, Default)]
pub struct PaginationController {
    list: SectionList,
    next_seq: u64,
    pending_deletes: usize,
    in_flight: Option<InFlight>,
    debouncer: Debouncer,
    notices: Vec<Notice>,
}

impl PaginationController {
    pub fn new(section_type: SectionType, debouncer: Debouncer) -> Self {
        Self {
            list: SectionList {
                section_type,
                ..SectionList::default()
            },
            debouncer,
            ..Self::default()
        }
    }

    /// Read access for rendering.
    pub fn list(&self) -> &SectionList {
        &self.list
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// `true` while the in-flight fetch is a next-page request.
    pub fn is_loading_more(&self) -> bool {
        self.in_flight.is_some_and(|in_flight| in_flight.load_more)
    }

    /// Takes the notices produced since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Drops everything held (sections, filters, in-flight requests, queued
    /// load-more) but keeps the section type and the sequence counter, so
    /// pages requested before the reset still arrive as stale.
    pub fn reset(&mut self) {
        self.list = SectionList {
            section_type: self.list.section_type,
            ..SectionList::default()
        };
        self.in_flight = None;
        self.pending_deletes = 0;
        self.debouncer.cancel();
        self.notices.clear();
    }

    /// Reloads from the first page keeping the current filters.
    pub fn refresh(&mut self) -> Command {
        self.list.anchor = None;
        self.list.end_reached = false;
        self.list.pending_load_more = false;
        self.debouncer.cancel();
        Command::Fetch(self.issue(false))
    }

    /// Sets the keyword filter and reloads. A blank keyword clears it.
    pub fn search(&mut self, keyword: Option<&str>) -> Command {
        self.list.keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        self.refresh()
    }

    /// Switches bucket granularity and reloads.
    pub fn set_section_type(&mut self, section_type: SectionType) -> Command {
        self.list.section_type = section_type;
        self.refresh()
    }

    /// Requests the next page.
    ///
    /// Does nothing once the feed is exhausted. While a fetch is in flight the
    /// request is remembered (once) and replayed when that fetch succeeds.
    pub fn load_more(&mut self) -> Option<Command> {
        if self.list.end_reached {
            return None;
        }
        if self.in_flight.is_some() {
            self.list.pending_load_more = true;
            return None;
        }
        Some(Command::Fetch(self.issue(true)))
    }

    /// Debounced [`load_more`](Self::load_more): schedules it after the quiet
    /// period. Call [`poll`](Self::poll) from the event loop.
    pub fn request_load_more(&mut self, now: Instant) {
        if self.list.end_reached {
            return;
        }
        self.debouncer.trigger(now);
    }

    /// Fires a debounced load-more whose quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Command> {
        if self.debouncer.poll(now) {
            return self.load_more();
        }
        None
    }

    /// Starts a soft delete. The list is refetched once it succeeds.
    pub fn delete(&mut self, id: RecordId) -> Command {
        self.pending_deletes += 1;
        self.list.busy = true;
        Command::Delete { id }
    }

    /// Applies the outcome of the fetch numbered `seq`.
    ///
    /// Returns the deferred load-more, if one was requested meanwhile.
    pub fn complete_fetch(
        &mut self,
        seq: u64,
        result: Result<SectionPage, SyncError>,
    ) -> Option<Command> {
        let current = match self.in_flight {
            Some(in_flight) if in_flight.seq == seq => in_flight,
            _ => {
                debug!(seq, "discarding stale section page");
                return None;
            }
        };
        self.in_flight = None;
        self.list.refreshing = false;

        match result {
            Ok(page) => {
                let held = std::mem::take(&mut self.list.sections);
                self.list.sections = if current.load_more {
                    sections::merge(held, page.accounts)
                } else {
                    page.accounts
                };
                self.list.anchor = page.anchor;
                self.list.end_reached = page.end_reached;
                self.notices.push(Notice::Loaded);

                if self.list.pending_load_more {
                    self.list.pending_load_more = false;
                    return self.load_more();
                }
                None
            }
            Err(err) => {
                warn!(seq, "section fetch failed: {err}");
                self.list.pending_load_more = false;
                self.notices.push(Notice::LoadFailed(err));
                None
            }
        }
    }

    /// Applies the outcome of a delete; on success returns the refetch.
    pub fn complete_delete(&mut self, result: Result<(), SyncError>) -> Option<Command> {
        self.pending_deletes = self.pending_deletes.saturating_sub(1);
        self.list.busy = self.pending_deletes > 0;
        match result {
            Ok(()) => {
                self.notices.push(Notice::Deleted);
                Some(self.refresh())
            }
            Err(err) => {
                warn!("delete failed: {err}");
                self.notices.push(Notice::DeleteFailed(err));
                None
            }
        }
    }

    fn issue(&mut self, load_more: bool) -> FetchRequest {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight = Some(InFlight { seq, load_more });
        self.list.refreshing = true;

        let query = SectionQuery {
            section_type: self.list.section_type,
            keyword: self.list.keyword.clone(),
            anchor: if load_more {
                self.list.anchor.clone()
            } else {
                None
            },
        };
        debug!(seq, load_more, ?query, "issuing section fetch");
        FetchRequest {
            seq,
            query,
            load_more,
        }
    }
}
