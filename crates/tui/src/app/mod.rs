use std::time::{Duration, Instant};

use api_types::{
    auth::LoginResponse,
    record::Record,
    section::{SectionPage, SectionType},
};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ledger::{
    Command, Debouncer, Intent, ListView, Notice, PaginationController, RecordDraft, SyncError,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    session::{Session, SessionStore},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

const TICK_RATE: Duration = Duration::from_millis(50);
const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Records,
    Keep,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Records, Tab::Keep, Tab::Settings];

    pub fn label(self) -> &'static str {
        match self {
            Self::Records => "Records",
            Self::Keep => "Keep",
            Self::Settings => "Settings",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct RecordsState {
    pub controller: PaginationController,
    pub view: ListView,
    pub search_input: String,
    pub searching: bool,
    pub chart_open: bool,
    /// Rows that fit in the list area, updated before every draw.
    pub viewport: usize,
}

impl RecordsState {
    fn new(section_type: SectionType, debounce: Duration) -> Self {
        Self {
            controller: PaginationController::new(section_type, Debouncer::new(debounce)),
            view: ListView::default(),
            search_input: String::new(),
            searching: false,
            chart_open: false,
            viewport: 1,
        }
    }

    /// Forgets the held list and the cursor. Requests issued before stay
    /// stale because the controller keeps its sequence counter.
    fn reset(&mut self) {
        self.controller.reset();
        self.view.reset();
        self.search_input.clear();
        self.searching = false;
        self.chart_open = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepField {
    Kind,
    SubType,
    Change,
    Merchant,
    Datetime,
    Comments,
}

impl KeepField {
    pub const ALL: [KeepField; 6] = [
        KeepField::Kind,
        KeepField::SubType,
        KeepField::Change,
        KeepField::Merchant,
        KeepField::Datetime,
        KeepField::Comments,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Kind => "Type",
            Self::SubType => "Sub-type",
            Self::Change => "Amount",
            Self::Merchant => "Merchant",
            Self::Datetime => "Date",
            Self::Comments => "Comments",
        }
    }

    fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug)]
pub struct KeepState {
    pub draft: RecordDraft,
    pub focus: KeepField,
    /// Raw text of the date field, parsed when the field loses focus.
    pub date_input: String,
    pub saving: bool,
}

impl KeepState {
    fn new(now: DateTime<FixedOffset>) -> Self {
        let draft = RecordDraft::new(now);
        let date_input = draft.datetime_text();
        Self {
            draft,
            focus: KeepField::Kind,
            date_input,
            saving: false,
        }
    }

    fn commit_datetime(&mut self) -> ledger::Result<()> {
        self.draft.set_datetime_text(&self.date_input)?;
        self.date_input = self.draft.datetime_text();
        Ok(())
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            KeepField::Change => Some(&mut self.draft.change),
            KeepField::Merchant => Some(&mut self.draft.merchant),
            KeepField::Datetime => Some(&mut self.date_input),
            KeepField::Comments => Some(&mut self.draft.comments),
            KeepField::Kind | KeepField::SubType => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SettingsState {
    pub password: String,
    pub logging_in: bool,
}

#[derive(Debug)]
pub struct AppState {
    pub tab: Tab,
    pub records: RecordsState,
    pub keep: KeepState,
    pub settings: SettingsState,
    pub username: Option<String>,
    pub base_url: String,
    pub toast: Option<ToastState>,
    /// Frame counter driving spinners.
    pub ticks: usize,
}

impl AppState {
    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }
}

/// Result of a background request, sent back to the event loop.
#[derive(Debug)]
pub enum Completion {
    Sections {
        seq: u64,
        result: std::result::Result<SectionPage, SyncError>,
    },
    Deleted(std::result::Result<(), SyncError>),
    Created(std::result::Result<Record, ClientError>),
    LoggedIn(std::result::Result<LoginResponse, ClientError>),
}

pub struct App {
    client: Client,
    sessions: SessionStore,
    timezone: Tz,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let sessions = SessionStore::load(config.session_path.as_str())?;
        let timezone = config.timezone()?;
        let (tx, rx) = mpsc::unbounded_channel();

        let state = AppState {
            tab: Tab::Records,
            records: RecordsState::new(config.section_type, config.debounce()),
            keep: KeepState::new(now_in(timezone)),
            settings: SettingsState::default(),
            username: sessions.get().map(|session| session.username.clone()),
            base_url: config.base_url.clone(),
            toast: None,
            ticks: 0,
        };

        Ok(Self {
            client,
            sessions,
            timezone,
            tx,
            rx,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let command = self.state.records.controller.refresh();
        self.dispatch(command);
        let result = self.event_loop(&mut terminal);
        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        while !self.should_quit {
            let size = terminal
                .size()
                .map_err(|err| AppError::Terminal(err.to_string()))?;
            let records = &mut self.state.records;
            records.viewport = ui::screens::records::viewport(size.height, records.chart_open);
            records
                .view
                .clamp(records.controller.list(), records.viewport);

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(TICK_RATE)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }
            self.tick(Instant::now());
        }

        Ok(())
    }

    fn tick(&mut self, now: Instant) {
        while let Ok(completion) = self.rx.try_recv() {
            self.complete(completion);
        }

        if let Some(command) = self.state.records.controller.poll(now) {
            self.dispatch(command);
        }

        for notice in self.state.records.controller.drain_notices() {
            if let Some((level, message)) = toast_for_notice(&notice) {
                self.state.toast(level, message);
            }
        }

        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.state.toast = None;
        }
        self.state.ticks = self.state.ticks.wrapping_add(1);
    }

    /// Runs a controller command in the background.
    ///
    /// Without a usable token the command fails immediately with
    /// [`SyncError::LoginRequired`] and nothing reaches the network.
    fn dispatch(&self, command: Command) {
        let Some(token) = self.sessions.token().map(str::to_string) else {
            debug!(?command, "no session, skipping request");
            let completion = match command {
                Command::Fetch(request) => Completion::Sections {
                    seq: request.seq,
                    result: Err(SyncError::LoginRequired),
                },
                Command::Delete { .. } => Completion::Deleted(Err(SyncError::LoginRequired)),
            };
            let _ = self.tx.send(completion);
            return;
        };

        let client = self.client.clone();
        let tx = self.tx.clone();
        match command {
            Command::Fetch(request) => {
                debug!(
                    seq = request.seq,
                    load_more = request.load_more,
                    anchor = ?request.query.anchor,
                    "fetching sections"
                );
                tokio::spawn(async move {
                    let result = client
                        .sections(&token, &request.query)
                        .await
                        .map_err(SyncError::from);
                    let _ = tx.send(Completion::Sections {
                        seq: request.seq,
                        result,
                    });
                });
            }
            Command::Delete { id } => {
                debug!(id, "deleting record");
                tokio::spawn(async move {
                    let result = client
                        .record_inactive(&token, id)
                        .await
                        .map_err(SyncError::from);
                    let _ = tx.send(Completion::Deleted(result));
                });
            }
        }
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Sections { seq, result } => {
                if let Err(err) = &result {
                    warn!(seq, %err, "section fetch failed");
                }
                if let Some(command) = self.state.records.controller.complete_fetch(seq, result) {
                    self.dispatch(command);
                }
            }
            Completion::Deleted(result) => {
                if let Err(err) = &result {
                    warn!(%err, "delete failed");
                }
                if let Some(command) = self.state.records.controller.complete_delete(result) {
                    self.dispatch(command);
                }
            }
            Completion::Created(result) => {
                self.state.keep.saving = false;
                match result {
                    Ok(record) => {
                        info!(id = record.id, "record created");
                        self.state.keep = KeepState::new(now_in(self.timezone));
                        self.state.toast(ToastLevel::Success, "saved");
                    }
                    Err(err) => {
                        warn!(%err, "create failed");
                        let message = sync_message(&SyncError::from(err));
                        self.state.toast(ToastLevel::Error, message);
                    }
                }
            }
            Completion::LoggedIn(result) => {
                self.state.settings.logging_in = false;
                match result {
                    Ok(response) => self.store_session(Session::from(response)),
                    Err(ClientError::Unauthorized) => {
                        self.state.toast(ToastLevel::Error, "wrong password");
                    }
                    Err(err) => {
                        warn!(%err, "login failed");
                        self.state.toast(ToastLevel::Error, err.to_string());
                    }
                }
            }
        }
    }

    fn store_session(&mut self, session: Session) {
        let username = session.username.clone();
        match self.sessions.set(session) {
            Ok(()) => {
                info!(%username, "logged in");
                self.state.settings.password.clear();
                self.state
                    .toast(ToastLevel::Success, format!("welcome, {username}"));
                self.state.username = Some(username);
            }
            Err(err) => {
                warn!(%err, "could not store session");
                self.state.toast(ToastLevel::Error, err.to_string());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match map_key(key) {
            AppAction::Quit => self.should_quit = true,
            AppAction::Tab(index) => {
                if let Some(tab) = Tab::from_index(index) {
                    self.switch_tab(tab);
                }
            }
            action => match self.state.tab {
                Tab::Records => self.handle_records(action),
                Tab::Keep => self.handle_keep(action),
                Tab::Settings => self.handle_settings(action),
            },
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.state.tab == tab {
            return;
        }
        self.state.tab = tab;
        match tab {
            Tab::Records => {
                let intent = self.state.records.view.refresh_gesture();
                self.apply_intent(intent);
            }
            Tab::Keep => self.state.keep = KeepState::new(now_in(self.timezone)),
            Tab::Settings => {}
        }
    }

    fn handle_records(&mut self, action: AppAction) {
        if self.state.records.searching {
            self.handle_search(action);
            return;
        }

        let records = &mut self.state.records;
        let intent = match action {
            AppAction::Down | AppAction::Input('j') => {
                records.chart_open = false;
                records
                    .view
                    .select_next(records.controller.list(), records.viewport)
            }
            AppAction::Up | AppAction::Input('k') => {
                records.chart_open = false;
                records.view.select_prev(records.viewport);
                None
            }
            AppAction::Input('r') => Some(records.view.refresh_gesture()),
            AppAction::Input('d') => records.view.delete_gesture(records.controller.list()),
            AppAction::Input('c') => {
                records.chart_open = !records.chart_open;
                None
            }
            AppAction::Input('/') => {
                records.searching = true;
                records.search_input =
                    records.controller.list().keyword.clone().unwrap_or_default();
                None
            }
            AppAction::Input('m') => {
                let section_type = records.controller.list().section_type.toggled();
                records.view.reset();
                let command = records.controller.set_section_type(section_type);
                self.dispatch(command);
                None
            }
            AppAction::Cancel if records.controller.list().keyword.is_some() => {
                records.view.reset();
                let command = records.controller.search(None);
                self.dispatch(command);
                None
            }
            AppAction::Input('q') => {
                self.should_quit = true;
                None
            }
            _ => None,
        };

        if let Some(intent) = intent {
            self.apply_intent(intent);
        }
    }

    fn handle_search(&mut self, action: AppAction) {
        let records = &mut self.state.records;
        match action {
            AppAction::Cancel => {
                records.searching = false;
                records.search_input.clear();
            }
            AppAction::Submit => {
                records.searching = false;
                records.view.reset();
                let command = records.controller.search(Some(&records.search_input));
                self.dispatch(command);
            }
            AppAction::Backspace => {
                records.search_input.pop();
            }
            AppAction::Input(ch) => records.search_input.push(ch),
            _ => {}
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        let controller = &mut self.state.records.controller;
        let command = match intent {
            Intent::Delete(id) => Some(controller.delete(id)),
            Intent::LoadMore => {
                controller.request_load_more(Instant::now());
                None
            }
            Intent::Refresh => Some(controller.refresh()),
        };
        if let Some(command) = command {
            self.dispatch(command);
        }
    }

    fn handle_keep(&mut self, action: AppAction) {
        if self.state.keep.saving {
            return;
        }
        match action {
            AppAction::NextField | AppAction::Down => self.move_keep_focus(KeepField::next),
            AppAction::PrevField | AppAction::Up => self.move_keep_focus(KeepField::prev),
            AppAction::Submit => self.submit_record(),
            AppAction::Cancel => self.state.keep = KeepState::new(now_in(self.timezone)),
            AppAction::Backspace => {
                if let Some(field) = self.state.keep.field_mut() {
                    field.pop();
                }
            }
            AppAction::Input(' ') if self.state.keep.focus == KeepField::Kind => {
                self.state.keep.draft.next_kind();
            }
            AppAction::Input(' ') if self.state.keep.focus == KeepField::SubType => {
                self.state.keep.draft.next_sub_type();
            }
            AppAction::Input(ch) => {
                if let Some(field) = self.state.keep.field_mut() {
                    field.push(ch);
                }
            }
            _ => {}
        }
    }

    fn move_keep_focus(&mut self, step: fn(KeepField) -> KeepField) {
        let keep = &mut self.state.keep;
        if keep.focus == KeepField::Datetime
            && let Err(err) = keep.commit_datetime()
        {
            self.state.toast(ToastLevel::Error, err.to_string());
            return;
        }
        keep.focus = step(keep.focus);
    }

    fn submit_record(&mut self) {
        if let Err(err) = self.state.keep.commit_datetime() {
            self.state.toast(ToastLevel::Error, err.to_string());
            return;
        }
        let payload = match self.state.keep.draft.validate() {
            Ok(payload) => payload,
            Err(err) => {
                self.state.toast(ToastLevel::Error, err.to_string());
                return;
            }
        };
        let Some(token) = self.sessions.token().map(str::to_string) else {
            self.state
                .toast(ToastLevel::Error, sync_message(&SyncError::LoginRequired));
            return;
        };

        self.state.keep.saving = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.record_create(&token, &payload).await;
            let _ = tx.send(Completion::Created(result));
        });
    }

    fn handle_settings(&mut self, action: AppAction) {
        if self.state.username.is_some() {
            if let AppAction::Input('l') = action {
                self.logout();
            }
            return;
        }
        if self.state.settings.logging_in {
            return;
        }

        let settings = &mut self.state.settings;
        match action {
            AppAction::Submit => self.login(),
            AppAction::Cancel => settings.password.clear(),
            AppAction::Backspace => {
                settings.password.pop();
            }
            AppAction::Input(ch) => settings.password.push(ch),
            _ => {}
        }
    }

    fn login(&mut self) {
        let password = self.state.settings.password.trim().to_string();
        if password.is_empty() {
            self.state.toast(ToastLevel::Error, "enter the password");
            return;
        }

        self.state.settings.logging_in = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.login(&password).await;
            let _ = tx.send(Completion::LoggedIn(result));
        });
    }

    fn logout(&mut self) {
        if let Err(err) = self.sessions.delete() {
            warn!(%err, "could not delete session");
            self.state.toast(ToastLevel::Error, err.to_string());
            return;
        }
        info!("logged out");
        self.state.records.reset();
        self.state.username = None;
        self.state.toast(ToastLevel::Info, "logged out");
    }
}

fn now_in(timezone: Tz) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&timezone).fixed_offset()
}

fn sync_message(err: &SyncError) -> String {
    match err {
        SyncError::LoginRequired => "please log in (F3)".to_string(),
        SyncError::Request(message) => message.clone(),
    }
}

/// Toast shown for a controller notice; a successful load is silent.
fn toast_for_notice(notice: &Notice) -> Option<(ToastLevel, String)> {
    match notice {
        Notice::Loaded => None,
        Notice::Deleted => Some((ToastLevel::Success, "deleted".to_string())),
        Notice::LoadFailed(err) | Notice::DeleteFailed(err) => {
            Some((ToastLevel::Error, sync_message(err)))
        }
    }
}
