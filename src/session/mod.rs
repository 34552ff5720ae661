// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interaction controller.
//!
//! `Session` owns the conversation log, the request lifecycle, the directory navigator and the
//! memory panel. It performs no I/O: every user gesture returns the [`Effect`]s the host must
//! run, and the host feeds the results back as [`Completion`]s. This keeps the whole controller
//! drivable from tests without a terminal or a network.

mod memory;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::api::{Operation, Reply, RequestError};
use crate::command::{classify, Intent};
use crate::config::ClientConfig;
use crate::model::{ConversationLog, DirectoryEntry, DirectoryListing, TurnDraft};
use crate::navigator::{DirectoryNavigator, ListingRequest, ListingToken, PendingSelection};
use crate::prefs::Theme;
use crate::render;
use crate::request::{Outcome, RequestLifecycle, RequestState, RequestTicket, RequestToken, Settled};

pub use memory::{MemoryPanel, PanelRequest, PanelToken};

pub const RESET_CONFIRMATION: &str =
    "Really reset memory?\nAll ingested document information will be erased.";
pub const DEFAULT_FOLDER_NAME: &str = "new_folder";
pub const DEFAULT_FILE_NAME: &str = "new_file.txt";

/// Work the host must carry out on the session's behalf.
#[derive(Debug, Clone)]
pub enum Effect {
    Request(RequestTicket),
    List(ListingRequest),
    Panel(PanelRequest),
    PersistTheme(Theme),
}

/// The result of an [`Effect`], reported back by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Request { token: RequestToken, outcome: Outcome },
    Listing { token: ListingToken, result: Result<DirectoryListing, RequestError> },
    Panel { token: PanelToken, result: Result<Reply, RequestError> },
}

/// The closed set of menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    OpenFolder,
    CreateFolder,
    CreateFile,
    RecentFiles,
    Ingest,
    Stats,
    ManageMemory,
    Help,
    ToggleTheme,
    Reset,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::OpenFolder,
        Action::CreateFolder,
        Action::CreateFile,
        Action::RecentFiles,
        Action::Ingest,
        Action::Stats,
        Action::ManageMemory,
        Action::Help,
        Action::ToggleTheme,
        Action::Reset,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::OpenFolder => "open-folder",
            Self::CreateFolder => "create-folder",
            Self::CreateFile => "create-file",
            Self::RecentFiles => "recent-files",
            Self::Ingest => "ingest",
            Self::Stats => "stats",
            Self::ManageMemory => "manage-memory",
            Self::Help => "help",
            Self::ToggleTheme => "toggle-theme",
            Self::Reset => "reset",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenFolder => "Open folder",
            Self::CreateFolder => "Create folder",
            Self::CreateFile => "Create file",
            Self::RecentFiles => "Recent files",
            Self::Ingest => "Ingest documents",
            Self::Stats => "Statistics",
            Self::ManageMemory => "Manage memory",
            Self::Help => "Help",
            Self::ToggleTheme => "Toggle theme",
            Self::Reset => "Reset memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action: {}", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "open-search" {
            return Ok(Self::OpenFolder);
        }
        Self::ALL
            .into_iter()
            .find(|action| action.id() == value)
            .ok_or_else(|| UnknownAction(value.to_owned()))
    }
}

/// A question the host must put to the user before a flow can continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Confirm { message: String },
    Prompt { message: String, default: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Continuation {
    Reset,
    DeleteFile(String),
    NameFolder { parent: String },
    NameFile { parent: String },
}

#[derive(Debug)]
pub struct Session {
    config: ClientConfig,
    log: ConversationLog,
    requests: RequestLifecycle,
    navigator: DirectoryNavigator,
    memory: MemoryPanel,
    pending: Option<(Interaction, Continuation)>,
    theme: Theme,
    rev: u64,
}

impl Session {
    pub fn new(config: ClientConfig, theme: Theme) -> Self {
        Self {
            config,
            log: ConversationLog::with_greeting(render::GREETING),
            requests: RequestLifecycle::new(),
            navigator: DirectoryNavigator::new(),
            memory: MemoryPanel::default(),
            pending: None,
            theme,
            rev: 0,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn request_state(&self) -> &RequestState {
        self.requests.state()
    }

    pub fn is_busy(&self) -> bool {
        self.requests.is_busy()
    }

    pub fn navigator(&self) -> &DirectoryNavigator {
        &self.navigator
    }

    pub fn memory(&self) -> &MemoryPanel {
        &self.memory
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn pending_interaction(&self) -> Option<&Interaction> {
        self.pending.as_ref().map(|(interaction, _)| interaction)
    }

    /// Changes whenever anything a view could draw has changed.
    pub fn rev(&self) -> u64 {
        self.rev
            .wrapping_add(self.log.rev())
            .wrapping_add(self.requests.rev())
            .wrapping_add(self.navigator.rev())
            .wrapping_add(self.memory.rev())
    }

    /// Free-text input line. Blank input and input while busy are ignored.
    pub fn submit(&mut self, text: &str) -> Vec<Effect> {
        if text.trim().is_empty() || self.is_busy() {
            return Vec::new();
        }

        self.log.append(TurnDraft::user(text));
        let operation = match classify(text) {
            Intent::Chat(query) => Operation::Chat { query, top_k: self.config.chat_top_k },
            Intent::Search(query) => Operation::Search { query, k: self.config.search_k },
            Intent::Ingest(paths) => Operation::Ingest { paths },
            Intent::Preview(path) => Operation::Preview { path, nchars: self.config.preview_chars },
            Intent::Stats => Operation::Stats,
        };
        self.issue(operation)
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        debug!(action = action.id(), "dispatch");
        match action {
            Action::OpenFolder => {
                self.log.append(TurnDraft::user("open folder"));
                let path = self.config.open_folder_path.clone();
                self.issue(Operation::OpenFolder { path })
            }
            Action::CreateFolder => self.open_picker(PendingSelection::CreateFolder),
            Action::CreateFile => self.open_picker(PendingSelection::CreateFile),
            Action::Ingest => self.open_picker(PendingSelection::Ingest),
            Action::RecentFiles => {
                self.log.append(TurnDraft::user("show recent files"));
                let limit = self.config.recent_files_limit;
                self.issue(Operation::RecentFiles { limit })
            }
            Action::Stats => {
                self.log.append(TurnDraft::user("statistics"));
                self.issue(Operation::Stats)
            }
            Action::ManageMemory => vec![Effect::Panel(self.memory.open())],
            Action::Help => {
                self.log.append(TurnDraft::user("show help"));
                self.log.append(TurnDraft::agent(render::HELP_TEXT));
                Vec::new()
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.bump();
                vec![Effect::PersistTheme(self.theme)]
            }
            Action::Reset => {
                self.ask(
                    Interaction::Confirm { message: RESET_CONFIRMATION.to_owned() },
                    Continuation::Reset,
                );
                Vec::new()
            }
        }
    }

    /// Stop affordance. Returns `false` when nothing was in flight.
    pub fn stop(&mut self) -> bool {
        self.requests.cancel(&mut self.log)
    }

    /// Previews a cited file, recorded in the log as the equivalent slash command.
    pub fn preview_citation(&mut self, path: &str) -> Vec<Effect> {
        self.log.append(TurnDraft::user(format!("/preview {path}")));
        let nchars = self.config.preview_chars;
        self.issue(Operation::Preview { path: path.to_owned(), nchars })
    }

    pub fn descend(&mut self, entry: &DirectoryEntry) -> Vec<Effect> {
        self.navigator.descend(entry).map(Effect::List).into_iter().collect()
    }

    pub fn ascend(&mut self) -> Vec<Effect> {
        self.navigator.ascend().map(Effect::List).into_iter().collect()
    }

    pub fn jump_to_breadcrumb(&mut self, path: &str) -> Vec<Effect> {
        self.navigator.jump_to_breadcrumb(path).map(Effect::List).into_iter().collect()
    }

    pub fn cancel_picker(&mut self) {
        self.navigator.cancel_picker();
    }

    /// Hands the picker's current path to whichever flow opened it.
    pub fn confirm_selection(&mut self) -> Vec<Effect> {
        let Some((selection, path)) = self.navigator.confirm() else {
            return Vec::new();
        };
        match selection {
            PendingSelection::Ingest => {
                self.log.append(TurnDraft::user(format!("ingest documents: {path}")));
                self.issue(Operation::Ingest { paths: vec![path] })
            }
            PendingSelection::CreateFolder => {
                self.ask(
                    Interaction::Prompt {
                        message: format!("name of the folder to create in \"{path}\":"),
                        default: DEFAULT_FOLDER_NAME.to_owned(),
                    },
                    Continuation::NameFolder { parent: path },
                );
                Vec::new()
            }
            PendingSelection::CreateFile => {
                self.ask(
                    Interaction::Prompt {
                        message: format!("name of the file to create in \"{path}\":"),
                        default: DEFAULT_FILE_NAME.to_owned(),
                    },
                    Continuation::NameFile { parent: path },
                );
                Vec::new()
            }
        }
    }

    pub fn refresh_memory(&mut self) -> Vec<Effect> {
        if !self.memory.is_open() {
            return Vec::new();
        }
        vec![Effect::Panel(self.memory.refresh())]
    }

    pub fn request_delete(&mut self, path: &str) {
        if self.memory.is_open() {
            self.ask(
                Interaction::Confirm { message: format!("delete \"{path}\"?") },
                Continuation::DeleteFile(path.to_owned()),
            );
        }
    }

    pub fn close_memory(&mut self) {
        self.memory.close();
    }

    /// Answers a pending [`Interaction::Confirm`]. Declining is a silent no-op.
    pub fn resolve_confirm(&mut self, accepted: bool) -> Vec<Effect> {
        let Some((Interaction::Confirm { .. }, continuation)) = self.take_pending(true) else {
            return Vec::new();
        };
        if !accepted {
            debug!("confirmation declined");
            return Vec::new();
        }
        match continuation {
            Continuation::Reset => {
                self.log.append(TurnDraft::user("reset memory"));
                self.issue(Operation::Reset)
            }
            Continuation::DeleteFile(path) if self.memory.is_open() => {
                vec![Effect::Panel(self.memory.delete(path))]
            }
            Continuation::DeleteFile(path) => {
                debug!(%path, "memory panel closed before delete was confirmed");
                Vec::new()
            }
            Continuation::NameFolder { .. } | Continuation::NameFile { .. } => Vec::new(),
        }
    }

    /// Answers a pending [`Interaction::Prompt`]. `None` or a blank name abandons the flow.
    pub fn resolve_prompt(&mut self, answer: Option<String>) -> Vec<Effect> {
        let Some((Interaction::Prompt { .. }, continuation)) = self.take_pending(false) else {
            return Vec::new();
        };
        let Some(name) = answer.map(|name| name.trim().to_owned()).filter(|name| !name.is_empty())
        else {
            debug!("prompt dismissed");
            return Vec::new();
        };
        match continuation {
            Continuation::NameFolder { parent } => {
                let path = join_remote(&parent, &name);
                self.log.append(TurnDraft::user(format!("create folder: {path}")));
                self.issue(Operation::CreateFolder { path })
            }
            Continuation::NameFile { parent } => {
                let path = join_remote(&parent, &name);
                self.log.append(TurnDraft::user(format!("create file: {path}")));
                self.issue(Operation::CreateFile { path })
            }
            Continuation::Reset | Continuation::DeleteFile(_) => Vec::new(),
        }
    }

    /// Folds a finished effect back in. Returns `false` when the completion was stale.
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Request { token, outcome } => {
                let settled = self.requests.settle(token, outcome, &mut self.log);
                if settled == Settled::Succeeded
                    && matches!(self.requests.state(), RequestState::Succeeded(Reply::Reset))
                {
                    self.memory.clear_after_reset();
                }
                settled != Settled::Stale
            }
            Completion::Listing { token, result } => self.navigator.apply_listing(token, result),
            Completion::Panel { token, result } => self.memory.apply(token, result),
        }
    }

    fn issue(&mut self, operation: Operation) -> Vec<Effect> {
        vec![Effect::Request(self.requests.start(operation))]
    }

    fn open_picker(&mut self, selection: PendingSelection) -> Vec<Effect> {
        let root = self.config.navigator_root.clone();
        vec![Effect::List(self.navigator.open(selection, &root))]
    }

    fn ask(&mut self, interaction: Interaction, continuation: Continuation) {
        if let Some((replaced, _)) = self.pending.replace((interaction, continuation)) {
            debug!(?replaced, "abandoned unresolved interaction");
        }
        self.bump();
    }

    /// Takes the pending interaction if it is of the requested kind.
    fn take_pending(&mut self, confirm: bool) -> Option<(Interaction, Continuation)> {
        let matches = match self.pending.as_ref()? {
            (Interaction::Confirm { .. }, _) => confirm,
            (Interaction::Prompt { .. }, _) => !confirm,
        };
        if !matches {
            return None;
        }
        self.bump();
        self.pending.take()
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}

/// Joins a picked remote directory and a user-supplied name with the directory's own separator.
pub fn join_remote(parent: &str, name: &str) -> String {
    let separator = if parent.contains('\\') { '\\' } else { '/' };
    format!("{parent}{separator}{name}")
}
