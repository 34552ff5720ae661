// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Remote directory picker.
//!
//! The navigator never performs I/O itself. Every navigation hands back a [`ListingRequest`]
//! which the host executes and reports through [`DirectoryNavigator::apply_listing`]. Only the
//! response for the most recent request may change what the picker shows; a failed fetch leaves
//! the last good listing in place.

use std::fmt;

use tracing::{debug, warn};

use crate::api::RequestError;
use crate::model::{DirectoryEntry, DirectoryListing, NavigatorState};

/// Why the picker was opened; consumed once when the user confirms a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingSelection {
    CreateFile,
    CreateFolder,
    Ingest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListingToken(u64);

impl fmt::Display for ListingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ls#{}", self.0)
    }
}

/// A directory listing the host must fetch on the navigator's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub token: ListingToken,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorPhase {
    Closed,
    /// A listing is being fetched, or no listing has succeeded since the picker opened.
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
}

pub const ROOT_CRUMB: &str = "ROOT";

/// Splits `path` on `/` and `\` into clickable prefixes.
///
/// An absolute Unix path gets a synthetic `ROOT` crumb for `/`. Prefixes are rebuilt with `/`
/// and left for the backend to normalize.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = Vec::new();
    let mut accumulated = String::new();

    if path.starts_with('/') {
        crumbs.push(Breadcrumb { name: ROOT_CRUMB.to_owned(), path: "/".to_owned() });
        accumulated.push('/');
    }

    for part in path.split(['/', '\\']).filter(|part| !part.is_empty()) {
        if !(accumulated.is_empty() || accumulated == "/") {
            accumulated.push('/');
        }
        accumulated.push_str(part);
        crumbs.push(Breadcrumb { name: part.to_owned(), path: accumulated.clone() });
    }

    crumbs
}

#[derive(Debug)]
pub struct DirectoryNavigator {
    open: bool,
    pending: Option<PendingSelection>,
    state: Option<NavigatorState>,
    live: Option<ListingRequest>,
    next_token: u64,
    rev: u64,
}

impl Default for DirectoryNavigator {
    fn default() -> Self {
        Self { open: false, pending: None, state: None, live: None, next_token: 1, rev: 0 }
    }
}

impl DirectoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> NavigatorPhase {
        if !self.open {
            NavigatorPhase::Closed
        } else if self.live.is_some() || self.state.is_none() {
            NavigatorPhase::Loading
        } else {
            NavigatorPhase::Ready
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.live.is_some()
    }

    /// Last successful listing since the picker was opened.
    pub fn state(&self) -> Option<&NavigatorState> {
        self.state.as_ref()
    }

    pub fn pending(&self) -> Option<PendingSelection> {
        self.pending
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn crumbs(&self) -> Vec<Breadcrumb> {
        self.state.as_ref().map(|state| breadcrumbs(&state.current_path)).unwrap_or_default()
    }

    /// Opens the picker for `selection` and requests the first listing.
    ///
    /// Any listing from a previous session of the picker is discarded.
    pub fn open(&mut self, selection: PendingSelection, initial_path: &str) -> ListingRequest {
        self.open = true;
        self.pending = Some(selection);
        self.state = None;
        self.fetch(initial_path)
    }

    /// Descends into `entry`. Files and a closed picker yield no request.
    pub fn descend(&mut self, entry: &DirectoryEntry) -> Option<ListingRequest> {
        if !self.open || !entry.is_directory() {
            return None;
        }
        Some(self.fetch(&entry.path))
    }

    /// Goes to the parent of the current listing. A no-op at the navigation root.
    pub fn ascend(&mut self) -> Option<ListingRequest> {
        if !self.open {
            return None;
        }
        let parent = self.state.as_ref()?.parent_path.clone()?;
        Some(self.fetch(&parent))
    }

    pub fn jump_to_breadcrumb(&mut self, path: &str) -> Option<ListingRequest> {
        if !self.open {
            return None;
        }
        Some(self.fetch(path))
    }

    /// Applies a finished listing. Returns `false` when the response is stale and was dropped.
    pub fn apply_listing(
        &mut self,
        token: ListingToken,
        result: Result<DirectoryListing, RequestError>,
    ) -> bool {
        let requested = match &self.live {
            Some(live) if live.token == token => live.path.clone(),
            _ => {
                debug!(token = %token, "dropped stale directory listing");
                return false;
            }
        };
        self.live = None;

        match result {
            Ok(listing) => {
                debug!(token = %token, path = %listing.path, entries = listing.entries.len(), "listing applied");
                self.state = Some(NavigatorState::from_listing(listing));
            }
            Err(err) => {
                warn!(token = %token, path = %requested, error = %err, "directory listing failed");
                if let Some(state) = &mut self.state {
                    state.loading = false;
                }
            }
        }
        self.bump();
        true
    }

    /// Emits the current path to the pending selection and closes the picker.
    ///
    /// Returns `None` when the picker is closed or nothing has been listed yet.
    pub fn confirm(&mut self) -> Option<(PendingSelection, String)> {
        if !self.open {
            return None;
        }
        let path = self.state.as_ref()?.current_path.clone();
        let selection = self.pending.take()?;
        self.close();
        Some((selection, path))
    }

    pub fn cancel_picker(&mut self) {
        if self.open {
            self.pending = None;
            self.close();
        }
    }

    fn fetch(&mut self, path: &str) -> ListingRequest {
        let token = ListingToken(self.next_token);
        self.next_token += 1;
        if let Some(previous) = self.live.replace(ListingRequest { token, path: path.to_owned() }) {
            debug!(token = %previous.token, path = %previous.path, "superseded directory listing");
        }
        if let Some(state) = &mut self.state {
            state.loading = true;
        }
        self.bump();
        ListingRequest { token, path: path.to_owned() }
    }

    fn close(&mut self) {
        self.open = false;
        self.live = None;
        self.state = None;
        self.bump();
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests;
