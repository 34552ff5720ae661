// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use tracing::{debug, warn};

use crate::api::{Operation, Reply, RequestError};
use crate::model::IngestedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelToken(u64);

impl fmt::Display for PanelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mem#{}", self.0)
    }
}

/// A backend call issued on the memory panel's own slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRequest {
    pub token: PanelToken,
    pub operation: Operation,
}

/// The ingested-documents panel.
///
/// Failures never reach the conversation log; they show up as a `notice` inside the panel.
#[derive(Debug)]
pub struct MemoryPanel {
    open: bool,
    files: Vec<IngestedFile>,
    notice: Option<String>,
    live: Option<PanelToken>,
    next_token: u64,
    rev: u64,
}

impl Default for MemoryPanel {
    fn default() -> Self {
        Self { open: false, files: Vec::new(), notice: None, live: None, next_token: 1, rev: 0 }
    }
}

impl MemoryPanel {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.live.is_some()
    }

    pub fn files(&self) -> &[IngestedFile] {
        &self.files
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub(crate) fn open(&mut self) -> PanelRequest {
        self.open = true;
        self.refresh()
    }

    pub(crate) fn refresh(&mut self) -> PanelRequest {
        self.issue(Operation::IngestedFiles)
    }

    pub(crate) fn delete(&mut self, path: String) -> PanelRequest {
        self.issue(Operation::DeleteFile { path })
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
        self.live = None;
        self.notice = None;
        self.bump();
    }

    /// A reset wipes every ingested document, so the panel has nothing left to show.
    pub(crate) fn clear_after_reset(&mut self) {
        self.files.clear();
        self.close();
    }

    pub(crate) fn apply(&mut self, token: PanelToken, result: Result<Reply, RequestError>) -> bool {
        if self.live != Some(token) {
            debug!(token = %token, "dropped stale memory panel response");
            return false;
        }
        self.live = None;

        match result {
            Ok(Reply::IngestedFiles(files)) => {
                self.files = files;
                self.notice = None;
            }
            Ok(Reply::FileDeleted { path }) => {
                self.files.retain(|file| file.path != path);
                self.notice = None;
            }
            Ok(other) => {
                warn!(token = %token, reply = ?other, "unexpected memory panel reply");
            }
            Err(err) => {
                warn!(token = %token, error = %err, "memory panel request failed");
                self.notice = Some(err.user_message().to_owned());
            }
        }
        self.bump();
        true
    }

    fn issue(&mut self, operation: Operation) -> PanelRequest {
        let token = PanelToken(self.next_token);
        self.next_token += 1;
        self.live = Some(token);
        self.bump();
        PanelRequest { token, operation }
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}
