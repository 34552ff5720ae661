// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    pub path: String,
}

impl DirectoryEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// One successful remote directory listing.
///
/// `parent` is `None` at the navigation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub path: String,
    pub parent: Option<String>,
    pub entries: Vec<DirectoryEntry>,
}

/// What the directory picker currently shows.
///
/// `current_path`, `parent_path` and `entries` always come from the same successful listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorState {
    pub current_path: String,
    pub parent_path: Option<String>,
    pub entries: Vec<DirectoryEntry>,
    pub loading: bool,
}

impl NavigatorState {
    pub fn from_listing(listing: DirectoryListing) -> Self {
        Self {
            current_path: listing.path,
            parent_path: listing.parent,
            entries: listing.entries,
            loading: false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_path.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFile {
    pub name: String,
    pub path: String,
    pub mtime_str: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestedFile {
    pub path: String,
    pub mtime: f64,
    pub chunk_count: u64,
}
