// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire payloads returned by the backend.
//!
//! Every required field is a non-optional struct field so a payload missing one fails to
//! deserialize instead of leaking an absent value into the conversation. Extra fields are
//! ignored.

use serde::Deserialize;

use crate::model::{
    Citation, DirectoryEntry, DirectoryListing, EntryKind, IngestedFile, RecentFile,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CitationPayload {
    pub path: String,
    pub snippet: String,
    pub score: f64,
    pub mtime: f64,
}

impl From<CitationPayload> for Citation {
    fn from(value: CitationPayload) -> Self {
        Self { path: value.path, snippet: value.snippet, score: value.score, mtime: value.mtime }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatPayload {
    pub answer: String,
    pub citations: Vec<CitationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPayload {
    pub query: String,
    pub results: Vec<CitationPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngestPayload {
    pub processed_files: u64,
    pub processed_chunks: u64,
    pub skipped_files: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatsPayload {
    pub collection: String,
    pub num_embeddings: u64,
    pub embed_model: String,
    pub llm_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewPayload {
    pub path: String,
    pub preview: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectFolderPayload {
    pub status: String,
    #[serde(default)]
    pub path: Option<String>,
}

impl SelectFolderPayload {
    pub fn selected_path(self) -> Option<String> {
        if self.status != "ok" {
            return None;
        }
        self.path.filter(|path| !path.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentFilePayload {
    pub name: String,
    pub path: String,
    pub mtime_str: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentFilesPayload {
    pub files: Vec<RecentFilePayload>,
}

impl From<RecentFilePayload> for RecentFile {
    fn from(value: RecentFilePayload) -> Self {
        Self { name: value.name, path: value.path, mtime_str: value.mtime_str }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKindPayload {
    Dir,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryItemPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKindPayload,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListDirectoryPayload {
    pub path: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub items: Vec<DirectoryItemPayload>,
}

impl From<ListDirectoryPayload> for DirectoryListing {
    fn from(value: ListDirectoryPayload) -> Self {
        // The backend reports the filesystem root either without a parent, with an empty one,
        // or as its own parent.
        let parent = value.parent.filter(|parent| !parent.is_empty() && *parent != value.path);
        let entries = value
            .items
            .into_iter()
            .map(|item| DirectoryEntry {
                name: item.name,
                kind: match item.kind {
                    ItemKindPayload::Dir => EntryKind::Directory,
                    ItemKindPayload::File => EntryKind::File,
                },
                path: item.path,
            })
            .collect();
        Self { path: value.path, parent, entries }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestedFilePayload {
    pub path: String,
    pub mtime: f64,
    pub chunk_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestedFilesPayload {
    pub files: Vec<IngestedFilePayload>,
}

impl From<IngestedFilePayload> for IngestedFile {
    fn from(value: IngestedFilePayload) -> Self {
        Self { path: value.path, mtime: value.mtime, chunk_count: value.chunk_count }
    }
}

#[cfg(test)]
mod tests {
    use super::{ListDirectoryPayload, SelectFolderPayload, StatsPayload};
    use crate::model::{DirectoryListing, EntryKind};

    #[test]
    fn listing_maps_item_types_and_keeps_order() {
        let payload: ListDirectoryPayload = serde_json::from_str(
            r#"{"path":"/srv","parent":"/","items":[
                {"name":"docs","type":"dir","path":"/srv/docs"},
                {"name":"a.txt","type":"file","path":"/srv/a.txt"}
            ]}"#,
        )
        .expect("listing payload");
        let listing = DirectoryListing::from(payload);

        assert_eq!(listing.parent.as_deref(), Some("/"));
        assert_eq!(listing.entries.len(), 2);
        assert_eq!(listing.entries[0].kind, EntryKind::Directory);
        assert_eq!(listing.entries[1].kind, EntryKind::File);
        assert_eq!(listing.entries[1].path, "/srv/a.txt");
    }

    #[test]
    fn listing_root_parent_is_normalised_to_none() {
        for parent in [r#"null"#, r#""""#, r#""/""#] {
            let raw = format!(r#"{{"path":"/","parent":{parent},"items":[]}}"#);
            let payload: ListDirectoryPayload = serde_json::from_str(&raw).expect("payload");
            assert_eq!(DirectoryListing::from(payload).parent, None, "parent={parent}");
        }
    }

    #[test]
    fn stats_missing_field_is_rejected() {
        let result = serde_json::from_str::<StatsPayload>(
            r#"{"collection":"k9","num_embeddings":3,"embed_model":"e5"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn select_folder_requires_ok_status_and_path() {
        let ok: SelectFolderPayload =
            serde_json::from_str(r#"{"status":"ok","path":"/tmp"}"#).expect("payload");
        assert_eq!(ok.selected_path().as_deref(), Some("/tmp"));

        let cancelled: SelectFolderPayload =
            serde_json::from_str(r#"{"status":"cancelled"}"#).expect("payload");
        assert_eq!(cancelled.selected_path(), None);

        let empty: SelectFolderPayload =
            serde_json::from_str(r#"{"status":"ok","path":""}"#).expect("payload");
        assert_eq!(empty.selected_path(), None);
    }
}
