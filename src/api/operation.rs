// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::model::{Citation, IngestedFile, RecentFile};

use super::types::{IngestPayload, StatsPayload};

/// A single backend request the client knows how to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Chat { query: String, top_k: u32 },
    Search { query: String, k: u32 },
    Ingest { paths: Vec<String> },
    Stats,
    Preview { path: String, nchars: u32 },
    OpenFolder { path: String },
    SelectFolder,
    CreateFolder { path: String },
    CreateFile { path: String },
    RecentFiles { limit: u32 },
    IngestedFiles,
    DeleteFile { path: String },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Chat,
    Search,
    Ingest,
    Stats,
    Preview,
    OpenFolder,
    SelectFolder,
    CreateFolder,
    CreateFile,
    RecentFiles,
    ListDirectory,
    IngestedFiles,
    DeleteFile,
    Reset,
}

impl OperationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Search => "search",
            Self::Ingest => "ingest",
            Self::Stats => "stats",
            Self::Preview => "preview",
            Self::OpenFolder => "open-folder",
            Self::SelectFolder => "select-folder",
            Self::CreateFolder => "create-folder",
            Self::CreateFile => "create-file",
            Self::RecentFiles => "recent-files",
            Self::ListDirectory => "list-directory",
            Self::IngestedFiles => "ingested-files",
            Self::DeleteFile => "delete-file",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Chat { .. } => OperationKind::Chat,
            Self::Search { .. } => OperationKind::Search,
            Self::Ingest { .. } => OperationKind::Ingest,
            Self::Stats => OperationKind::Stats,
            Self::Preview { .. } => OperationKind::Preview,
            Self::OpenFolder { .. } => OperationKind::OpenFolder,
            Self::SelectFolder => OperationKind::SelectFolder,
            Self::CreateFolder { .. } => OperationKind::CreateFolder,
            Self::CreateFile { .. } => OperationKind::CreateFile,
            Self::RecentFiles { .. } => OperationKind::RecentFiles,
            Self::IngestedFiles => OperationKind::IngestedFiles,
            Self::DeleteFile { .. } => OperationKind::DeleteFile,
            Self::Reset => OperationKind::Reset,
        }
    }

    /// Fixed message used when the backend rejects this operation or answers with garbage.
    pub fn failure_template(&self) -> String {
        match self {
            Self::Preview { path, .. } => format!("failed to fetch preview: {path}"),
            other => failure_template(other.kind()).to_owned(),
        }
    }
}

pub(crate) fn failure_template(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Chat => "invalid response from backend (chat)",
        OperationKind::Search => "invalid response from backend (search)",
        OperationKind::Ingest => "invalid response from backend (ingest)",
        OperationKind::Stats => "invalid response from backend (stats)",
        OperationKind::Preview => "failed to fetch preview",
        OperationKind::OpenFolder => "could not open folder",
        OperationKind::SelectFolder => "failed to select folder",
        OperationKind::CreateFolder => "could not create folder",
        OperationKind::CreateFile => "could not create file",
        OperationKind::RecentFiles => "could not fetch recent files",
        OperationKind::ListDirectory => "failed to list directory",
        OperationKind::IngestedFiles => "failed to fetch ingested files",
        OperationKind::DeleteFile => "failed to delete file",
        OperationKind::Reset => "reset failed",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub processed_files: u64,
    pub processed_chunks: u64,
    pub skipped_files: u64,
}

impl From<IngestPayload> for IngestSummary {
    fn from(value: IngestPayload) -> Self {
        Self {
            processed_files: value.processed_files,
            processed_chunks: value.processed_chunks,
            skipped_files: value.skipped_files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub collection: String,
    pub num_embeddings: u64,
    pub embed_model: String,
    pub llm_model: String,
}

impl From<StatsPayload> for IndexStats {
    fn from(value: StatsPayload) -> Self {
        Self {
            collection: value.collection,
            num_embeddings: value.num_embeddings,
            embed_model: value.embed_model,
            llm_model: value.llm_model,
        }
    }
}

/// Validated result of a successful [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Chat { answer: String, citations: Vec<Citation> },
    Search { query: String, results: Vec<Citation> },
    Ingest(IngestSummary),
    Stats(IndexStats),
    Preview { path: String, text: String },
    FolderOpened,
    FolderSelected(Option<String>),
    FolderCreated { path: String },
    FileCreated { path: String },
    RecentFiles(Vec<RecentFile>),
    IngestedFiles(Vec<IngestedFile>),
    FileDeleted { path: String },
    Reset,
}

#[cfg(test)]
mod tests {
    use super::{Operation, OperationKind};

    #[test]
    fn preview_template_names_the_path() {
        let op = Operation::Preview { path: "notes.md".to_owned(), nchars: 800 };
        assert_eq!(op.failure_template(), "failed to fetch preview: notes.md");
    }

    #[test]
    fn chat_template_is_fixed() {
        let op = Operation::Chat { query: "hi".to_owned(), top_k: 5 };
        assert_eq!(op.kind(), OperationKind::Chat);
        assert_eq!(op.failure_template(), "invalid response from backend (chat)");
    }
}
