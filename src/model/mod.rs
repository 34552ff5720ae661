// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! The conversation log owns every turn; directory types describe what the remote filesystem
//! listing returned.

pub mod directory;
pub mod log;
pub mod turn;

pub use directory::{
    DirectoryEntry, DirectoryListing, EntryKind, IngestedFile, NavigatorState, RecentFile,
};
pub use log::ConversationLog;
pub use turn::{Author, BodyFormat, Citation, Turn, TurnDraft};
