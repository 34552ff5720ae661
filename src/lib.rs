// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Knine: terminal client for the K-9 document assistant.
//!
//! The [`session`] core is sans-IO. It folds user input, menu actions and backend replies into
//! an append-only [`model::ConversationLog`] and returns [`session::Effect`]s that a host (the
//! [`tui`], or a test) executes through [`runtime::Executor`].

pub mod api;
pub mod command;
pub mod config;
pub mod model;
pub mod navigator;
pub mod prefs;
pub mod render;
pub mod request;
pub mod runtime;
pub mod session;
pub mod tui;
