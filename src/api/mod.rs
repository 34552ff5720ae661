// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Backend request/response contracts.
//!
//! All calls are plain HTTP+JSON against a fixed base URL. Any non-2xx status is a rejection,
//! and any payload that does not carry the fields the client consumes is malformed.

pub mod client;
pub mod error;
pub mod operation;
pub mod types;

pub use client::{ApiCall, ApiClient, HttpTransport, Method, RawResponse, Transport};
pub use error::RequestError;
pub use operation::{IndexStats, IngestSummary, Operation, OperationKind, Reply};
