// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::operation::OperationKind;

/// Why a backend call did not produce a usable reply.
///
/// Cancellation is deliberately absent: it is not a failure and is reported separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The backend could not be reached or the body could not be read.
    Transport { op: OperationKind, message: String },
    /// Non-2xx response. `template` is fixed per operation and never taken from the body.
    Rejected { op: OperationKind, template: String, status: u16 },
    /// 2xx response whose payload does not match the expected shape.
    Malformed { op: OperationKind, template: String, detail: String },
}

impl RequestError {
    pub fn op(&self) -> OperationKind {
        match self {
            Self::Transport { op, .. } | Self::Rejected { op, .. } | Self::Malformed { op, .. } => {
                *op
            }
        }
    }

    /// Text shown to the user inside the `error occurred: ...` turn.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Transport { message, .. } => message,
            Self::Rejected { template, .. } | Self::Malformed { template, .. } => template,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { op, message } => write!(f, "{op} transport error: {message}"),
            Self::Rejected { op, template, status } => {
                write!(f, "{op} rejected with status {status}: {template}")
            }
            Self::Malformed { op, template, detail } => {
                write!(f, "{op} returned a malformed payload ({detail}): {template}")
            }
        }
    }
}

impl std::error::Error for RequestError {}
