// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Single-flight request lifecycle for the conversation.
//!
//! Exactly one request may be live at a time. Starting a new one cancels the previous live
//! request first, and every outcome is checked against the live token before it is folded into
//! the conversation log, so a late response from a cancelled or superseded request is dropped.

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{Operation, Reply, RequestError};
use crate::model::ConversationLog;
use crate::render;

/// Monotonically increasing identity of a started request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

/// Everything the executor needs to run a started request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub token: RequestToken,
    pub operation: Operation,
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    InFlight(RequestToken),
    Cancelled,
    Succeeded(Reply),
    Failed(RequestError),
}

/// What the transport reported for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Replied(Result<Reply, RequestError>),
    Cancelled,
}

/// How [`RequestLifecycle::settle`] handled an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The outcome belonged to a cancelled or superseded request and was discarded.
    Stale,
    Stopped,
    Succeeded,
    Failed,
}

#[derive(Debug)]
struct LiveRequest {
    token: RequestToken,
    cancel: CancellationToken,
}

#[derive(Debug)]
pub struct RequestLifecycle {
    state: RequestState,
    live: Option<LiveRequest>,
    next_token: u64,
    rev: u64,
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self { state: RequestState::Idle, live: None, next_token: 1, rev: 0 }
    }
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// True while a request is in flight; views disable input and show a stop affordance.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, RequestState::InFlight(_))
    }

    pub fn live_token(&self) -> Option<RequestToken> {
        self.live.as_ref().map(|live| live.token)
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// Cancels any live request, then hands out a ticket for `operation`.
    pub fn start(&mut self, operation: Operation) -> RequestTicket {
        if let Some(previous) = self.live.take() {
            previous.cancel.cancel();
            debug!(token = %previous.token, "superseded in-flight request");
        }

        let token = RequestToken(self.next_token);
        self.next_token += 1;
        let cancel = CancellationToken::new();
        self.live = Some(LiveRequest { token, cancel: cancel.clone() });
        self.state = RequestState::InFlight(token);
        self.bump();

        info!(token = %token, op = %operation.kind(), "request started");
        RequestTicket { token, operation, cancel }
    }

    /// User-initiated stop. Returns `false` (and does nothing) unless a request is in flight.
    pub fn cancel(&mut self, log: &mut ConversationLog) -> bool {
        let Some(live) = self.live.take() else {
            return false;
        };
        live.cancel.cancel();
        info!(token = %live.token, "request cancelled");
        self.stop(log);
        true
    }

    /// Folds `outcome` into the log if `token` is still the live request.
    pub fn settle(
        &mut self,
        token: RequestToken,
        outcome: Outcome,
        log: &mut ConversationLog,
    ) -> Settled {
        if self.live_token() != Some(token) {
            debug!(token = %token, "dropped stale response");
            return Settled::Stale;
        }
        self.live = None;

        match outcome {
            Outcome::Replied(Ok(reply)) => {
                log.extend(render::reply_turns(&reply));
                info!(token = %token, "request succeeded");
                self.state = RequestState::Succeeded(reply);
                self.bump();
                Settled::Succeeded
            }
            Outcome::Replied(Err(error)) => {
                warn!(token = %token, error = %error, "request failed");
                log.append(render::error_turn(&error));
                self.state = RequestState::Failed(error);
                self.bump();
                Settled::Failed
            }
            Outcome::Cancelled => {
                self.stop(log);
                Settled::Stopped
            }
        }
    }

    fn stop(&mut self, log: &mut ConversationLog) {
        log.append(render::stopped_turn());
        self.state = RequestState::Cancelled;
        self.bump();
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}
