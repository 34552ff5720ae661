// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runs [`Effect`]s on tokio and reports their [`Completion`]s over a channel.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::api::{ApiClient, Transport};
use crate::navigator::ListingRequest;
use crate::prefs::{Preferences, PreferencesStore, PrefsError};
use crate::request::{Outcome, RequestTicket};
use crate::session::{Completion, Effect, PanelRequest};

pub struct Executor<T> {
    client: Arc<ApiClient<T>>,
    completions: UnboundedSender<Completion>,
    handle: Handle,
    preferences: Option<PreferencesStore>,
}

impl<T: Transport> Executor<T> {
    pub fn new(client: ApiClient<T>, completions: UnboundedSender<Completion>, handle: Handle) -> Self {
        Self { client: Arc::new(client), completions, handle, preferences: None }
    }

    pub fn with_preferences(mut self, store: PreferencesStore) -> Self {
        self.preferences = Some(store);
        self
    }

    /// Spawns every network effect and saves preference changes in place.
    ///
    /// Network failures come back as completions; only a failed preference save is returned.
    pub fn dispatch(&self, effects: Vec<Effect>) -> Result<(), PrefsError> {
        let mut saved = Ok(());
        for effect in effects {
            match effect {
                Effect::Request(ticket) => self.spawn_request(ticket),
                Effect::List(request) => self.spawn_listing(request),
                Effect::Panel(request) => self.spawn_panel(request),
                Effect::PersistTheme(theme) => {
                    let Some(store) = &self.preferences else {
                        continue;
                    };
                    if let Err(err) = store.save(&Preferences { theme }) {
                        warn!(path = ?store.path(), error = %err, "failed to save preferences");
                        saved = Err(err);
                    }
                }
            }
        }
        saved
    }

    fn spawn_request(&self, ticket: RequestTicket) {
        let client = Arc::clone(&self.client);
        let completions = self.completions.clone();
        self.handle.spawn(async move {
            let RequestTicket { token, operation, cancel } = ticket;
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => Outcome::Cancelled,
                result = client.perform(&operation) => Outcome::Replied(result),
            };
            if completions.send(Completion::Request { token, outcome }).is_err() {
                debug!(token = %token, "completion receiver dropped");
            }
        });
    }

    fn spawn_listing(&self, request: ListingRequest) {
        let client = Arc::clone(&self.client);
        let completions = self.completions.clone();
        self.handle.spawn(async move {
            let result = client.list_directory(&request.path).await;
            if completions.send(Completion::Listing { token: request.token, result }).is_err() {
                debug!(token = %request.token, "completion receiver dropped");
            }
        });
    }

    fn spawn_panel(&self, request: PanelRequest) {
        let client = Arc::clone(&self.client);
        let completions = self.completions.clone();
        self.handle.spawn(async move {
            let result = client.perform(&request.operation).await;
            if completions.send(Completion::Panel { token: request.token, result }).is_err() {
                debug!(token = %request.token, "completion receiver dropped");
            }
        });
    }
}
