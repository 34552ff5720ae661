// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::future;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use knine::api::{ApiCall, ApiClient, RawResponse, Transport};
use knine::config::ClientConfig;
use knine::model::Author;
use knine::prefs::Theme;
use knine::runtime::Executor;
use knine::session::{Action, Completion, Effect, Session};
use serde_json::json;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// In-memory backend: canned answers per endpoint, `/chat` never answers.
#[derive(Clone, Default)]
struct ScriptedBackend {
    calls: Arc<Mutex<Vec<ApiCall>>>,
}

impl ScriptedBackend {
    fn paths(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls").iter().map(|call| call.path).collect()
    }

    fn last_body(&self, path: &str) -> Option<serde_json::Value> {
        self.calls
            .lock()
            .expect("calls")
            .iter()
            .rev()
            .find(|call| call.path == path)
            .and_then(|call| call.body.clone())
    }
}

fn ok(body: serde_json::Value) -> Result<RawResponse, String> {
    Ok(RawResponse { status: 200, body: body.to_string() })
}

#[async_trait]
impl Transport for ScriptedBackend {
    async fn send(&self, call: ApiCall) -> Result<RawResponse, String> {
        self.calls.lock().expect("calls").push(call.clone());
        match call.path {
            "/stats" => ok(json!({
                "collection": "docs",
                "num_embeddings": 42,
                "embed_model": "nomic-embed",
                "llm_model": "llama3",
            })),
            "/list-directory" => {
                let path = call.body.as_ref().and_then(|body| body["path"].as_str()).unwrap_or("");
                match path {
                    "." | "/srv" => ok(json!({
                        "path": "/srv",
                        "parent": "/",
                        "items": [
                            { "name": "docs", "type": "dir", "path": "/srv/docs" },
                            { "name": "a.txt", "type": "file", "path": "/srv/a.txt" },
                        ],
                    })),
                    "/srv/docs" => ok(json!({ "path": "/srv/docs", "parent": "/srv", "items": [] })),
                    _ => Err("no such directory".to_owned()),
                }
            }
            "/ingest" => ok(json!({ "processed_files": 3, "processed_chunks": 17, "skipped_files": 1 })),
            "/recent-files" => Ok(RawResponse { status: 500, body: "boom".to_owned() }),
            _ => future::pending().await,
        }
    }
}

struct Harness {
    backend: ScriptedBackend,
    executor: Executor<ScriptedBackend>,
    completions: UnboundedReceiver<Completion>,
    session: Session,
}

impl Harness {
    fn new() -> Self {
        let backend = ScriptedBackend::default();
        let (tx, completions) = mpsc::unbounded_channel();
        let executor = Executor::new(ApiClient::new(backend.clone()), tx, Handle::current());
        let session = Session::new(ClientConfig::default(), Theme::Dark);
        Self { backend, executor, completions, session }
    }

    fn run(&self, effects: Vec<Effect>) {
        self.executor.dispatch(effects).expect("dispatch");
    }

    async fn settle_next(&mut self) -> bool {
        let completion = self.completions.recv().await.expect("completion");
        self.session.apply(completion)
    }

    fn bodies(&self) -> Vec<(Author, String)> {
        self.session
            .log()
            .turns()
            .iter()
            .map(|turn| (turn.author(), turn.body().to_owned()))
            .collect()
    }
}

#[tokio::test]
async fn stats_action_logs_request_and_reply() {
    let mut h = Harness::new();

    let effects = h.session.dispatch(Action::Stats);
    h.run(effects);
    assert!(h.session.is_busy());
    assert!(h.settle_next().await);

    assert!(!h.session.is_busy());
    assert_eq!(
        h.bodies()[1..],
        [
            (Author::User, "statistics".to_owned()),
            (
                Author::Agent,
                "current statistics:\n・collection: docs\n・embeddings: 42\n・embedding model: nomic-embed\n・LLM model: llama3"
                    .to_owned()
            ),
        ]
    );
    assert_eq!(h.backend.paths(), ["/stats"]);
}

#[tokio::test]
async fn ingest_through_the_directory_picker() {
    let mut h = Harness::new();

    let effects = h.session.dispatch(Action::Ingest);
    h.run(effects);
    assert!(h.settle_next().await);
    let docs = h
        .session
        .navigator()
        .state()
        .and_then(|state| state.entries.iter().find(|entry| entry.is_directory()).cloned())
        .expect("docs entry");

    let effects = h.session.descend(&docs);
    h.run(effects);
    assert!(h.settle_next().await);
    assert_eq!(h.session.navigator().state().map(|state| state.current_path.as_str()), Some("/srv/docs"));

    let effects = h.session.confirm_selection();
    h.run(effects);
    assert!(!h.session.navigator().is_open());
    assert!(h.settle_next().await);

    let bodies = h.bodies();
    assert_eq!(bodies[bodies.len() - 2], (Author::User, "ingest documents: /srv/docs".to_owned()));
    assert!(bodies[bodies.len() - 1].1.starts_with("ingest complete."));
    assert_eq!(h.backend.last_body("/ingest"), Some(json!({ "paths": ["/srv/docs"] })));
}

#[tokio::test]
async fn superseded_chat_never_reaches_the_log() {
    let mut h = Harness::new();

    let effects = h.session.submit("what is in my notes?");
    h.run(effects);
    let effects = h.session.dispatch(Action::Stats);
    h.run(effects);

    // One late cancellation for the chat, one stats reply.
    h.settle_next().await;
    h.settle_next().await;

    let bodies = h.bodies();
    assert_eq!(bodies.len(), 4);
    assert_eq!(bodies[1], (Author::User, "what is in my notes?".to_owned()));
    assert_eq!(bodies[2], (Author::User, "statistics".to_owned()));
    assert!(bodies[3].1.starts_with("current statistics:"));
    assert!(!bodies.iter().any(|(_, body)| body == "generation stopped."));
}

#[tokio::test]
async fn stopping_twice_logs_one_stop_turn() {
    let mut h = Harness::new();

    let effects = h.session.submit("long question");
    h.run(effects);
    assert!(h.session.stop());
    assert!(!h.session.stop());
    assert!(!h.settle_next().await, "cancelled completion must be dropped");

    let stops = h.bodies().iter().filter(|(_, body)| body == "generation stopped.").count();
    assert_eq!(stops, 1);
}

#[tokio::test]
async fn backend_rejection_becomes_an_error_turn() {
    let mut h = Harness::new();

    let effects = h.session.dispatch(Action::RecentFiles);
    h.run(effects);
    assert!(h.settle_next().await);

    assert_eq!(
        h.bodies().last(),
        Some(&(Author::Agent, "error occurred: could not fetch recent files".to_owned()))
    );
    assert!(!h.session.is_busy());
}

#[tokio::test]
async fn declined_reset_sends_nothing() {
    let mut h = Harness::new();
    let before = h.bodies();

    let effects = h.session.dispatch(Action::Reset);
    assert!(effects.is_empty());
    let effects = h.session.resolve_confirm(false);
    assert!(effects.is_empty());
    h.run(effects);

    assert_eq!(h.bodies(), before);
    assert!(h.backend.paths().is_empty());
    assert!(h.completions.try_recv().is_err());
}
