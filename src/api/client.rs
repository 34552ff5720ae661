// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{ClientConfig, ConfigError};
use crate::model::DirectoryListing;

use super::error::RequestError;
use super::operation::{failure_template, Operation, OperationKind, Reply};
use super::types::{
    ChatPayload, IngestPayload, IngestedFilesPayload, ListDirectoryPayload, PreviewPayload,
    RecentFilesPayload, SearchPayload, SelectFolderPayload, StatsPayload,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One HTTP request against the backend base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: Method,
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ApiCall {
    pub fn get(path: &'static str) -> Self {
        Self { method: Method::Get, path, query: Vec::new(), body: None }
    }

    pub fn post(path: &'static str) -> Self {
        Self { method: Method::Post, path, query: Vec::new(), body: None }
    }

    pub fn with_query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves an [`ApiCall`] over the wire.
///
/// `Err` means the request never produced an HTTP status (unreachable host, broken body).
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, call: ApiCall) -> Result<RawResponse, String>;
}

/// `reqwest`-backed transport used by the binary.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| ConfigError::HttpClient { message: err.to_string() })?;

        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, call: ApiCall) -> Result<RawResponse, String> {
        let url = format!("{}{}", self.base_url, call.path);
        let mut request = match call.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| err.to_string())?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| err.to_string())?;
        Ok(RawResponse { status, body })
    }
}

/// Typed client over a [`Transport`]: builds calls, checks status, validates payloads.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn perform(&self, operation: &Operation) -> Result<Reply, RequestError> {
        let kind = operation.kind();
        let template = operation.failure_template();

        match operation {
            Operation::Chat { query, top_k } => {
                let call =
                    ApiCall::post("/chat").with_body(json!({ "query": query, "top_k": top_k }));
                let payload: ChatPayload = self.fetch_json(kind, &template, call).await?;
                Ok(Reply::Chat {
                    answer: payload.answer,
                    citations: payload.citations.into_iter().map(Into::into).collect(),
                })
            }
            Operation::Search { query, k } => {
                let call = ApiCall::get("/search").with_query("q", query).with_query("k", k);
                let payload: SearchPayload = self.fetch_json(kind, &template, call).await?;
                Ok(Reply::Search {
                    query: payload.query,
                    results: payload.results.into_iter().map(Into::into).collect(),
                })
            }
            Operation::Ingest { paths } => {
                let call = ApiCall::post("/ingest").with_body(json!({ "paths": paths }));
                let payload: IngestPayload = self.fetch_json(kind, &template, call).await?;
                Ok(Reply::Ingest(payload.into()))
            }
            Operation::Stats => {
                let payload: StatsPayload =
                    self.fetch_json(kind, &template, ApiCall::get("/stats")).await?;
                Ok(Reply::Stats(payload.into()))
            }
            Operation::Preview { path, nchars } => {
                let call =
                    ApiCall::get("/preview").with_query("path", path).with_query("nchars", nchars);
                let payload: PreviewPayload = self.fetch_json(kind, &template, call).await?;
                Ok(Reply::Preview { path: payload.path, text: payload.preview })
            }
            Operation::OpenFolder { path } => {
                let call = ApiCall::post("/open-folder").with_body(json!({ "path": path }));
                self.fetch_status(kind, &template, call).await?;
                Ok(Reply::FolderOpened)
            }
            Operation::SelectFolder => {
                let payload: SelectFolderPayload =
                    self.fetch_json(kind, &template, ApiCall::post("/select-folder")).await?;
                Ok(Reply::FolderSelected(payload.selected_path()))
            }
            Operation::CreateFolder { path } => {
                let call = ApiCall::post("/create-folder").with_body(json!({ "path": path }));
                self.fetch_status(kind, &template, call).await?;
                Ok(Reply::FolderCreated { path: path.clone() })
            }
            Operation::CreateFile { path } => {
                let call = ApiCall::post("/create-file").with_body(json!({ "path": path }));
                self.fetch_status(kind, &template, call).await?;
                Ok(Reply::FileCreated { path: path.clone() })
            }
            Operation::RecentFiles { limit } => {
                let call = ApiCall::get("/recent-files").with_query("limit", limit);
                let payload: RecentFilesPayload = self.fetch_json(kind, &template, call).await?;
                Ok(Reply::RecentFiles(payload.files.into_iter().map(Into::into).collect()))
            }
            Operation::IngestedFiles => {
                let payload: IngestedFilesPayload =
                    self.fetch_json(kind, &template, ApiCall::get("/ingested-files")).await?;
                Ok(Reply::IngestedFiles(payload.files.into_iter().map(Into::into).collect()))
            }
            Operation::DeleteFile { path } => {
                let call = ApiCall::post("/delete-file").with_body(json!({ "path": path }));
                self.fetch_status(kind, &template, call).await?;
                Ok(Reply::FileDeleted { path: path.clone() })
            }
            Operation::Reset => {
                self.fetch_status(kind, &template, ApiCall::post("/reset")).await?;
                Ok(Reply::Reset)
            }
        }
    }

    pub async fn list_directory(&self, path: &str) -> Result<DirectoryListing, RequestError> {
        let kind = OperationKind::ListDirectory;
        let template = failure_template(kind);
        let call = ApiCall::post("/list-directory").with_body(json!({ "path": path }));
        let payload: ListDirectoryPayload = self.fetch_json(kind, template, call).await?;
        Ok(payload.into())
    }

    async fn fetch_status(
        &self,
        op: OperationKind,
        template: &str,
        call: ApiCall,
    ) -> Result<RawResponse, RequestError> {
        debug!(op = %op, path = call.path, "backend request");
        let response = self
            .transport
            .send(call)
            .await
            .map_err(|message| RequestError::Transport { op, message })?;

        if !response.is_success() {
            return Err(RequestError::Rejected {
                op,
                template: template.to_owned(),
                status: response.status,
            });
        }
        Ok(response)
    }

    async fn fetch_json<P: DeserializeOwned>(
        &self,
        op: OperationKind,
        template: &str,
        call: ApiCall,
    ) -> Result<P, RequestError> {
        let response = self.fetch_status(op, template, call).await?;
        serde_json::from_str(&response.body).map_err(|err| RequestError::Malformed {
            op,
            template: template.to_owned(),
            detail: err.to_string(),
        })
    }
}
