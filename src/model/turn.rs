// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Author {
    User,
    Agent,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Agent => f.write_str("agent"),
        }
    }
}

/// How a turn body must be projected onto a rendering surface.
///
/// `Markup` bodies carry already-escaped text inside a `<pre>` wrapper; anything else is plain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFormat {
    #[default]
    Plain,
    Markup,
}

/// A source snippet returned alongside an agent answer or a search result.
#[derive(Debug, Clone, PartialEq)]
pub struct Citation {
    pub path: String,
    pub snippet: String,
    pub score: f64,
    pub mtime: f64,
}

impl Citation {
    /// Last `/`-separated segment of the cited path.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// One immutable exchange unit of the conversation.
///
/// Turns are only produced by [`super::ConversationLog::append`].
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    author: Author,
    body: String,
    format: BodyFormat,
    citations: Vec<Citation>,
}

impl Turn {
    pub(super) fn from_draft(draft: TurnDraft) -> Self {
        Self {
            author: draft.author,
            body: draft.body,
            format: draft.format,
            citations: draft.citations,
        }
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn format(&self) -> BodyFormat {
        self.format
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }
}

/// The content of a turn that has not been appended yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnDraft {
    pub author: Author,
    pub body: String,
    pub format: BodyFormat,
    pub citations: Vec<Citation>,
}

impl TurnDraft {
    pub fn user(body: impl Into<String>) -> Self {
        Self::plain(Author::User, body)
    }

    pub fn agent(body: impl Into<String>) -> Self {
        Self::plain(Author::Agent, body)
    }

    pub fn markup(author: Author, body: impl Into<String>) -> Self {
        Self { author, body: body.into(), format: BodyFormat::Markup, citations: Vec::new() }
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    fn plain(author: Author, body: impl Into<String>) -> Self {
        Self { author, body: body.into(), format: BodyFormat::Plain, citations: Vec::new() }
    }
}
