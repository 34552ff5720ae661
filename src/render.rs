// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fixed text templates that turn backend replies into conversation turns.

use std::fmt::Write as _;

use crate::api::{Reply, RequestError};
use crate::model::{Author, BodyFormat, Citation, Turn, TurnDraft};

pub const GREETING: &str =
    "Hello! I'm K-9. I can search, preview and organise your files. How can I help?";

pub const STOPPED: &str = "generation stopped.";

pub const HELP_TEXT: &str = "\
**K-9 help**

The following features are available:

1. **Open folder**:
   Opens the OS file explorer on the backend's working directory.

2. **Create folder / Create file**:
   Pick a location in the directory browser, then enter a name.

3. **Recent files**:
   Lists the most recently modified files.

4. **Ingest**:
   Pick a folder in the directory browser to add its documents to memory.

5. **Chat / Search**:
   Ask questions or search files from the input line below.
   - `/search <keywords>`: semantic search.
   - `/preview <path>`: preview the contents of a file.
   - `/ingest <path>`: ingest a file or folder.
   - `/stats`: show index statistics.";

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Markup preview body. Both the backend-reported path and the file text are escaped.
pub fn preview_body(path: &str, text: &str) -> String {
    format!("📄 **{}** preview:\n\n<pre>{}</pre>", escape_html(path), escape_html(text))
}

/// Plain-text projection of a turn body for surfaces that do not interpret markup.
pub fn display_text(turn: &Turn) -> String {
    match turn.format() {
        BodyFormat::Plain => turn.body().to_owned(),
        BodyFormat::Markup => markup_to_plain(turn.body()),
    }
}

pub fn markup_to_plain(body: &str) -> String {
    let stripped = body.replace("<pre>", "").replace("</pre>", "");
    unescape_html(&stripped)
        .chars()
        .filter(|ch| *ch == '\n' || *ch == '\t' || !ch.is_control())
        .collect()
}

pub fn citation_label(citation: &Citation) -> String {
    format!("・{}: \"{}...\"", citation.file_name(), citation.snippet.trim())
}

pub fn error_turn(error: &RequestError) -> TurnDraft {
    TurnDraft::agent(format!("error occurred: {}", error.user_message()))
}

pub fn stopped_turn() -> TurnDraft {
    TurnDraft::agent(STOPPED)
}

pub fn reply_turns(reply: &Reply) -> Vec<TurnDraft> {
    let draft = match reply {
        Reply::Chat { answer, citations } => {
            TurnDraft::agent(answer.clone()).with_citations(citations.clone())
        }
        Reply::Search { query, results } => TurnDraft::agent(format!(
            "search results for \"{query}\": {} hits:",
            results.len()
        ))
        .with_citations(results.clone()),
        Reply::Ingest(summary) => TurnDraft::agent(format!(
            "ingest complete.\n・processed files: {}\n・processed chunks: {}\n・skipped files: {}",
            summary.processed_files, summary.processed_chunks, summary.skipped_files
        )),
        Reply::Stats(stats) => TurnDraft::agent(format!(
            "current statistics:\n・collection: {}\n・embeddings: {}\n・embedding model: {}\n・LLM model: {}",
            stats.collection, stats.num_embeddings, stats.embed_model, stats.llm_model
        )),
        Reply::Preview { path, text } => TurnDraft::markup(Author::Agent, preview_body(path, text)),
        Reply::FolderOpened => TurnDraft::agent("opened the file explorer."),
        Reply::FolderSelected(Some(path)) => TurnDraft::agent(format!("selected folder: {path}")),
        Reply::FolderSelected(None) => TurnDraft::agent("folder selection cancelled."),
        Reply::FolderCreated { path } => TurnDraft::agent(format!("created folder: {path}")),
        Reply::FileCreated { path } => TurnDraft::agent(format!("created file: {path}")),
        Reply::RecentFiles(files) if files.is_empty() => {
            TurnDraft::agent("no recently modified files.")
        }
        Reply::RecentFiles(files) => {
            let mut body = String::from("recently modified files:");
            for file in files {
                let _ = write!(body, "\n・{}\n   {}\n   ({})", file.name, file.path, file.mtime_str);
            }
            TurnDraft::agent(body)
        }
        Reply::IngestedFiles(files) => {
            TurnDraft::agent(format!("{} ingested files.", files.len()))
        }
        Reply::FileDeleted { path } => TurnDraft::agent(format!("deleted from memory: {path}")),
        Reply::Reset => TurnDraft::agent("memory reset. all ingested documents were removed."),
    };
    vec![draft]
}

#[cfg(test)]
mod tests {
    use super::{escape_html, markup_to_plain, preview_body, reply_turns};
    use crate::api::{IndexStats, IngestSummary, Reply};
    use crate::model::{BodyFormat, RecentFile};

    #[test]
    fn escape_covers_all_markup_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn preview_wraps_escaped_text_in_pre() {
        let body = preview_body("a.html", "<b>bold</b>");
        assert!(body.ends_with("<pre>&lt;b&gt;bold&lt;/b&gt;</pre>"));
        assert!(!body.contains("<b>"));
    }

    #[test]
    fn markup_projection_round_trips_file_text() {
        let body = preview_body("a.txt", "x < y && \"z\"\n\u{1b}[31mred");
        let plain = markup_to_plain(&body);
        assert!(plain.contains("x < y && \"z\"\n[31mred"));
        assert!(!plain.contains("<pre>"));
    }

    #[test]
    fn preview_escapes_markup_in_the_path() {
        let turns = reply_turns(&Reply::Preview {
            path: "<img src=x onerror=alert(1)>.md".to_owned(),
            text: "x".to_owned(),
        });
        assert!(!turns[0].body.contains("<img"));
        assert!(turns[0].body.starts_with("📄 **&lt;img src=x onerror=alert(1)&gt;.md** preview:"));
        assert_eq!(
            markup_to_plain(&turns[0].body),
            "📄 **<img src=x onerror=alert(1)>.md** preview:\n\nx"
        );
    }

    #[test]
    fn entity_like_path_is_displayed_verbatim() {
        let body = preview_body("R&amp;D.md", "x");
        assert_eq!(markup_to_plain(&body), "📄 **R&amp;D.md** preview:\n\nx");
    }

    #[test]
    fn preview_reply_is_markup() {
        let turns = reply_turns(&Reply::Preview { path: "p".to_owned(), text: "t".to_owned() });
        assert_eq!(turns[0].format, BodyFormat::Markup);
    }

    #[test]
    fn stats_fields_follow_fixed_order() {
        let turns = reply_turns(&Reply::Stats(IndexStats {
            collection: "k9_demo".to_owned(),
            num_embeddings: 42,
            embed_model: "e5-small".to_owned(),
            llm_model: "phi3:mini".to_owned(),
        }));
        assert_eq!(
            turns[0].body,
            "current statistics:\n・collection: k9_demo\n・embeddings: 42\n・embedding model: e5-small\n・LLM model: phi3:mini"
        );
    }

    #[test]
    fn ingest_reports_counts_verbatim() {
        let turns = reply_turns(&Reply::Ingest(IngestSummary {
            processed_files: 3,
            processed_chunks: 17,
            skipped_files: 1,
        }));
        assert!(turns[0].body.contains("processed files: 3"));
        assert!(turns[0].body.contains("processed chunks: 17"));
        assert!(turns[0].body.contains("skipped files: 1"));
    }

    #[test]
    fn recent_files_lists_each_entry_or_says_none() {
        let empty = reply_turns(&Reply::RecentFiles(Vec::new()));
        assert_eq!(empty[0].body, "no recently modified files.");

        let listed = reply_turns(&Reply::RecentFiles(vec![RecentFile {
            name: "a.md".to_owned(),
            path: "./docs/a.md".to_owned(),
            mtime_str: "2026-01-02 03:04:05".to_owned(),
        }]));
        assert_eq!(
            listed[0].body,
            "recently modified files:\n・a.md\n   ./docs/a.md\n   (2026-01-02 03:04:05)"
        );
    }
}
