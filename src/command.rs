// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Free-text input classification.
//!
//! Slash commands are matched case-sensitively at the start of the line. Anything that is not a
//! recognised command, including unknown slash commands, is sent to the backend as chat.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Chat(String),
    Search(String),
    Ingest(Vec<String>),
    Preview(String),
    Stats,
}

const SEARCH_PREFIX: &str = "/search ";
const INGEST_PREFIX: &str = "/ingest ";
const PREVIEW_PREFIX: &str = "/preview ";
const STATS_COMMAND: &str = "/stats";

pub fn classify(text: &str) -> Intent {
    if text == STATS_COMMAND {
        return Intent::Stats;
    }
    if let Some(rest) = text.strip_prefix(SEARCH_PREFIX) {
        return Intent::Search(rest.trim().to_owned());
    }
    if let Some(rest) = text.strip_prefix(INGEST_PREFIX) {
        return Intent::Ingest(vec![rest.trim().to_owned()]);
    }
    if let Some(rest) = text.strip_prefix(PREVIEW_PREFIX) {
        return Intent::Preview(rest.trim().to_owned());
    }
    Intent::Chat(text.to_owned())
}

#[cfg(test)]
mod tests {
    use super::{classify, Intent};
    use rstest::rstest;

    #[rstest]
    #[case("/search  foo ", Intent::Search("foo".to_owned()))]
    #[case("/search report q3", Intent::Search("report q3".to_owned()))]
    #[case("/ingest ./docs ", Intent::Ingest(vec!["./docs".to_owned()]))]
    #[case("/preview  notes/a.md", Intent::Preview("notes/a.md".to_owned()))]
    #[case("/stats", Intent::Stats)]
    fn recognises_commands(#[case] input: &str, #[case] expected: Intent) {
        assert_eq!(classify(input), expected);
    }

    #[rstest]
    #[case("/unknown x")]
    #[case("/stats now")]
    #[case("/Search foo")]
    #[case("/search")]
    #[case(" /stats")]
    #[case("what changed in the roadmap?")]
    fn everything_else_is_chat_with_the_original_text(#[case] input: &str) {
        assert_eq!(classify(input), Intent::Chat(input.to_owned()));
    }

    #[test]
    fn prefix_with_only_whitespace_yields_empty_argument() {
        assert_eq!(classify("/search    "), Intent::Search(String::new()));
    }
}
