// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::turn::{Turn, TurnDraft};

/// Append-only, ordered conversation history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationLog {
    turns: Vec<Turn>,
    rev: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut log = Self::new();
        log.append(TurnDraft::agent(greeting));
        log
    }

    pub fn append(&mut self, draft: TurnDraft) -> &Turn {
        self.turns.push(Turn::from_draft(draft));
        self.rev = self.rev.wrapping_add(1);
        &self.turns[self.turns.len() - 1]
    }

    pub fn extend(&mut self, drafts: impl IntoIterator<Item = TurnDraft>) {
        for draft in drafts {
            self.append(draft);
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Bumped on every append; views poll it to decide whether to redraw.
    pub fn rev(&self) -> u64 {
        self.rev
    }
}

#[cfg(test)]
mod tests {
    use super::ConversationLog;
    use crate::model::{Author, TurnDraft};

    #[test]
    fn append_preserves_order_and_bumps_rev() {
        let mut log = ConversationLog::new();
        assert!(log.is_empty());

        log.append(TurnDraft::user("first"));
        log.append(TurnDraft::agent("second"));

        let bodies = log.turns().iter().map(|turn| turn.body()).collect::<Vec<_>>();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(log.last().map(|turn| turn.author()), Some(Author::Agent));
        assert_eq!(log.rev(), 2);
    }

    #[test]
    fn greeting_seeds_a_single_agent_turn() {
        let log = ConversationLog::with_greeting("hello");
        assert_eq!(log.len(), 1);
        assert_eq!(log.turns()[0].author(), Author::Agent);
    }
}
