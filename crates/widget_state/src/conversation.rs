//! Conversation state
//!
//! An ordered, append-only log of chat turns. The first element is always
//! the seeded system turn and is never removed. `remove_last` exists solely
//! as the compensating action for a send that must be retried, so the log
//! only ever reflects turns that were acknowledged or are in flight.

use widget_core::{ChatRole, ChatTurn};

#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    /// Create a conversation seeded with the system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![ChatTurn::system(system_prompt)],
        }
    }

    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Remove the most recently appended turn.
    ///
    /// The seeded system turn is never removed; removing it would leave
    /// later requests without their instruction preamble.
    pub fn remove_last(&mut self) -> Option<ChatTurn> {
        if self.turns.len() > 1 {
            self.turns.pop()
        } else {
            None
        }
    }

    /// Read-only snapshot for request payloads.
    pub fn snapshot(&self) -> Vec<ChatTurn> {
        self.turns.clone()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn user_turn_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|turn| turn.role == ChatRole::User)
            .count()
    }

    pub fn last(&self) -> &ChatTurn {
        self.turns.last().expect("conversation seeded")
    }
}
