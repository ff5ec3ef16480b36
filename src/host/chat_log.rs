//! Bounded, ordered message list.

use std::collections::VecDeque;

use log::trace;

use crate::host::{ChatMessage, MessageId};

/// Ordered list of rendered messages.
///
/// Identifiers are positions since the log was created and stay valid when the
/// oldest entries are evicted: looking up an evicted identifier returns `None`.
#[derive(Debug)]
pub struct ChatLog {
    /// Retained messages, oldest first
    messages: VecDeque<ChatMessage>,
    /// Identifier of the front message
    first_id: MessageId,
    /// Maximum number of retained messages
    limit: usize,
}

impl ChatLog {
    /// Creates an empty log retaining at most `limit` messages (at least one).
    pub fn new(limit: usize) -> Self {
        ChatLog {
            messages: VecDeque::new(),
            first_id: 0,
            limit: limit.max(1),
        }
    }

    /// Appends a message and returns its identifier.
    pub fn push(&mut self, message: ChatMessage) -> MessageId {
        if self.messages.len() == self.limit {
            self.messages.pop_front();
            self.first_id += 1;
            trace!("evicted message {}", self.first_id - 1);
        }

        self.messages.push_back(message);
        self.first_id + self.messages.len() - 1
    }

    /// Returns a copy of the message at `id`.
    pub fn get(&self, id: MessageId) -> Option<ChatMessage> {
        let index = id.checked_sub(self.first_id)?;
        self.messages.get(index).cloned()
    }

    /// Number of retained messages.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_sequential_ids() {
        let mut log = ChatLog::new(10);
        assert_eq!(log.push(ChatMessage::new("a", None)), 0);
        assert_eq!(log.push(ChatMessage::new("b", None)), 1);
        assert_eq!(log.get(1).unwrap().text, "b");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_get_unknown_id() {
        let log = ChatLog::new(10);
        assert!(log.get(0).is_none());
    }

    #[test]
    fn test_eviction_keeps_ids_stable() {
        let mut log = ChatLog::new(2);
        log.push(ChatMessage::new("a", None));
        log.push(ChatMessage::new("b", None));
        let id = log.push(ChatMessage::new("c", None));

        assert_eq!(id, 2);
        assert_eq!(log.len(), 2);
        assert!(log.get(0).is_none());
        assert_eq!(log.get(1).unwrap().text, "b");
        assert_eq!(log.get(2).unwrap().text, "c");
    }

    #[test]
    fn test_zero_limit_keeps_last_message() {
        let mut log = ChatLog::new(0);
        log.push(ChatMessage::new("a", None));
        let id = log.push(ChatMessage::new("b", None));
        assert_eq!(log.get(id).unwrap().text, "b");
        assert_eq!(log.len(), 1);
    }
}
