//! Conversation transcript: message model and append-only log

pub mod format;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Greeting shown before the first turn, spoken by the assistant.
pub const GREETING: &str =
    "Hello! I'm a dental assistant AI. What seems to be the problem today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
    Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only conversation log
///
/// Messages are never edited or removed; display order is append order.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a transcript seeded with the assistant greeting
    pub fn with_greeting() -> Self {
        let transcript = Self::new();
        transcript.push(Message::new(Sender::Assistant, GREETING));
        transcript
    }

    pub fn push(&self, message: Message) {
        self.messages.write().push(message);
    }

    /// Append a new message built from sender and text
    pub fn append(&self, sender: Sender, text: impl Into<String>) {
        self.push(Message::new(sender, text));
    }

    pub fn get_all(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    pub fn last(&self) -> Option<Message> {
        self.messages.read().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_order_preserved() {
        let transcript = Transcript::new();
        transcript.append(Sender::User, "first");
        transcript.append(Sender::Assistant, "second");
        transcript.append(Sender::Summary, "third");

        let all = transcript.get_all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].text, "first");
        assert_eq!(all[1].sender, Sender::Assistant);
        assert_eq!(all[2].sender, Sender::Summary);
    }

    #[test]
    fn test_greeting_seeded() {
        let transcript = Transcript::with_greeting();
        assert_eq!(transcript.len(), 1);
        let greeting = transcript.last().unwrap();
        assert_eq!(greeting.sender, Sender::Assistant);
        assert_eq!(greeting.text, GREETING);
    }

    #[test]
    fn test_shared_clone_sees_appends() {
        let transcript = Transcript::new();
        let view = transcript.clone();
        transcript.append(Sender::User, "hello");
        assert_eq!(view.len(), 1);
    }
}
