use crate::message::{Message, Role};

/// Append-only record of the messages exchanged with the assistant.
///
/// [`Conversation`] retains the full history in insertion order while
/// exposing a sliding window via [`tail`](Conversation::tail).
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    history: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with an assistant greeting already in place.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut c = Self::new();
        c.push_assistant(greeting);
        c
    }

    /// Append a user message and return a copy of it.
    pub fn push_user(&mut self, content: impl Into<String>) -> Message {
        self.push(Message::new(Role::User, content))
    }

    /// Append an assistant message and return a copy of it.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> Message {
        self.push(Message::new(Role::Assistant, content))
    }

    fn push(&mut self, message: Message) -> Message {
        self.history.push(message.clone());
        message
    }

    /// Return the most recent `n` messages.
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Full conversation history.
    pub fn full(&self) -> &[Message] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
