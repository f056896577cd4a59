use std::sync::Mutex;

use tracing::{debug, info};

use crate::busy::BusyFlag;
use crate::conversation::Conversation;
use crate::error::Rejection;
use crate::events::{EventBus, Feature, LabEvent};
use crate::message::{Message, Role};
use crate::responses::{GREETING, ResponseCatalog, SUGGESTED_QUESTIONS};
use crate::timer::{AnalysisTimer, CancelScope, lock};

/// Simulated chat assistant.
///
/// [`send`](ConversationEngine::send) appends the user's message at once,
/// waits the configured latency and then appends the canned reply chosen by
/// the [`ResponseCatalog`]. Only one reply can be pending at a time.
pub struct ConversationEngine {
    conversation: Mutex<Conversation>,
    catalog: ResponseCatalog,
    timer: AnalysisTimer,
    busy: BusyFlag,
    cancel: CancelScope,
    events: EventBus,
}

impl ConversationEngine {
    /// Create an engine whose history starts with the stock greeting.
    pub fn new(catalog: ResponseCatalog, timer: AnalysisTimer, events: EventBus) -> Self {
        Self {
            conversation: Mutex::new(Conversation::with_greeting(GREETING)),
            catalog,
            timer,
            busy: BusyFlag::new(),
            cancel: CancelScope::new(),
            events,
        }
    }

    /// Send `text` and wait for the assistant's reply.
    ///
    /// Blank input is ignored with [`Rejection::EmptyInput`] and a send while
    /// a reply is pending with [`Rejection::Busy`]; neither touches the
    /// history. After [`shutdown`](ConversationEngine::shutdown) nothing is
    /// appended at all: the call resolves [`Rejection::Cancelled`].
    pub async fn send(&self, text: &str) -> Result<Message, Rejection> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring empty chat message");
            return Err(Rejection::EmptyInput);
        }
        let Some(_guard) = self.busy.try_acquire() else {
            debug!("chat reply pending, ignoring message");
            return Err(Rejection::Busy);
        };
        let token = self.cancel.token();
        if token.is_cancelled() {
            debug!("chat engine shut down, ignoring message");
            return Err(Rejection::Cancelled);
        }

        let user = lock(&self.conversation).push_user(text);
        self.events.publish(LabEvent::MessageAppended(user));

        if let Err(rejection) = self.timer.schedule(&token).await {
            debug!("chat reply cancelled");
            self.events.publish(LabEvent::AnalysisCancelled(Feature::Chat));
            return Err(rejection);
        }

        let answer = self.catalog.select(text);
        let reply = lock(&self.conversation).push_assistant(answer);
        info!(message_id = %reply.id, "assistant replied");
        self.events.publish(LabEvent::MessageAppended(reply.clone()));
        Ok(reply)
    }

    /// Snapshot of the full history in insertion order.
    pub fn history(&self) -> Vec<Message> {
        lock(&self.conversation).full().to_vec()
    }

    /// Starter questions, offered only while the greeting is the sole message.
    pub fn suggestions(&self) -> Vec<&'static str> {
        if lock(&self.conversation).len() <= 1 {
            SUGGESTED_QUESTIONS.to_vec()
        } else {
            Vec::new()
        }
    }

    /// Number of assistant replies produced so far, excluding the greeting.
    pub fn replies(&self) -> usize {
        lock(&self.conversation)
            .full()
            .iter()
            .skip(1)
            .filter(|m| m.role == Role::Assistant)
            .count()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Tear down: any pending reply is dropped and later sends are cancelled.
    pub fn shutdown(&self) {
        self.cancel.close();
    }
}
