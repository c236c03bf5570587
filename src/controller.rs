//! Chat controller
//!
//! Connects the [`SessionStore`] to a [`Generator`]. A submitted prompt is
//! appended to the current session before the request goes out, and the
//! outcome of the request always comes back as a bot message: the generated
//! content on success, or an error notice on any failure.

use crate::client::Generator;
use crate::error::Result;
use crate::session::{Feedback, Message, SessionStore};

/// Format the bot message shown when generation fails
pub fn error_reply(error: &anyhow::Error) -> String {
    format!("❌ **Error:** {}. Please try again.", error)
}

/// Drives one chat: prompts in, bot replies out
pub struct ChatController {
    store: SessionStore,
    generator: Box<dyn Generator>,
}

impl ChatController {
    pub fn new(store: SessionStore, generator: Box<dyn Generator>) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    /// Send a prompt and append the reply
    ///
    /// Blank prompts are ignored and return `Ok(None)`. Otherwise the user
    /// message is appended, the generator is called, and the bot reply (or
    /// error notice) is appended and returned. The session is saved after
    /// the exchange.
    ///
    /// # Errors
    ///
    /// Only storage failures are returned; generation failures become the
    /// returned bot message.
    pub async fn submit(&mut self, prompt: &str) -> Result<Option<Message>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(None);
        }

        self.store.push_message(Message::user(prompt));
        self.complete().await.map(Some)
    }

    /// Ask for a new reply to the current session as it stands
    ///
    /// Does nothing when the session has no messages.
    pub async fn regenerate(&mut self) -> Result<Option<Message>> {
        if self.store.current().is_empty() {
            return Ok(None);
        }
        self.complete().await.map(Some)
    }

    /// Tag the most recent bot message
    ///
    /// Returns `false` when the current session has no bot message yet.
    pub fn rate_last_reply(&mut self, feedback: Feedback) -> Result<bool> {
        let Some(id) = self.store.current().last_bot_message().map(|m| m.id.clone()) else {
            return Ok(false);
        };
        self.store.set_feedback(&id, Some(feedback))
    }

    async fn complete(&mut self) -> Result<Message> {
        let reply = match self.generator.generate(self.store.current()).await {
            Ok(content) => Message::bot(content),
            Err(e) => {
                tracing::warn!("Generation failed: {}", e);
                Message::bot(error_reply(&e))
            }
        };

        self.store.push_message(reply.clone());
        self.store.upsert_current()?;
        Ok(reply)
    }
}
