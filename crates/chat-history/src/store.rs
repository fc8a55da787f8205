//! # History Storage
//!
//! This module defines the interface for per-session message history.
//!
//! The `HistoryStore` trait is implemented by storage backends; [`SessionHistory`] is the
//! ordered log for one session. Logs only grow: there is no removal or rewrite API.

use std::sync::Arc;

use async_trait::async_trait;
use prompt::ChatMessage;
use tokio::sync::RwLock;

/// Ordered, append-only message log for a single session.
#[derive(Debug)]
pub struct SessionHistory {
    session_id: String,
    messages: RwLock<Vec<ChatMessage>>,
}

impl SessionHistory {
    /// Creates an empty log for `session_id`.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: RwLock::new(Vec::new()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Snapshot of all messages in insertion order.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Most recently appended message, if any.
    pub async fn last(&self) -> Option<ChatMessage> {
        self.messages.read().await.last().cloned()
    }

    /// Adds `message` to the end of the log.
    pub async fn push(&self, message: ChatMessage) {
        self.messages.write().await.push(message);
    }

    /// Adds `messages` to the end of the log, in order, under one lock.
    pub async fn extend(&self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.messages.write().await.extend(messages);
    }
}

/// Trait for resolving and growing session histories.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Returns the history for `session_id`, registering an empty one if the id is new.
    /// Repeated calls with the same id return the same `Arc`.
    async fn get_or_create(&self, session_id: &str) -> Result<Arc<SessionHistory>, anyhow::Error>;

    /// Appends one message to the session, creating the session if needed.
    async fn append(&self, session_id: &str, message: ChatMessage) -> Result<(), anyhow::Error> {
        self.append_all(session_id, vec![message]).await
    }

    /// Appends messages to the session in the given order, creating the session if needed.
    async fn append_all(
        &self,
        session_id: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<(), anyhow::Error>;

    /// Snapshot of the session's messages; empty for an unknown id (which is not registered).
    async fn messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, anyhow::Error>;
}
