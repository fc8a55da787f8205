//! # In-Memory History Store
//!
//! 内存会话历史：按 session id 保存消息，进程退出即丢失。
//!
//! Volatile implementation of [`HistoryStore`]: a map of session id to [`SessionHistory`].
//!
//! **Limitations**:
//! - Data is lost on restart
//! - No eviction or size bound
//!
//! ## Thread Safety
//!
//! The map is held in `Arc<RwLock<>>`, so clones share the same sessions and concurrent
//! access to different sessions is safe.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use prompt::ChatMessage;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::store::{HistoryStore, SessionHistory};

/// In-memory history store. Each instance owns an independent set of sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    sessions: Arc<RwLock<HashMap<String, Arc<SessionHistory>>>>,
}

impl InMemoryHistoryStore {
    /// Creates a new store with no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no session has been registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Registered session ids, sorted.
    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn lookup(&self, session_id: &str) -> Option<Arc<SessionHistory>> {
        self.sessions.read().await.get(session_id).cloned()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn get_or_create(&self, session_id: &str) -> Result<Arc<SessionHistory>, anyhow::Error> {
        if let Some(history) = self.lookup(session_id).await {
            return Ok(history);
        }

        let mut sessions = self.sessions.write().await;
        // Another task may have registered the id between the read and write locks.
        let history = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                info!(session_id = %session_id, "Creating session history");
                Arc::new(SessionHistory::new(session_id))
            })
            .clone();
        Ok(history)
    }

    async fn append_all(
        &self,
        session_id: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<(), anyhow::Error> {
        let count = messages.len();
        let history = self.get_or_create(session_id).await?;
        history.extend(messages).await;
        let total = history.len().await;
        debug!(
            session_id = %session_id,
            appended = count,
            total = total,
            "Appended messages to session history"
        );
        Ok(())
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, anyhow::Error> {
        match self.lookup(session_id).await {
            Some(history) => Ok(history.messages().await),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = InMemoryHistoryStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_messages_for_unknown_id_does_not_register() {
        let store = InMemoryHistoryStore::new();
        let msgs = store.messages("ghost").await.unwrap();
        assert!(msgs.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_sessions() {
        let store = InMemoryHistoryStore::new();
        let other = store.clone();
        store.append("s1", ChatMessage::user("hi")).await.unwrap();
        assert_eq!(other.messages("s1").await.unwrap().len(), 1);
        assert_eq!(other.session_ids().await, vec!["s1".to_string()]);
    }
}
