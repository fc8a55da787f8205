//! # Chat History
//!
//! Per-session, append-only message logs keyed by an opaque session id.
//!
//! ## Modules
//!
//! - [`store`] - [`HistoryStore`] trait and the [`SessionHistory`] log it hands out
//! - [`inmemory`] - [`InMemoryHistoryStore`], a volatile map of session id to history
//!
//! ## Example
//!
//! ```rust
//! use chat_history::{HistoryStore, InMemoryHistoryStore};
//! use prompt::ChatMessage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), anyhow::Error> {
//!     let store = InMemoryHistoryStore::new();
//!
//!     store.append("s1", ChatMessage::user("hello")).await?;
//!
//!     let history = store.get_or_create("s1").await?;
//!     assert_eq!(history.len().await, 1);
//!     Ok(())
//! }
//! ```

pub mod inmemory;
pub mod store;

pub use inmemory::InMemoryHistoryStore;
pub use store::{HistoryStore, SessionHistory};
