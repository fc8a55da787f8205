//! # conversation
//!
//! Session-scoped conversation pipeline: a [`PromptTemplate`](prompt::PromptTemplate) whose
//! history slot is filled from a [`HistoryStore`](chat_history::HistoryStore), sent to an
//! [`LlmClient`](llm_client::LlmClient), with each round recorded back into the session.
//! Also hosts the error type and tracing initialization shared by binaries.

pub mod error;
pub mod logger;
pub mod pipeline;

pub use error::{PipelineError, Result};
pub use logger::init_tracing;
pub use pipeline::{ConversationPipeline, InvocationRequest};
