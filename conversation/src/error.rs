use prompt::{MessageRole, TemplateError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("History slot '{slot}' does not match input messages key '{input_key}'")]
    SlotMismatch { slot: String, input_key: String },

    #[error("History store error: {0}")]
    History(anyhow::Error),

    /// Failure reported by the chat-completion collaborator, passed through untouched.
    #[error(transparent)]
    Completion(anyhow::Error),

    #[error("Expected an assistant reply, got role {0}")]
    UnexpectedRole(MessageRole),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
