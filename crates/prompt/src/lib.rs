//! # Prompt
//!
//! Chat messages with explicit roles and the prompt template that turns a session's
//! history plus new input into the message sequence sent to the model.
//!
//! ## Layout
//!
//! - **System**: the rendered system instruction (placeholders such as `{language}` substituted)
//! - **History slot**: prior session messages followed by the messages of the current turn
//!
//! ## Usage
//!
//! Used by the `conversation` crate when assembling a request for the chat-completion
//! collaborator, and by `chat-history` as the stored message type.
//!
//! ## External interactions
//!
//! - **AI models**: Output is sent to OpenAI-compatible chat completion APIs.

mod template;

pub use template::{
    ParamKind, ParamSpec, ParamValue, PromptTemplate, TemplateError, TemplateParams,
};

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
///
/// Fields are private: a message cannot change after it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    role: MessageRole,
    content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
