//! Conversation pipeline: resolves a session's history, renders the prompt template around it,
//! asks the chat-completion collaborator for the next reply and records the round.

use std::sync::Arc;

use chat_history::HistoryStore;
use llm_client::LlmClient;
use prompt::{ChatMessage, MessageRole, PromptTemplate, TemplateParams};
use tracing::{debug, info, instrument};

use crate::error::{PipelineError, Result};

/// One call into the pipeline.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub session_id: String,
    pub new_messages: Vec<ChatMessage>,
    pub template_parameters: TemplateParams,
}

impl InvocationRequest {
    pub fn new(
        session_id: impl Into<String>,
        new_messages: Vec<ChatMessage>,
        template_parameters: TemplateParams,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            new_messages,
            template_parameters,
        }
    }
}

/// Prompt template + chat-completion collaborator + history store, bound together.
///
/// The store is owned by the caller and shared through `Arc`; every pipeline built on the
/// same store sees the same sessions.
#[derive(Clone)]
pub struct ConversationPipeline {
    template: PromptTemplate,
    input_messages_key: String,
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn HistoryStore>,
}

impl ConversationPipeline {
    /// Binds the parts together. `input_messages_key` names where callers' messages go and
    /// must equal the template's history slot.
    pub fn new(
        template: PromptTemplate,
        input_messages_key: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn HistoryStore>,
    ) -> Result<Self> {
        let input_messages_key = input_messages_key.into();
        if template.history_slot() != input_messages_key {
            return Err(PipelineError::SlotMismatch {
                slot: template.history_slot().to_string(),
                input_key: input_messages_key,
            });
        }
        Ok(Self {
            template,
            input_messages_key,
            llm,
            store,
        })
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn input_messages_key(&self) -> &str {
        &self.input_messages_key
    }

    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    /// Builds the message sequence that `invoke` would send, without calling the model or
    /// touching the history.
    pub async fn render(
        &self,
        session_id: &str,
        new_messages: &[ChatMessage],
        template_parameters: &TemplateParams,
    ) -> Result<Vec<ChatMessage>> {
        let history = self
            .store
            .get_or_create(session_id)
            .await
            .map_err(PipelineError::History)?;
        let prior = history.messages().await;
        let rendered = self
            .template
            .format_messages(template_parameters, &prior, new_messages)?;
        Ok(rendered)
    }

    /// Runs one round: render, call the model, then append `new_messages` and the reply.
    ///
    /// History is only written after a successful reply, so a failed call leaves the
    /// session exactly as it was.
    #[instrument(skip(self, new_messages, template_parameters), fields(new_count = new_messages.len()))]
    pub async fn invoke(
        &self,
        session_id: &str,
        new_messages: Vec<ChatMessage>,
        template_parameters: &TemplateParams,
    ) -> Result<ChatMessage> {
        let rendered = self
            .render(session_id, &new_messages, template_parameters)
            .await?;
        debug!(
            session_id = %session_id,
            prompt_messages = rendered.len(),
            "Rendered prompt"
        );

        let reply = self
            .llm
            .chat_completion(&rendered)
            .await
            .map_err(PipelineError::Completion)?;
        match reply.role() {
            MessageRole::Assistant => {}
            other @ (MessageRole::System | MessageRole::User) => {
                return Err(PipelineError::UnexpectedRole(other));
            }
        }

        let mut round = new_messages;
        round.push(reply.clone());
        self.store
            .append_all(session_id, round)
            .await
            .map_err(PipelineError::History)?;

        info!(
            session_id = %session_id,
            reply_len = reply.content().len(),
            "Conversation round completed"
        );
        Ok(reply)
    }

    /// Same as [`invoke`](Self::invoke), taking the arguments as one request value.
    pub async fn invoke_request(&self, request: InvocationRequest) -> Result<ChatMessage> {
        self.invoke(
            &request.session_id,
            request.new_messages,
            &request.template_parameters,
        )
        .await
    }
}
