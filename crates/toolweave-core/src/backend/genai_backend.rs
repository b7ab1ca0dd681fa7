//! GenaiBackend - model backend using the genai crate
//!
//! Handles every genai-supported service (OpenAI, Anthropic, Gemini, Ollama,
//! Groq, ...). The adapter is picked by genai from the model name.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

use genai::chat::ChatRequest;

use crate::logging::Logger;
use crate::types::{CancellationToken, ChatMessage};

use super::error::{BackendError, BackendResult};
use super::genai_adapter::{
    create_client, from_genai_event, from_genai_tool_call, to_genai_messages, to_genai_options,
    to_genai_tools,
};
use super::traits::{ChatOptions, ModelBackend, ModelConfig, ModelReply, StreamResponse};

const BACKEND_NAME: &str = "genai";

/// Model backend using genai for all supported LLM APIs
pub struct GenaiBackend {
    model: ModelConfig,
    client: genai::Client,
    logger: Arc<dyn Logger>,
}

impl GenaiBackend {
    /// Create a backend for the given model settings
    pub fn new(model: ModelConfig, logger: Arc<dyn Logger>) -> Self {
        let client = create_client(&model);
        Self { model, client, logger }
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    fn build_request(&self, messages: Vec<ChatMessage>, options: &ChatOptions) -> ChatRequest {
        let mut chat_req = ChatRequest::new(to_genai_messages(messages));
        if let Some(tools) = &options.tools {
            if !tools.is_empty() {
                chat_req = chat_req.with_tools(to_genai_tools(tools.clone()));
            }
        }
        chat_req
    }
}

#[async_trait]
impl ModelBackend for GenaiBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    async fn chat(&self, messages: Vec<ChatMessage>, options: ChatOptions) -> BackendResult<ModelReply> {
        self.logger.info(&format!(
            "[GenaiBackend] chat: model={}, messages={}, tools={}",
            self.model.model,
            messages.len(),
            options.tools.as_ref().map_or(0, Vec::len)
        ));

        let chat_req = self.build_request(messages, &options);
        let genai_options = to_genai_options(&options);

        let response = self
            .client
            .exec_chat(&self.model.model, chat_req, Some(&genai_options))
            .await
            .map_err(|e| BackendError::api_error(BACKEND_NAME, e.to_string()))?;

        let reply = ModelReply {
            content: response.first_text().unwrap_or_default().to_string(),
            tool_calls: response
                .tool_calls()
                .into_iter()
                .map(from_genai_tool_call)
                .collect(),
        };

        self.logger.debug(&format!(
            "[GenaiBackend] reply: {} chars, {} tool call(s)",
            reply.content.len(),
            reply.tool_calls.len()
        ));

        Ok(reply)
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        options: ChatOptions,
        cancel_token: CancellationToken,
    ) -> BackendResult<StreamResponse> {
        self.logger.info(&format!(
            "[GenaiBackend] stream_chat: model={}, messages={}",
            self.model.model,
            messages.len()
        ));

        let chat_req = self.build_request(messages, &options);
        let genai_options = to_genai_options(&options);

        let chat_stream = self
            .client
            .exec_chat_stream(&self.model.model, chat_req, Some(&genai_options))
            .await
            .map_err(|e| BackendError::api_error(BACKEND_NAME, e.to_string()))?;

        let logger = Arc::clone(&self.logger);

        // Cancellation only stops local consumption; the request may still
        // complete on the server.
        let stream = chat_stream
            .stream
            .take_until(cancel_token.cancelled_owned())
            .filter_map(move |result| {
                let item = match result {
                    Ok(event) => from_genai_event(event).map(Ok),
                    Err(e) => {
                        logger.error(&format!("[GenaiBackend] Stream error: {}", e));
                        Some(Err(BackendError::api_error(BACKEND_NAME, e.to_string())))
                    }
                };
                futures::future::ready(item)
            });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_backend_keeps_model_settings() {
        let model = ModelConfig::new("llama3.1").with_api_base("http://gpu-box:11434/");
        let backend = GenaiBackend::new(model.clone(), Arc::new(NoOpLogger));
        assert_eq!(backend.name(), "genai");
        assert_eq!(backend.model(), &model);
    }
}
