//! Model backend trait definition

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::types::{CancellationToken, ChatMessage, ToolCall, ToolDescriptor};
use super::error::BackendResult;

/// Model settings for backend requests
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Model identifier as used by the backend's API
    pub model: String,
    /// API key for authentication; falls back to the backend's env lookup
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

impl ModelConfig {
    /// Create a new model config
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            api_base: None,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API base URL
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }
}

/// Options for a chat request
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Tools the model may call
    pub tools: Option<Vec<ToolDescriptor>>,
}

impl ChatOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set tools
    pub fn with_tools(mut self, tools: Vec<ToolDescriptor>) -> Self {
        self.tools = Some(tools);
        self
    }
}

/// A complete, non-streamed model reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    /// Text content (may be empty when the model only requests tools)
    pub content: String,
    /// Tool invocations requested by the model, in order
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            tool_calls,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Text fragments of a streamed reply, in arrival order
pub type StreamResponse = Pin<Box<dyn Stream<Item = BackendResult<String>> + Send>>;

/// Language model backend
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Backend name for logs and errors (e.g. "genai", "mock")
    fn name(&self) -> &str;

    /// Run a chat request and return the complete reply
    ///
    /// Used whenever the reply must be inspected for tool calls.
    async fn chat(&self, messages: Vec<ChatMessage>, options: ChatOptions) -> BackendResult<ModelReply>;

    /// Stream a chat completion as text fragments
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        options: ChatOptions,
        cancel_token: CancellationToken,
    ) -> BackendResult<StreamResponse>;
}
