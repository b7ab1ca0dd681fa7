//! The tool provider boundary
//!
//! `ProviderConnector` opens a transport and completes the MCP handshake;
//! the resulting `ToolProvider` lists and executes tools until it is closed.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::types::{ProviderConfig, ToolDescriptor};
use super::error::McpResult;

/// One block of a tool call result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text(String),
    /// Image, audio, resource or any other block without plain text
    NonText,
}

/// Raw result of a `tools/call` request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Content blocks in the order the provider returned them
    pub content: Vec<ContentBlock>,
    /// Set when the provider reports the call itself failed
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output with a single text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            is_error: false,
        }
    }

    /// Provider-reported failure with a single text block
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            is_error: true,
        }
    }

    /// Text of the first content block, if that block is text
    ///
    /// Later blocks are never consumed.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentBlock::Text(text)) => Some(text),
            _ => None,
        }
    }
}

/// A live, handshaken connection to one tool provider
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Discover the provider's tools, in the provider's order
    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>>;

    /// Execute a tool by name
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<ToolOutput>;

    /// Release the connection
    ///
    /// Must tolerate a transport the provider already closed.
    async fn close(&self) -> McpResult<()>;
}

/// Opens provider connections
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    /// Open a transport to the provider and perform the initialize handshake
    async fn connect(&self, config: &ProviderConfig) -> McpResult<Box<dyn ToolProvider>>;
}
