//! In-memory tool providers for testing
//!
//! Deterministic, scriptable providers with failure injection and
//! open-session accounting, so connect/close behaviour can be checked
//! without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::types::{ProviderConfig, ToolDescriptor};
use super::error::{McpError, McpResult};
use super::provider::{ContentBlock, ProviderConnector, ToolOutput, ToolProvider};

/// How a mock tool answers a call
#[derive(Debug, Clone)]
pub enum MockToolBehavior {
    /// Return a single text block
    Text(String),
    /// Return a result flagged `is_error` by the provider
    ProviderError(String),
    /// Fail the request at the transport level
    Fail(String),
    /// Return a single non-text block
    NonText,
    /// Return no content at all
    Empty,
}

/// A call received by a mock server
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub tool: String,
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Default)]
struct MockServerState {
    open: AtomicUsize,
    opened_total: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Scripted tool provider
///
/// Clones share their counters and call log, so a test can keep a clone
/// after handing one to a `MockConnector`.
#[derive(Debug, Clone)]
pub struct MockToolServer {
    name: String,
    tools: Vec<(ToolDescriptor, MockToolBehavior)>,
    fail_connect: bool,
    fail_discovery: bool,
    fail_close: bool,
    state: Arc<MockServerState>,
}

impl MockToolServer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
            fail_connect: false,
            fail_discovery: false,
            fail_close: false,
            state: Arc::new(MockServerState::default()),
        }
    }

    /// Add a tool with explicit behavior
    pub fn with_tool(mut self, descriptor: ToolDescriptor, behavior: MockToolBehavior) -> Self {
        self.tools.push((descriptor, behavior));
        self
    }

    /// Add a tool that answers with fixed text
    pub fn with_text_tool(self, name: &str, text: impl Into<String>) -> Self {
        let description = format!("{} (served by {})", name, self.name);
        self.with_tool(
            ToolDescriptor::new(name, description),
            MockToolBehavior::Text(text.into()),
        )
    }

    /// Refuse connections (transport or handshake failure)
    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Accept connections but fail `tools/list`
    pub fn failing_discovery(mut self) -> Self {
        self.fail_discovery = true;
        self
    }

    /// Report an error when a session is closed
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sessions currently open against this server
    pub fn open_sessions(&self) -> usize {
        self.state.open.load(Ordering::SeqCst)
    }

    /// Sessions ever opened against this server
    pub fn opened_total(&self) -> usize {
        self.state.opened_total.load(Ordering::SeqCst)
    }

    /// Calls received so far, in arrival order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().len()
    }
}

/// Session handle returned by `MockConnector`
struct MockToolProvider {
    server: MockToolServer,
    closed: AtomicBool,
}

#[async_trait]
impl ToolProvider for MockToolProvider {
    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        if self.server.fail_discovery {
            return Err(McpError::Protocol(format!(
                "mock server '{}' rejected tools/list",
                self.server.name
            )));
        }
        Ok(self.server.tools.iter().map(|(d, _)| d.clone()).collect())
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<ToolOutput> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(McpError::Protocol("transport closed".to_string()));
        }

        self.server.state.calls.lock().push(RecordedCall {
            tool: name.to_string(),
            arguments,
        });

        let behavior = self
            .server
            .tools
            .iter()
            .find(|(d, _)| d.name == name)
            .map(|(_, b)| b.clone())
            .ok_or_else(|| McpError::ToolCallFailed(format!("no tool named '{}'", name)))?;

        match behavior {
            MockToolBehavior::Text(text) => Ok(ToolOutput::text(text)),
            MockToolBehavior::ProviderError(text) => Ok(ToolOutput::error(text)),
            MockToolBehavior::Fail(reason) => Err(McpError::ToolCallFailed(reason)),
            MockToolBehavior::NonText => Ok(ToolOutput {
                content: vec![ContentBlock::NonText],
                is_error: false,
            }),
            MockToolBehavior::Empty => Ok(ToolOutput::default()),
        }
    }

    async fn close(&self) -> McpResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.server.state.open.fetch_sub(1, Ordering::SeqCst);
        if self.server.fail_close {
            return Err(McpError::Protocol(format!(
                "mock server '{}' failed to close cleanly",
                self.server.name
            )));
        }
        Ok(())
    }
}

/// Connector resolving provider names to mock servers
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    servers: HashMap<String, MockToolServer>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(mut self, server: MockToolServer) -> Self {
        self.servers.insert(server.name.clone(), server);
        self
    }
}

#[async_trait]
impl ProviderConnector for MockConnector {
    async fn connect(&self, config: &ProviderConfig) -> McpResult<Box<dyn ToolProvider>> {
        let server = self
            .servers
            .get(&config.name)
            .ok_or_else(|| McpError::connection_failed(&config.name, "connection refused"))?;

        if server.fail_connect {
            return Err(McpError::connection_failed(&config.name, "handshake rejected"));
        }

        server.state.open.fetch_add(1, Ordering::SeqCst);
        server.state.opened_total.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MockToolProvider {
            server: server.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_session_accounting() {
        let server = MockToolServer::new("pdb").with_text_tool("get_structure", "ok");
        let connector = MockConnector::new().with_server(server.clone());

        let provider = connector
            .connect(&ProviderConfig::new("pdb", "localhost", 1))
            .await
            .unwrap();
        assert_eq!(server.open_sessions(), 1);

        let output = provider.call_tool("get_structure", Map::new()).await.unwrap();
        assert_eq!(output.first_text(), Some("ok"));
        assert_eq!(server.call_count(), 1);

        provider.close().await.unwrap();
        provider.close().await.unwrap();
        assert_eq!(server.open_sessions(), 0);
        assert_eq!(server.opened_total(), 1);
    }

    #[tokio::test]
    async fn test_unknown_server_refuses() {
        let connector = MockConnector::new();
        let result = connector
            .connect(&ProviderConfig::new("nowhere", "localhost", 1))
            .await;
        assert!(matches!(result, Err(McpError::ConnectionFailed { .. })));
    }
}
