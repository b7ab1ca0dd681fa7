//! A provider session: config, live handle and discovered tools

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Map, Value};

use crate::types::{ProviderConfig, ToolDescriptor};
use super::error::{McpError, McpResult};
use super::provider::{ToolOutput, ToolProvider};

/// One live, handshaken connection to a configured provider
///
/// Created by `SessionManager::connect`, released by `SessionManager::close`.
/// Once closed every operation fails with `McpError::SessionClosed`.
pub struct ProviderSession {
    config: ProviderConfig,
    handle: Box<dyn ToolProvider>,
    tools: Vec<ToolDescriptor>,
    closed: AtomicBool,
}

impl ProviderSession {
    /// Wrap a freshly connected handle; tools are filled in by `discover`
    pub(crate) fn new(config: ProviderConfig, handle: Box<dyn ToolProvider>) -> Self {
        Self {
            config,
            handle,
            tools: Vec::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Run tool discovery and remember the result
    pub(crate) async fn discover(&mut self) -> McpResult<&[ToolDescriptor]> {
        self.ensure_open()?;
        self.tools = self
            .handle
            .list_tools()
            .await
            .map_err(|e| McpError::discovery_failed(&self.config.name, e))?;
        Ok(&self.tools)
    }

    /// Provider name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Tools returned at discovery time, in provider order
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Execute a tool on this provider
    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<ToolOutput> {
        self.ensure_open()?;
        self.handle.call_tool(name, arguments).await
    }

    /// Close the underlying connection; later calls are no-ops
    pub(crate) async fn close(&self) -> McpResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.handle.close().await
    }

    fn ensure_open(&self) -> McpResult<()> {
        if self.is_closed() {
            Err(McpError::SessionClosed(self.config.name.clone()))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for ProviderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSession")
            .field("name", &self.config.name)
            .field("endpoint", &self.config.endpoint())
            .field("tools", &self.tools.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
