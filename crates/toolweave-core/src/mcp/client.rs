//! MCP client using the official rmcp SDK
//!
//! Connects to tool providers over the Streamable HTTP transport.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, ClientCapabilities, ClientInfo, Implementation, RawContent, Tool},
    service::{Peer, RunningService},
    transport::StreamableHttpClientTransport,
    RoleClient,
};
use serde_json::{Map, Value};

use crate::logging::Logger;
use crate::types::{ProviderConfig, ToolDescriptor};
use super::error::{McpError, McpResult};
use super::provider::{ContentBlock, ProviderConnector, ToolOutput, ToolProvider};

/// MCP client for one tool provider
pub struct McpClient {
    /// Provider name, for log lines
    provider: String,
    /// Request handle shared with the running service
    peer: Peer<RoleClient>,
    /// The running rmcp service; taken out on close
    service: Mutex<Option<RunningService<RoleClient, ClientInfo>>>,
    logger: Arc<dyn Logger>,
}

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "toolweave".to_string(),
            title: Some("Toolweave".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

impl McpClient {
    /// Connect to a provider over HTTP and run the initialize handshake
    pub async fn connect_http(config: &ProviderConfig, logger: Arc<dyn Logger>) -> McpResult<Self> {
        let url = config.endpoint();
        logger.info(&format!("[McpClient] Connecting to '{}' at {}", config.name, url));

        let transport = StreamableHttpClientTransport::from_uri(url.as_str());

        let service = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::connection_failed(&config.name, e))?;

        if let Some(info) = service.peer_info() {
            logger.info(&format!(
                "[McpClient] '{}' initialized: server {} {}",
                config.name, info.server_info.name, info.server_info.version
            ));
        }

        Ok(Self {
            provider: config.name.clone(),
            peer: service.peer().clone(),
            service: Mutex::new(Some(service)),
            logger,
        })
    }
}

impl From<Tool> for ToolDescriptor {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool.description.map(|s| s.to_string()).unwrap_or_default(),
            // input_schema is Arc<JsonObject>
            input_schema: Value::Object(tool.input_schema.as_ref().clone()),
        }
    }
}

#[async_trait]
impl ToolProvider for McpClient {
    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        let tools = self
            .peer
            .list_all_tools()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;

        self.logger.info(&format!(
            "[McpClient] '{}' listed {} tools",
            self.provider,
            tools.len()
        ));

        Ok(tools.into_iter().map(ToolDescriptor::from).collect())
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<ToolOutput> {
        self.logger.debug(&format!("[McpClient] '{}' calling tool: {}", self.provider, name));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: Some(arguments),
            task: None,
        };

        let result = self
            .peer
            .call_tool(params)
            .await
            .map_err(|e| McpError::ToolCallFailed(e.to_string()))?;

        // Content is Annotated<RawContent>, .raw holds the block itself
        let content = result
            .content
            .iter()
            .map(|c| match &c.raw {
                RawContent::Text(t) => ContentBlock::Text(t.text.clone()),
                _ => ContentBlock::NonText,
            })
            .collect();

        Ok(ToolOutput {
            content,
            is_error: result.is_error.unwrap_or(false),
        })
    }

    async fn close(&self) -> McpResult<()> {
        let service = self.service.lock().take();
        let Some(service) = service else {
            return Ok(());
        };

        self.logger.info(&format!("[McpClient] Closing connection to '{}'", self.provider));
        service
            .cancel()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;
        Ok(())
    }
}

/// Connector that opens real MCP sessions
#[derive(Clone)]
pub struct McpConnector {
    logger: Arc<dyn Logger>,
}

impl McpConnector {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl ProviderConnector for McpConnector {
    async fn connect(&self, config: &ProviderConfig) -> McpResult<Box<dyn ToolProvider>> {
        let client = McpClient::connect_http(config, Arc::clone(&self.logger)).await?;
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_conversion() {
        let schema = json!({
            "type": "object",
            "properties": { "entry_id": { "type": "string" } }
        });
        let Value::Object(schema) = schema else { unreachable!() };
        let tool = Tool::new("get_structure", "Fetch a PDB entry", Arc::new(schema.clone()));

        let descriptor = ToolDescriptor::from(tool);
        assert_eq!(descriptor.name, "get_structure");
        assert_eq!(descriptor.description, "Fetch a PDB entry");
        assert_eq!(descriptor.input_schema, Value::Object(schema));
    }

    #[test]
    fn test_client_info() {
        let info = client_info();
        assert_eq!(info.client_info.name, "toolweave");
    }
}
