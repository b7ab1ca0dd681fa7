//! Tool provider endpoint configuration

use serde::{Deserialize, Serialize};

/// HTTP path the MCP Streamable HTTP transport is mounted on by default
pub const DEFAULT_MCP_PATH: &str = "/mcp";

/// Endpoint of one tool provider (MCP server)
///
/// Supplied from configuration and never changed while the orchestrator holds
/// a session for it.
///
/// Sessions use the MCP Streamable HTTP transport only. A server that only
/// speaks the legacy SSE transport (e.g. FastMCP with `transport="sse"`,
/// served at `/sse`) must be switched to Streamable HTTP
/// (`transport="streamable-http"`, served at `/mcp`); pointing `path` at an
/// SSE endpoint fails the initialize handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name, unique within one orchestrator (e.g. "pdb", "chembl")
    pub name: String,
    /// Host name or address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// HTTP path of the MCP endpoint
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_path() -> String {
    DEFAULT_MCP_PATH.to_string()
}

impl ProviderConfig {
    /// Create a provider config with the default MCP path
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            path: default_path(),
        }
    }

    /// Set the HTTP path of the MCP endpoint
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Full URL of the provider's MCP endpoint
    pub fn endpoint(&self) -> String {
        let path = self.path.trim_start_matches('/');
        format!("http://{}:{}/{}", self.host, self.port, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let config = ProviderConfig::new("pdb", "localhost", 8000);
        assert_eq!(config.endpoint(), "http://localhost:8000/mcp");

        let config = ProviderConfig::new("chembl", "10.0.0.2", 8001).with_path("chembl/mcp");
        assert_eq!(config.endpoint(), "http://10.0.0.2:8001/chembl/mcp");
    }

    #[test]
    fn test_path_defaults_when_missing() {
        let config: ProviderConfig =
            serde_json::from_str(r#"{"name":"pdb","host":"localhost","port":8000}"#).unwrap();
        assert_eq!(config.path, DEFAULT_MCP_PATH);
    }
}
