//! Errors raised by provider sessions and the session manager

use thiserror::Error;

/// MCP session errors
#[derive(Error, Debug)]
pub enum McpError {
    /// Transport could not be opened or the initialize handshake failed
    #[error("Connection to provider '{provider}' failed: {reason}")]
    ConnectionFailed { provider: String, reason: String },

    /// `tools/list` failed after a successful handshake
    #[error("Tool discovery on provider '{provider}' failed: {reason}")]
    DiscoveryFailed { provider: String, reason: String },

    #[error("Tool call failed: {0}")]
    ToolCallFailed(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Session for provider '{0}' is closed")]
    SessionClosed(String),

    #[error("Session manager has already been connected")]
    AlreadyConnected,

    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl McpError {
    pub fn connection_failed(provider: impl Into<String>, reason: impl ToString) -> Self {
        Self::ConnectionFailed {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }

    pub fn discovery_failed(provider: impl Into<String>, reason: impl ToString) -> Self {
        Self::DiscoveryFailed {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error happened while bringing a provider up
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::DiscoveryFailed { .. })
    }
}

pub type McpResult<T> = Result<T, McpError>;
