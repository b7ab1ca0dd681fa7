//! Core types shared by the session manager, dispatcher and orchestrator
//!
//! This module contains the plain data types that flow between components.

mod message;
mod provider;
mod tool;

pub use message::{ChatMessage, MessageRole};
pub use provider::{ProviderConfig, DEFAULT_MCP_PATH};
pub use tool::{ToolCall, ToolDescriptor, ToolInvocationResult, cap_text};

/// Cancellation for in-flight model streams
pub use tokio_util::sync::CancellationToken;
