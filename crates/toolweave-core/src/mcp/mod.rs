//! Tool provider sessions over MCP (Model Context Protocol)
//!
//! Uses the official rmcp SDK for real connections. The session manager owns
//! one session per provider and routes tool names to them.
//!
//! # Example
//!
//! ```rust,ignore
//! use toolweave_core::mcp::{McpConnector, SessionManager};
//!
//! let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());
//! let mut sessions = SessionManager::new(Arc::new(McpConnector::new(logger.clone())), logger);
//!
//! sessions.connect(&[
//!     ProviderConfig::new("pdb", "localhost", 8000),
//!     ProviderConfig::new("chembl", "localhost", 8001),
//! ]).await?;
//!
//! let session = sessions.route("get_structure")?;
//! let output = session.call_tool("get_structure", args).await?;
//!
//! let report = sessions.close().await;
//! ```

mod client;
mod error;
mod manager;
pub mod mock;
mod provider;
mod session;

pub use client::{McpClient, McpConnector};
pub use error::{McpError, McpResult};
pub use manager::{CloseReport, SessionManager};
pub use provider::{ContentBlock, ProviderConnector, ToolOutput, ToolProvider};
pub use session::ProviderSession;
