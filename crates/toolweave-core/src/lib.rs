//! Toolweave Core
//!
//! Connects a language model to the tools of several MCP servers at once.
//!
//! - `mcp`: one session per tool provider, opened and closed as a unit
//! - `tools`: the merged tool catalog and the dispatcher that routes calls
//! - `backend`: language model backends (genai, scripted mock)
//! - `orchestrator`: the two-phase query exchange tying it together
//! - `config`: YAML settings
//!
//! ```rust,ignore
//! use toolweave_core::{McpConnector, GenaiBackend, Orchestrator, TracingLogger};
//!
//! let logger: SharedLogger = Arc::new(TracingLogger::new());
//! let connector = Arc::new(McpConnector::new(logger.clone()));
//! let backend = Arc::new(GenaiBackend::new(settings.model_config(), logger.clone()));
//!
//! let mut orchestrator = Orchestrator::new(connector, backend, settings.orchestrator_config(), logger);
//! orchestrator.connect(&settings.providers).await?;
//! let outcome = orchestrator.process_query("Which ligands bind 1HR7?", &[]).await?;
//! println!("{}", outcome.answer.into_text().await?);
//! orchestrator.close().await;
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod mcp;
pub mod tools;
pub mod backend;
pub mod orchestrator;

pub use types::{
    CancellationToken, ChatMessage, MessageRole, ProviderConfig, ToolCall, ToolDescriptor,
    ToolInvocationResult,
};

pub use logging::{Logger, NoOpLogger, SharedLogger, TracingLogger};

pub use config::{ConfigError, ConfigProvider, FileConfigProvider, MemoryConfigProvider, Settings};

pub use mcp::{CloseReport, McpConnector, McpError, McpResult, SessionManager};

pub use tools::{DispatchError, DispatchOutcome, Dispatcher, ToolCatalog};

pub use backend::{BackendError, BackendResult, GenaiBackend, MockBackend, ModelBackend};

pub use orchestrator::{Answer, Orchestrator, OrchestratorConfig, QueryOutcome, ToolCallRecord};
