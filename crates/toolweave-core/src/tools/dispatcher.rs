//! Routes model-requested tool calls to their owning provider

use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;

use crate::logging::Logger;
use crate::types::{ToolCall, ToolInvocationResult};
use crate::{log_debug, log_warn};
use super::catalog::ToolCatalog;

/// Default cap on tool result text, in characters
pub const DEFAULT_RESULT_CHAR_LIMIT: usize = 10_000;

/// Why a single tool call produced no result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No connected provider offers this tool
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The provider call failed or returned an unusable result
    #[error("Tool '{tool}' failed: {detail}")]
    InvocationFailed { tool: String, detail: String },
}

impl DispatchError {
    fn invocation(tool: &str, detail: impl Into<String>) -> Self {
        Self::InvocationFailed {
            tool: tool.to_string(),
            detail: detail.into(),
        }
    }

    /// Name of the tool the failed call targeted
    pub fn tool_name(&self) -> &str {
        match self {
            Self::UnknownTool(tool) => tool,
            Self::InvocationFailed { tool, .. } => tool,
        }
    }
}

/// Result of one dispatched call
pub type DispatchOutcome = Result<ToolInvocationResult, DispatchError>;

/// Executes batches of tool calls against the catalog
///
/// Each call is isolated: an unknown tool or a failing provider yields an
/// error for that call only, and the rest of the batch still runs.
pub struct Dispatcher<'a> {
    catalog: &'a ToolCatalog,
    char_limit: usize,
    logger: Arc<dyn Logger>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(catalog: &'a ToolCatalog, logger: Arc<dyn Logger>) -> Self {
        Self {
            catalog,
            char_limit: DEFAULT_RESULT_CHAR_LIMIT,
            logger,
        }
    }

    /// Set the result text cap, in characters
    pub fn with_char_limit(mut self, char_limit: usize) -> Self {
        self.char_limit = char_limit;
        self
    }

    /// Dispatch every call; outcomes are returned in request order
    ///
    /// Calls run concurrently on the current task. A failure never cancels
    /// the other calls of the batch.
    pub async fn dispatch(&self, calls: &[ToolCall]) -> Vec<DispatchOutcome> {
        join_all(calls.iter().map(|call| self.dispatch_one(call))).await
    }

    /// Route and execute a single call
    pub async fn dispatch_one(&self, call: &ToolCall) -> DispatchOutcome {
        let Some(session) = self.catalog.route(&call.name) else {
            log_warn!(self.logger, "[Dispatcher] No provider offers tool '{}'", call.name);
            return Err(DispatchError::UnknownTool(call.name.clone()));
        };

        log_debug!(
            self.logger,
            "[Dispatcher] Calling '{}' on provider '{}'",
            call.name,
            session.name()
        );

        let output = session
            .call_tool(&call.name, call.arguments.clone())
            .await
            .map_err(|e| {
                log_warn!(self.logger, "[Dispatcher] Tool '{}' failed: {}", call.name, e);
                DispatchError::invocation(&call.name, e.to_string())
            })?;

        let text = output
            .first_text()
            .ok_or_else(|| DispatchError::invocation(&call.name, "result has no leading text content"))?;

        if output.is_error {
            log_warn!(self.logger, "[Dispatcher] Tool '{}' reported an error", call.name);
            return Err(DispatchError::invocation(&call.name, text));
        }

        let result = ToolInvocationResult::capped(&call.name, text, self.char_limit);
        if result.truncated {
            log_debug!(
                self.logger,
                "[Dispatcher] Result of '{}' capped to {} characters",
                call.name,
                self.char_limit
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::mcp::mock::{MockConnector, MockToolBehavior, MockToolServer};
    use crate::mcp::SessionManager;
    use crate::types::{ProviderConfig, ToolDescriptor};
    use serde_json::{json, Map, Value};

    fn logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    fn call(name: &str, args: Value) -> ToolCall {
        ToolCall::from_value(format!("call_{}", name), name, args)
    }

    async fn connected(servers: Vec<MockToolServer>) -> SessionManager {
        let configs: Vec<ProviderConfig> = servers
            .iter()
            .map(|s| ProviderConfig::new(s.name(), "localhost", 1))
            .collect();
        let connector = servers
            .into_iter()
            .fold(MockConnector::new(), |c, s| c.with_server(s));
        let mut manager = SessionManager::new(Arc::new(connector), logger());
        manager.connect(&configs).await.unwrap();
        manager
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_owner() {
        let pdb = MockToolServer::new("pdb").with_text_tool("get_structure", "HEADER 1HR7");
        let chembl = MockToolServer::new("chembl").with_text_tool("get_annotation", "CHEMBL25");
        let mut manager = connected(vec![pdb.clone(), chembl.clone()]).await;

        let dispatcher = Dispatcher::new(manager.catalog(), logger());
        let outcomes = dispatcher
            .dispatch(&[call("get_structure", json!({ "entry_id": "1HR7" }))])
            .await;

        assert_eq!(outcomes.len(), 1);
        let result = outcomes[0].as_ref().unwrap();
        assert_eq!(result.tool_name, "get_structure");
        assert_eq!(result.text, "HEADER 1HR7");
        assert!(!result.truncated);

        assert_eq!(pdb.call_count(), 1);
        assert_eq!(pdb.calls()[0].arguments.get("entry_id"), Some(&json!("1HR7")));
        assert_eq!(chembl.call_count(), 0);

        manager.close().await;
    }

    #[tokio::test]
    async fn test_failures_are_isolated_and_ordered() {
        let server = MockToolServer::new("p")
            .with_text_tool("one", "1")
            .with_tool(ToolDescriptor::new("two", "fails"), MockToolBehavior::Fail("boom".to_string()))
            .with_text_tool("three", "3")
            .with_text_tool("four", "4");
        let mut manager = connected(vec![server.clone()]).await;

        let dispatcher = Dispatcher::new(manager.catalog(), logger());
        let calls: Vec<ToolCall> = ["one", "two", "three", "missing", "four"]
            .iter()
            .map(|n| call(n, json!({})))
            .collect();
        let outcomes = dispatcher.dispatch(&calls).await;

        assert_eq!(outcomes.len(), 5);
        assert_eq!(outcomes[0].as_ref().unwrap().text, "1");
        assert!(matches!(
            &outcomes[1],
            Err(DispatchError::InvocationFailed { tool, detail }) if tool == "two" && detail.contains("boom")
        ));
        assert_eq!(outcomes[2].as_ref().unwrap().text, "3");
        assert_eq!(outcomes[3], Err(DispatchError::UnknownTool("missing".to_string())));
        assert_eq!(outcomes[4].as_ref().unwrap().text, "4");

        // Every routable call reached the provider, including those after the failure
        assert_eq!(server.call_count(), 4);

        manager.close().await;
    }

    #[tokio::test]
    async fn test_result_text_is_capped() {
        let long = "a".repeat(15_000);
        let server = MockToolServer::new("p").with_text_tool("big", long);
        let mut manager = connected(vec![server]).await;

        let dispatcher = Dispatcher::new(manager.catalog(), logger());
        let outcome = dispatcher.dispatch_one(&call("big", json!({}))).await.unwrap();
        assert_eq!(outcome.text.chars().count(), 10_000);
        assert!(outcome.truncated);

        let small = Dispatcher::new(manager.catalog(), logger()).with_char_limit(5);
        let outcome = small.dispatch_one(&call("big", json!({}))).await.unwrap();
        assert_eq!(outcome.text, "aaaaa");

        manager.close().await;
    }

    #[tokio::test]
    async fn test_malformed_results_fail() {
        let server = MockToolServer::new("p")
            .with_tool(ToolDescriptor::new("err", ""), MockToolBehavior::ProviderError("bad id".to_string()))
            .with_tool(ToolDescriptor::new("image", ""), MockToolBehavior::NonText)
            .with_tool(ToolDescriptor::new("empty", ""), MockToolBehavior::Empty);
        let mut manager = connected(vec![server]).await;
        let dispatcher = Dispatcher::new(manager.catalog(), logger());

        for name in ["err", "image", "empty"] {
            let outcome = dispatcher.dispatch_one(&call(name, json!({}))).await;
            match outcome {
                Err(DispatchError::InvocationFailed { tool, .. }) => assert_eq!(tool, name),
                other => panic!("expected invocation failure for {}, got {:?}", name, other),
            }
        }

        manager.close().await;
    }

    #[tokio::test]
    async fn test_closed_session_is_not_used() {
        let server = MockToolServer::new("p").with_text_tool("t", "ok");
        let mut manager = connected(vec![server.clone()]).await;
        let catalog = manager.catalog().clone();
        manager.close().await;

        let dispatcher = Dispatcher::new(&catalog, logger());
        let outcome = dispatcher
            .dispatch_one(&ToolCall::new("c", "t", Map::new()))
            .await;
        assert!(matches!(outcome, Err(DispatchError::InvocationFailed { .. })));
        assert_eq!(server.call_count(), 0);
    }

    #[test]
    fn test_dispatch_error_tool_name() {
        assert_eq!(DispatchError::UnknownTool("x".to_string()).tool_name(), "x");
        assert_eq!(DispatchError::invocation("y", "d").tool_name(), "y");
    }
}
