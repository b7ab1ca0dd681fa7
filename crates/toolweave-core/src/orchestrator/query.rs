//! Two-phase query driver

use std::sync::Arc;

use crate::backend::{BackendResult, ChatOptions, ModelBackend};
use crate::logging::Logger;
use crate::mcp::{CloseReport, McpResult, ProviderConnector, SessionManager};
use crate::tools::{Dispatcher, ToolCatalog};
use crate::types::{CancellationToken, ChatMessage, ProviderConfig, ToolCall};
use crate::{log_debug, log_info, log_warn};

use super::answer::{Answer, QueryOutcome, ToolCallRecord};
use super::config::OrchestratorConfig;
use super::prompt;

/// Where a query is in its exchange with the model
///
/// Either `AwaitingFirstResponse -> Done`, or
/// `AwaitingFirstResponse -> Dispatching -> AwaitingFollowup -> Done`.
/// There is no edge back to `Dispatching`: tool calls in the follow-up
/// reply are ignored.
#[derive(Debug)]
enum QueryPhase {
    AwaitingFirstResponse,
    Dispatching(Vec<ToolCall>),
    AwaitingFollowup,
    Done(Answer),
}

/// Connects tool providers and answers queries with their help
pub struct Orchestrator {
    sessions: SessionManager,
    backend: Arc<dyn ModelBackend>,
    config: OrchestratorConfig,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    pub fn new(
        connector: Arc<dyn ProviderConnector>,
        backend: Arc<dyn ModelBackend>,
        config: OrchestratorConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            sessions: SessionManager::new(connector, Arc::clone(&logger)),
            backend,
            config,
            logger,
        }
    }

    /// Open a session per provider and build the tool catalog
    ///
    /// See [`SessionManager::connect`]; nothing stays open on failure.
    pub async fn connect(&mut self, providers: &[ProviderConfig]) -> McpResult<()> {
        self.sessions.connect(providers).await
    }

    /// Close every provider session
    pub async fn close(&mut self) -> CloseReport {
        self.sessions.close().await
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn catalog(&self) -> &ToolCatalog {
        self.sessions.catalog()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Answer `query` in the context of the trailing `history`
    ///
    /// Backend failures are returned unchanged. Tool failures are not
    /// errors: the failed calls are left out of the follow-up and show
    /// up only in [`QueryOutcome::tool_calls`].
    pub async fn process_query(&self, query: &str, history: &[ChatMessage]) -> BackendResult<QueryOutcome> {
        self.process_query_with_cancel(query, history, CancellationToken::new())
            .await
    }

    /// As [`process_query`](Self::process_query), with a token that ends a
    /// streamed answer early
    pub async fn process_query_with_cancel(
        &self,
        query: &str,
        history: &[ChatMessage],
        cancel_token: CancellationToken,
    ) -> BackendResult<QueryOutcome> {
        let mut messages =
            prompt::initial_messages(&self.config.guidance, history, self.config.history_window, query);
        let mut records = Vec::new();

        log_info!(
            self.logger,
            "[Orchestrator] Query with {} history message(s), {} tool(s) offered",
            messages.len() - self.config.guidance.len() - 1,
            self.catalog().len()
        );

        let mut phase = QueryPhase::AwaitingFirstResponse;
        loop {
            phase = match phase {
                QueryPhase::AwaitingFirstResponse => {
                    let options = self.chat_options().with_tools(self.catalog().descriptors());
                    let reply = self.backend.chat(messages.clone(), options).await?;
                    if reply.has_tool_calls() {
                        QueryPhase::Dispatching(reply.tool_calls)
                    } else {
                        log_debug!(self.logger, "[Orchestrator] Answered without tools");
                        QueryPhase::Done(Answer::Complete(reply.content))
                    }
                }
                QueryPhase::Dispatching(calls) => {
                    records = self.dispatch(&calls, &mut messages).await;
                    QueryPhase::AwaitingFollowup
                }
                QueryPhase::AwaitingFollowup => QueryPhase::Done(self.follow_up(messages.clone(), &cancel_token).await?),
                QueryPhase::Done(answer) => {
                    return Ok(QueryOutcome {
                        answer,
                        tool_calls: records,
                    })
                }
            };
        }
    }

    fn chat_options(&self) -> ChatOptions {
        let mut options = ChatOptions::new();
        if let Some(temperature) = self.config.temperature {
            options = options.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }
        options
    }

    /// Run the requested calls and fold the successful results into `messages`
    async fn dispatch(&self, calls: &[ToolCall], messages: &mut Vec<ChatMessage>) -> Vec<ToolCallRecord> {
        let catalog = self.catalog();
        let dispatcher =
            Dispatcher::new(catalog, Arc::clone(&self.logger)).with_char_limit(self.config.result_char_limit);
        let outcomes = dispatcher.dispatch(calls).await;

        let records: Vec<ToolCallRecord> = calls
            .iter()
            .zip(&outcomes)
            .map(|(call, outcome)| {
                let provider = catalog.route(&call.name).map(|s| s.name().to_string());
                ToolCallRecord::new(&call.name, &call.arguments, provider, outcome)
            })
            .collect();

        let failed = records.iter().filter(|r| !r.succeeded()).count();
        if failed > 0 {
            log_warn!(
                self.logger,
                "[Orchestrator] {} of {} tool call(s) failed and are left out of the follow-up",
                failed,
                calls.len()
            );
        }

        prompt::append_tool_results(
            messages,
            outcomes.iter().filter_map(|o| o.as_ref().ok()),
            &self.config.closing_instruction,
        );
        records
    }

    async fn follow_up(&self, messages: Vec<ChatMessage>, cancel_token: &CancellationToken) -> BackendResult<Answer> {
        if !self.config.stream_final {
            let reply = self.backend.chat(messages, self.chat_options()).await?;
            return Ok(Answer::Complete(reply.content));
        }

        let fragments = self
            .backend
            .stream_chat(messages, self.chat_options(), cancel_token.clone())
            .await?;
        Ok(Answer::Stream(fragments))
    }
}
