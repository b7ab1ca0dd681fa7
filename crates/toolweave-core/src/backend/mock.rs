//! Scripted model backend for testing
//!
//! Replies are consumed from a queue in order; once the queue is empty the
//! backend echoes the last user message. Every request is recorded so tests
//! can inspect exactly what the model was shown.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use parking_lot::Mutex;

use super::error::{BackendError, BackendResult};
use super::traits::{ChatOptions, ModelBackend, ModelReply, StreamResponse};
use crate::types::{CancellationToken, ChatMessage, MessageRole, ToolCall};

/// One scripted answer
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer normally
    Reply(ModelReply),
    /// Fail the request before any output
    Fail(String),
    /// Stream `prefix` then fail mid-stream (non-streamed calls fail outright)
    BrokenStream { prefix: String, message: String },
}

/// A request received by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    /// Names of the tools offered, in catalog order
    pub tools: Vec<String>,
    pub streamed: bool,
}

impl RecordedRequest {
    /// Messages with the given role, in order
    pub fn messages_with_role(&self, role: MessageRole) -> Vec<&ChatMessage> {
        self.messages.iter().filter(|m| m.role == role).collect()
    }
}

#[derive(Debug, Default)]
struct MockBackendState {
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Deterministic model backend
///
/// Clones share the script and the request log.
#[derive(Debug, Clone)]
pub struct MockBackend {
    chunk_size: usize,
    chunk_delay_ms: u64,
    state: Arc<MockBackendState>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            chunk_size: 10,
            chunk_delay_ms: 0,
            state: Arc::new(MockBackendState::default()),
        }
    }

    /// Queue a scripted answer
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.state.script.lock().push_back(reply);
        self
    }

    /// Queue a plain text answer
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_reply(MockReply::Reply(ModelReply::text(text)))
    }

    /// Queue an answer that only requests tools
    pub fn with_tool_calls(self, calls: Vec<ToolCall>) -> Self {
        self.with_reply(MockReply::Reply(ModelReply::with_tool_calls(calls)))
    }

    /// Queue a failing request
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.with_reply(MockReply::Fail(message.into()))
    }

    /// Characters per streamed fragment (0 sends the whole text at once)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Delay between streamed fragments
    pub fn with_chunk_delay(mut self, delay_ms: u64) -> Self {
        self.chunk_delay_ms = delay_ms;
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }

    /// Scripted answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.state.script.lock().len()
    }

    fn record(&self, messages: &[ChatMessage], options: &ChatOptions, streamed: bool) {
        let tools = options
            .tools
            .as_ref()
            .map(|tools| tools.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default();
        self.state.requests.lock().push(RecordedRequest {
            messages: messages.to_vec(),
            tools,
            streamed,
        });
    }

    fn next_reply(&self, messages: &[ChatMessage]) -> MockReply {
        if let Some(reply) = self.state.script.lock().pop_front() {
            return reply;
        }
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.text())
            .unwrap_or("nothing");
        MockReply::Reply(ModelReply::text(format!("Echo: {}", last_user)))
    }

    fn split_into_chunks(&self, text: &str) -> Vec<String> {
        if self.chunk_size == 0 || text.is_empty() {
            return vec![text.to_string()];
        }

        text.chars()
            .collect::<Vec<_>>()
            .chunks(self.chunk_size)
            .map(|c| c.iter().collect())
            .collect()
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, messages: Vec<ChatMessage>, options: ChatOptions) -> BackendResult<ModelReply> {
        self.record(&messages, &options, false);
        match self.next_reply(&messages) {
            MockReply::Reply(reply) => Ok(reply),
            MockReply::Fail(message) | MockReply::BrokenStream { message, .. } => {
                Err(BackendError::api_error("mock", message))
            }
        }
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        options: ChatOptions,
        cancel_token: CancellationToken,
    ) -> BackendResult<StreamResponse> {
        self.record(&messages, &options, true);

        // Tool calls in a scripted reply are not streamed
        let items: Vec<BackendResult<String>> = match self.next_reply(&messages) {
            MockReply::Fail(message) => return Err(BackendError::api_error("mock", message)),
            MockReply::Reply(reply) => self.split_into_chunks(&reply.content).into_iter().map(Ok).collect(),
            MockReply::BrokenStream { prefix, message } => self
                .split_into_chunks(&prefix)
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(BackendError::api_error("mock", message))))
                .collect(),
        };

        let delay_ms = self.chunk_delay_ms;
        let stream = stream::iter(items.into_iter().enumerate())
            .then(move |(i, item)| async move {
                if i > 0 && delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                item
            })
            .take_until(cancel_token.cancelled_owned());

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolDescriptor;

    async fn collect_text(stream: StreamResponse) -> (String, Option<BackendError>) {
        let mut stream = stream;
        let mut text = String::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => text.push_str(&fragment),
                Err(e) => return (text, Some(e)),
            }
        }
        (text, None)
    }

    #[tokio::test]
    async fn test_script_is_consumed_in_order() {
        let backend = MockBackend::new()
            .with_tool_calls(vec![ToolCall::new("c1", "lookup", Default::default())])
            .with_text("done");

        let first = backend.chat(vec![ChatMessage::user("q")], ChatOptions::new()).await.unwrap();
        assert!(first.has_tool_calls());
        assert_eq!(first.tool_calls[0].name, "lookup");

        let second = backend.chat(vec![ChatMessage::user("q")], ChatOptions::new()).await.unwrap();
        assert_eq!(second.content, "done");
        assert_eq!(backend.remaining(), 0);
    }

    #[tokio::test]
    async fn test_echo_when_script_empty() {
        let backend = MockBackend::new();
        let reply = backend
            .chat(
                vec![ChatMessage::user("first"), ChatMessage::assistant("a"), ChatMessage::user("second")],
                ChatOptions::new(),
            )
            .await
            .unwrap();
        assert_eq!(reply.content, "Echo: second");
    }

    #[tokio::test]
    async fn test_requests_are_recorded() {
        let backend = MockBackend::new().with_text("ok");
        let options = ChatOptions::new().with_tools(vec![
            ToolDescriptor::new("a", "first"),
            ToolDescriptor::new("b", "second"),
        ]);
        backend
            .chat(vec![ChatMessage::system("be brief"), ChatMessage::user("hi")], options)
            .await
            .unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tools, vec!["a", "b"]);
        assert!(!requests[0].streamed);
        assert_eq!(requests[0].messages_with_role(MessageRole::System).len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let backend = MockBackend::new().with_failure("quota exceeded");
        let err = backend.chat(vec![ChatMessage::user("q")], ChatOptions::new()).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_stream_chunks_reassemble() {
        let backend = MockBackend::new().with_text("The quick brown fox").with_chunk_size(4);
        let stream = backend
            .stream_chat(vec![ChatMessage::user("q")], ChatOptions::new(), CancellationToken::new())
            .await
            .unwrap();
        let (text, err) = collect_text(stream).await;
        assert_eq!(text, "The quick brown fox");
        assert!(err.is_none());
        assert!(backend.requests()[0].streamed);
    }

    #[tokio::test]
    async fn test_broken_stream_yields_prefix_then_error() {
        let backend = MockBackend::new().with_reply(MockReply::BrokenStream {
            prefix: "partial".to_string(),
            message: "connection reset".to_string(),
        });
        let stream = backend
            .stream_chat(vec![ChatMessage::user("q")], ChatOptions::new(), CancellationToken::new())
            .await
            .unwrap();
        let (text, err) = collect_text(stream).await;
        assert_eq!(text, "partial");
        assert!(err.unwrap().to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_cancelled_stream_ends_early() {
        let backend = MockBackend::new().with_text("abcdefghij").with_chunk_size(1);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let stream = backend
            .stream_chat(vec![ChatMessage::user("q")], ChatOptions::new(), cancel)
            .await
            .unwrap();
        let (text, _) = collect_text(stream).await;
        assert!(text.is_empty());
    }
}
