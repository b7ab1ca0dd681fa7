//! Query results handed back to the caller

use std::fmt;

use futures::{stream, StreamExt};
use serde_json::{Map, Value};

use crate::backend::{BackendResult, StreamResponse};
use crate::tools::{DispatchError, DispatchOutcome};

/// Lazily produced fragments of a streamed answer
pub type TextStream = StreamResponse;

/// Final answer of a query
///
/// A streamed answer is finite and can be consumed only once.
pub enum Answer {
    Complete(String),
    Stream(TextStream),
}

impl Answer {
    pub fn is_stream(&self) -> bool {
        matches!(self, Answer::Stream(_))
    }

    /// Collect the whole answer, draining a stream if needed
    pub async fn into_text(self) -> BackendResult<String> {
        match self {
            Answer::Complete(text) => Ok(text),
            Answer::Stream(mut fragments) => {
                let mut text = String::new();
                while let Some(fragment) = fragments.next().await {
                    text.push_str(&fragment?);
                }
                Ok(text)
            }
        }
    }

    /// View any answer as a fragment stream
    pub fn into_stream(self) -> TextStream {
        match self {
            Answer::Complete(text) => Box::pin(stream::once(async move { Ok(text) })),
            Answer::Stream(fragments) => fragments,
        }
    }
}

impl fmt::Debug for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Complete(text) => f.debug_tuple("Complete").field(text).finish(),
            Answer::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Trace entry for one tool call the model requested
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
    /// Provider the call was routed to, if any
    pub provider: Option<String>,
    /// Characters of result text kept, or why the call failed
    pub outcome: Result<usize, DispatchError>,
    pub truncated: bool,
}

impl ToolCallRecord {
    pub(crate) fn new(
        tool_name: &str,
        arguments: &Map<String, Value>,
        provider: Option<String>,
        outcome: &DispatchOutcome,
    ) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            arguments: arguments.clone(),
            provider,
            outcome: outcome
                .as_ref()
                .map(|result| result.text.chars().count())
                .map_err(Clone::clone),
            truncated: outcome.as_ref().map(|r| r.truncated).unwrap_or(false),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Calling tool {} with args {}",
            self.tool_name,
            Value::Object(self.arguments.clone())
        )?;
        match &self.outcome {
            Ok(chars) if self.truncated => write!(f, " -> {} chars (truncated)", chars),
            Ok(chars) => write!(f, " -> {} chars", chars),
            Err(e) => write!(f, " -> failed: {}", e),
        }
    }
}

/// Everything a query produced
#[derive(Debug)]
pub struct QueryOutcome {
    pub answer: Answer,
    /// Requested tool calls in request order; empty when the model answered directly
    pub tool_calls: Vec<ToolCallRecord>,
}
