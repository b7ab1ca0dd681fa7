//! Orchestrator settings

use crate::tools::DEFAULT_RESULT_CHAR_LIMIT;

/// Default number of prior turns forwarded to the model
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Leading system messages sent with every query
pub const DEFAULT_GUIDANCE: &[&str] = &[
    "You are a research assistant with access to external tools. \
     Call a tool whenever it can supply information the user asks for, \
     and base your answer on what the tools return.",
    "When a tool parameter is not given by the user, infer a sensible default \
     value for it instead of asking for it.",
];

/// System instruction appended after the tool results
pub const DEFAULT_CLOSING_INSTRUCTION: &str =
    "Use only the tool outputs above to create the response.";

/// How the orchestrator shapes a query
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Trailing history entries forwarded to the model
    pub history_window: usize,
    /// Cap on each tool result, in characters
    pub result_char_limit: usize,
    /// Stream the follow-up answer instead of returning it whole
    pub stream_final: bool,
    /// Leading system messages
    pub guidance: Vec<String>,
    /// System message placed after the tool results
    pub closing_instruction: String,
    /// Sampling temperature passed to the backend
    pub temperature: Option<f32>,
    /// Token limit passed to the backend
    pub max_tokens: Option<u32>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            result_char_limit: DEFAULT_RESULT_CHAR_LIMIT,
            stream_final: false,
            guidance: DEFAULT_GUIDANCE.iter().map(|s| s.to_string()).collect(),
            closing_instruction: DEFAULT_CLOSING_INSTRUCTION.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_result_char_limit(mut self, limit: usize) -> Self {
        self.result_char_limit = limit;
        self
    }

    pub fn with_stream_final(mut self, stream: bool) -> Self {
        self.stream_final = stream;
        self
    }

    /// Replace the leading system messages
    pub fn with_guidance<I, S>(mut self, guidance: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guidance = guidance.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_closing_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.closing_instruction = instruction.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}
