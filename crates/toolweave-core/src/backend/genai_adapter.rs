//! Adapter between toolweave types and genai types
//!
//! Conversion functions between our types and genai's, so the orchestrator
//! never sees genai directly.

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatStreamEvent, Tool as GenaiTool,
    ToolCall as GenaiToolCall,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};

use crate::types::{ChatMessage, MessageRole, ToolCall, ToolDescriptor};

use super::traits::{ChatOptions, ModelConfig};

// ============================================================================
// Message Conversion: toolweave -> genai
// ============================================================================

/// Convert a ChatMessage to a genai ChatMessage
pub fn to_genai_message(msg: ChatMessage) -> GenaiMessage {
    match msg.role {
        MessageRole::System => GenaiMessage::system(msg.content),
        MessageRole::User => GenaiMessage::user(msg.content),
        MessageRole::Assistant => GenaiMessage::assistant(msg.content),
    }
}

/// Convert a vector of messages to genai messages
pub fn to_genai_messages(messages: Vec<ChatMessage>) -> Vec<GenaiMessage> {
    messages.into_iter().map(to_genai_message).collect()
}

// ============================================================================
// Tool Conversion: toolweave -> genai
// ============================================================================

/// Convert a tool descriptor to a genai tool declaration
pub fn to_genai_tool(tool: ToolDescriptor) -> GenaiTool {
    GenaiTool::new(&tool.name)
        .with_description(&tool.description)
        .with_schema(tool.input_schema)
}

/// Convert descriptors to genai tool declarations
pub fn to_genai_tools(tools: Vec<ToolDescriptor>) -> Vec<GenaiTool> {
    tools.into_iter().map(to_genai_tool).collect()
}

// ============================================================================
// Options Conversion: toolweave -> genai
// ============================================================================

/// Convert ChatOptions to genai ChatOptions
pub fn to_genai_options(options: &ChatOptions) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default();

    if let Some(temp) = options.temperature {
        genai_opts = genai_opts.with_temperature(temp as f64);
    }

    if let Some(max_tokens) = options.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    genai_opts
}

// ============================================================================
// Response Conversion: genai -> toolweave
// ============================================================================

/// Convert a genai ToolCall to a ToolCall
pub fn from_genai_tool_call(tc: &GenaiToolCall) -> ToolCall {
    ToolCall::from_value(tc.call_id.clone(), tc.fn_name.clone(), tc.fn_arguments.clone())
}

/// Text carried by a genai stream event, if any
///
/// Streams are only requested for the final answer, so start, end and
/// reasoning events are dropped.
pub fn from_genai_event(event: ChatStreamEvent) -> Option<String> {
    match event {
        ChatStreamEvent::Chunk(chunk) => Some(chunk.content),
        _ => None,
    }
}

// ============================================================================
// Client Creation
// ============================================================================

/// Create a genai Client for the given model settings
///
/// An explicit API key overrides genai's environment lookup; an explicit API
/// base overrides the adapter's default endpoint (e.g. a remote Ollama).
pub fn create_client(config: &ModelConfig) -> Client {
    let mut builder = Client::builder();

    if let Some(key) = config.api_key.clone() {
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(key.clone())))
            },
        );
        builder = builder.with_auth_resolver(auth_resolver);
    }

    if let Some(api_base) = config.api_base.clone() {
        let target_resolver = ServiceTargetResolver::from_resolver_fn(
            move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                let ServiceTarget { auth, model, .. } = target;
                Ok(ServiceTarget {
                    endpoint: Endpoint::from_owned(api_base.clone()),
                    auth,
                    model,
                })
            },
        );
        builder = builder.with_service_target_resolver(target_resolver);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use genai::chat::ChatRole as GenaiRole;
    use serde_json::json;

    #[test]
    fn test_message_conversion() {
        let msg = to_genai_message(ChatMessage::user("Hello, world!"));
        assert!(matches!(msg.role, GenaiRole::User));

        let msg = to_genai_message(ChatMessage::system("Tool output"));
        assert!(matches!(msg.role, GenaiRole::System));

        let msg = to_genai_message(ChatMessage::assistant("Hi"));
        assert!(matches!(msg.role, GenaiRole::Assistant));
    }

    #[test]
    fn test_tool_conversion() {
        let tool = ToolDescriptor::new("get_structure", "Fetch a PDB entry").with_schema(json!({
            "type": "object",
            "properties": {
                "entry_id": { "type": "string" }
            }
        }));

        let genai_tool = to_genai_tool(tool);
        assert_eq!(genai_tool.name, "get_structure");
    }
}
