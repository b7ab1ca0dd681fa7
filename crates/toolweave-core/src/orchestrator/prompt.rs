//! Outbound message assembly

use crate::types::{ChatMessage, ToolInvocationResult};

/// The last `window` entries of `history`, in order
pub fn history_window(history: &[ChatMessage], window: usize) -> &[ChatMessage] {
    let start = history.len().saturating_sub(window);
    &history[start..]
}

/// Guidance, windowed history, then the user query
pub fn initial_messages(
    guidance: &[String],
    history: &[ChatMessage],
    window: usize,
    query: &str,
) -> Vec<ChatMessage> {
    let windowed = history_window(history, window);
    let mut messages = Vec::with_capacity(guidance.len() + windowed.len() + 1);
    messages.extend(guidance.iter().map(ChatMessage::system));
    messages.extend_from_slice(windowed);
    messages.push(ChatMessage::user(query));
    messages
}

/// Append tool results as system messages, then the closing instruction
pub fn append_tool_results<'a, I>(messages: &mut Vec<ChatMessage>, results: I, closing_instruction: &str)
where
    I: IntoIterator<Item = &'a ToolInvocationResult>,
{
    messages.extend(results.into_iter().map(|r| ChatMessage::system(r.text.as_str())));
    messages.push(ChatMessage::system(closing_instruction));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;

    fn turns(n: usize) -> Vec<ChatMessage> {
        (0..n).map(|i| ChatMessage::user(format!("turn {}", i))).collect()
    }

    #[test]
    fn test_window_keeps_tail() {
        let history = turns(14);
        let windowed = history_window(&history, 10);
        assert_eq!(windowed.len(), 10);
        assert_eq!(windowed[0].text(), "turn 4");
        assert_eq!(windowed[9].text(), "turn 13");
    }

    #[test]
    fn test_window_shorter_history() {
        let history = turns(3);
        assert_eq!(history_window(&history, 10), &history[..]);
        assert!(history_window(&history, 0).is_empty());
    }

    #[test]
    fn test_initial_order() {
        let guidance = vec!["g1".to_string(), "g2".to_string()];
        let history = vec![ChatMessage::user("earlier"), ChatMessage::assistant("reply")];
        let messages = initial_messages(&guidance, &history, 10, "now");

        let roles: Vec<MessageRole> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User
            ]
        );
        assert_eq!(messages.last().map(|m| m.text()), Some("now"));
    }

    #[test]
    fn test_tool_results_are_system_messages() {
        let mut messages = vec![ChatMessage::user("q")];
        let results = vec![
            ToolInvocationResult::capped("a", "alpha", 100),
            ToolInvocationResult::capped("b", "beta", 100),
        ];
        append_tool_results(&mut messages, &results, "close");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1], ChatMessage::system("alpha"));
        assert_eq!(messages[2], ChatMessage::system("beta"));
        assert_eq!(messages[3], ChatMessage::system("close"));
    }
}
