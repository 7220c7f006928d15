//! Wire types for the OpenAI-compatible chat completions API.
//!
//! These mirror the request and response envelopes of the
//! `/chat/completions` endpoint, in both buffered and streaming form.

use serde::{Deserialize, Serialize};

/// Role type for a chat message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System role.
    System,

    /// User role.
    User,

    /// Assistant role (appears in responses).
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message.
    pub role: MessageRole,

    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Create a new `ChatMessage` with the given role and content.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a new system `ChatMessage`.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a new user `ChatMessage`.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Request envelope for a chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name.
    pub model: String,

    /// Conversation messages, oldest first.
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Whether to stream the response as server-sent events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Token accounting reported by the API.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens generated in the completion.
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens for the request.
    #[serde(default)]
    pub total_tokens: u32,
}

/// One completion choice in a buffered response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Position of this choice in the response.
    pub index: u32,

    /// The generated message.
    pub message: ChatMessage,
}

/// Response envelope for a buffered chat completion.
///
/// The choices list may be empty; callers must not assume a first choice
/// exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Response identifier.
    #[serde(default)]
    pub id: String,

    /// Object type marker.
    #[serde(default)]
    pub object: String,

    /// Creation time as a unix timestamp.
    #[serde(default)]
    pub created: i64,

    /// Model that produced the response.
    #[serde(default)]
    pub model: String,

    /// Completion choices.
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token accounting.
    #[serde(default)]
    pub usage: Usage,
}

/// Incremental content carried by one streamed chunk.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDelta {
    /// New content appended by this chunk, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// One completion choice in a streamed chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChoice {
    /// Position of this choice in the response.
    pub index: u32,

    /// Incremental content.
    #[serde(default)]
    pub delta: StreamDelta,

    /// Reason the stream finished, present only on the final chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Response envelope for one streamed chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamResponse {
    /// Response identifier.
    #[serde(default)]
    pub id: String,

    /// Object type marker.
    #[serde(default)]
    pub object: String,

    /// Creation time as a unix timestamp.
    #[serde(default)]
    pub created: i64,

    /// Model that produced the response.
    #[serde(default)]
    pub model: String,

    /// Streamed choices.
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

impl StreamResponse {
    /// Returns the delta content of the first choice, if any.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
            .filter(|content| !content.is_empty())
    }
}

/// One decoded line of the event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A decoded chunk carrying incremental content.
    Chunk(StreamResponse),

    /// The `[DONE]` sentinel signalling end-of-stream.
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn request_omits_unset_fields() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::user("你好")],
            temperature: None,
            max_tokens: None,
            stream: None,
        };
        let value = to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "你好"}],
            })
        );
    }

    #[test]
    fn request_serializes_set_fields() {
        let request = ChatRequest {
            model: "gpt-4".to_string(),
            messages: vec![ChatMessage::system("命名助手")],
            temperature: Some(0.7),
            max_tokens: Some(1000),
            stream: Some(true),
        };
        let value = to_value(&request).unwrap();

        assert_eq!(value["temperature"], json!(0.7));
        assert_eq!(value["max_tokens"], json!(1000));
        assert_eq!(value["stream"], json!(true));
        assert_eq!(value["messages"][0]["role"], json!("system"));
    }

    #[test]
    fn response_with_empty_choices() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id": "cmpl-1", "object": "chat.completion", "created": 0, "model": "m", "choices": []}"#,
        )
        .unwrap();
        assert!(response.choices.is_empty());
        assert_eq!(response.usage, Usage::default());
    }

    #[test]
    fn response_round_trips_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{
                "id": "cmpl-2",
                "object": "chat.completion",
                "created": 1700000000,
                "model": "gpt-3.5-turbo",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "userName - 用户名称"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            }"#,
        )
        .unwrap();
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.role, MessageRole::Assistant);
        assert_eq!(response.usage.total_tokens, 15);
    }

    #[test]
    fn stream_chunk_with_content() {
        let chunk: StreamResponse = serde_json::from_str(
            r#"{"id": "c", "object": "chat.completion.chunk", "created": 0, "model": "m",
                "choices": [{"index": 0, "delta": {"content": "user"}, "finish_reason": null}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.delta_content(), Some("user"));
    }

    #[test]
    fn stream_chunk_with_empty_delta() {
        let chunk: StreamResponse = serde_json::from_str(
            r#"{"id": "c", "object": "chat.completion.chunk", "created": 0, "model": "m",
                "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.delta_content(), None);
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
    }
}
