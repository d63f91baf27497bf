//! Data models for the OpenAI-compatible side of the shim
//!
//! These are the request and response bodies clients see on `/v1/models` and
//! `/v1/chat/completions`.
use serde::{Deserialize, Serialize};

use crate::backend::BACKEND_OWNER;

/// A model entry in the /v1/models response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Model {
    /// The model identifier, as the backend names it.
    pub id: String,
    /// The object type, which is always "model".
    pub object: String,
    /// The organization that owns the model.
    pub owned_by: String,
    /// Always empty; present for client compatibility.
    pub permission: Vec<serde_json::Value>,
}

impl Model {
    pub fn new(id: impl Into<String>) -> Self {
        Model {
            id: id.into(),
            object: "model".into(),
            owned_by: BACKEND_OWNER.into(),
            permission: Vec::new(),
        }
    }
}

/// The response from the /v1/models endpoint, which is a list of models.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListModelResponse {
    /// The object type, which is always "list".
    pub object: String,
    /// A list of model objects.
    pub data: Vec<Model>,
}

impl ListModelResponse {
    pub fn new(data: Vec<Model>) -> Self {
        ListModelResponse {
            object: "list".into(),
            data,
        }
    }
}

/// A single chat message as the client sent it. Messages are forwarded to the
/// backend verbatim, so a `null` or missing `content` (as on assistant
/// tool-call turns) and extra keys such as `images` survive untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct ChatMessage(serde_json::Map<String, serde_json::Value>);

/// The assistant message in a chat completion choice.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseMessage {
    pub role: String,
    pub content: String,
}

/// Body of POST /v1/chat/completions. Every field is optional; unknown fields
/// (temperature, stream, ...) are accepted and dropped.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ChatCompletionRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: String,
}

/// Body returned from POST /v1/chat/completions on success.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub model: String,
    pub choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    /// Wraps the backend's reply text as a single, finished assistant choice.
    pub fn from_reply(model: String, content: String) -> Self {
        ChatCompletionResponse {
            id: format!("{model}-proxy"),
            object: "chat.completion".into(),
            model,
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: "assistant".into(),
                    content,
                },
                finish_reason: "stop".into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_model_serializes_with_empty_permission() {
        let value = serde_json::to_value(Model::new("llama3")).unwrap();
        assert_eq!(
            value,
            json!({"id": "llama3", "object": "model", "owned_by": "ollama", "permission": []})
        );
    }

    #[test]
    fn test_chat_request_fields_are_optional() {
        let request: ChatCompletionRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.model.is_none());
        assert!(request.messages.is_none());

        let request: ChatCompletionRequest = serde_json::from_value(json!({
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "Hi"}],
            "temperature": 0.2,
            "stream": true
        }))
        .unwrap();
        assert_eq!(request.model.as_deref(), Some("gpt-4"));
        let messages = serde_json::to_value(request.messages.unwrap()).unwrap();
        assert_eq!(messages, json!([{"role": "user", "content": "Hi"}]));
    }

    #[rstest]
    #[case(json!({"role": "user", "content": "what is this?", "images": ["aGVsbG8="]}))]
    #[case(json!({"role": "assistant", "content": null, "tool_calls": [{"id": "call_1"}]}))]
    #[case(json!({"role": "user"}))]
    #[case(json!({"role": "user", "content": [{"type": "text", "text": "hi"}]}))]
    fn test_message_is_forwarded_verbatim(#[case] raw: serde_json::Value) {
        let message: ChatMessage = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&message).unwrap(), raw);
    }

    #[test]
    fn test_response_from_reply() {
        let response = ChatCompletionResponse::from_reply("llama3".into(), "Hello!".into());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "id": "llama3-proxy",
                "object": "chat.completion",
                "model": "llama3",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hello!"},
                    "finish_reason": "stop"
                }]
            })
        );
    }
}
