//! The Ollama backend: where it lives, and the shape of its native API.
//!
//! Only the fields the translator reads are modelled. Anything else Ollama
//! sends back (sizes, digests, timings) is ignored during deserialization.
use bon::Builder;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::ChatMessage;

/// Path of the backend's model listing endpoint.
pub const TAGS_PATH: &str = "api/tags";

/// Path of the backend's chat endpoint.
pub const CHAT_PATH: &str = "api/chat";

/// The identifier reported as `owned_by` for every model the backend serves.
pub const BACKEND_OWNER: &str = "ollama";

/// Content used when the backend reply has no `message.content`.
pub const DEFAULT_CONTENT: &str = "";

/// Where requests are forwarded, and which model to use when the client
/// doesn't name one.
#[derive(Debug, Clone, Builder)]
pub struct Backend {
    pub base_url: Url,
    #[builder(into)]
    pub default_model: String,
}

impl Backend {
    /// Joins `path` onto the base URL, keeping any path prefix the base URL
    /// already carries (e.g. `http://gpu-box/ollama`).
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Derived struct deserializers also accept JSON arrays, matching elements to
/// fields by position. Backend bodies are objects, so each wire type decodes a
/// map first and then its field-for-field mirror.
type JsonObject = serde_json::Map<String, serde_json::Value>;

macro_rules! object_only {
    ($name:ident via $raw:ident { $($field:ident),+ $(,)? }) => {
        impl TryFrom<JsonObject> for $name {
            type Error = serde_json::Error;

            fn try_from(object: JsonObject) -> Result<Self, Self::Error> {
                let raw: $raw = serde_json::from_value(serde_json::Value::Object(object))?;
                Ok($name { $($field: raw.$field),+ })
            }
        }
    };
}

/// Response body of `GET /api/tags`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "JsonObject")]
pub struct TagsResponse {
    pub models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct RawTagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

object_only!(TagsResponse via RawTagsResponse { models });

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "JsonObject")]
pub struct TagEntry {
    pub name: String,
}

#[derive(Deserialize)]
struct RawTagEntry {
    name: String,
}

object_only!(TagEntry via RawTagEntry { name });

/// Request body of `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct BackendChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
}

/// Response body of a non-streaming `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "JsonObject")]
pub struct BackendChatResponse {
    pub message: Option<BackendMessage>,
}

#[derive(Deserialize)]
struct RawBackendChatResponse {
    #[serde(default)]
    message: Option<BackendMessage>,
}

object_only!(BackendChatResponse via RawBackendChatResponse { message });

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "JsonObject")]
pub struct BackendMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
struct RawBackendMessage {
    #[serde(default)]
    content: Option<String>,
}

object_only!(BackendMessage via RawBackendMessage { content });

impl BackendChatResponse {
    /// The assistant's reply text, or [`DEFAULT_CONTENT`] when the backend
    /// omitted the message or its content.
    pub fn into_content(self) -> String {
        self.message
            .and_then(|message| message.content)
            .unwrap_or_else(|| DEFAULT_CONTENT.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("http://localhost:11434", "http://localhost:11434/api/tags")]
    #[case("http://localhost:11434/", "http://localhost:11434/api/tags")]
    #[case("http://gpu-box/ollama", "http://gpu-box/ollama/api/tags")]
    #[case("http://gpu-box/ollama/", "http://gpu-box/ollama/api/tags")]
    fn test_endpoint_joins_base_url(#[case] base: &str, #[case] expected: &str) {
        let backend = Backend::builder()
            .base_url(base.parse().unwrap())
            .default_model("llama3")
            .build();
        assert_eq!(backend.endpoint(TAGS_PATH), expected);
    }

    #[rstest]
    #[case(json!({"message": {"role": "assistant", "content": "hi"}}), "hi")]
    #[case(json!({"message": {"role": "assistant"}}), "")]
    #[case(json!({"message": {"content": null}}), "")]
    #[case(json!({"done": true}), "")]
    fn test_reply_content_defaults(#[case] body: serde_json::Value, #[case] expected: &str) {
        let reply: BackendChatResponse = serde_json::from_value(body).unwrap();
        assert_eq!(reply.into_content(), expected);
    }

    #[test]
    fn test_tags_ignore_extra_fields_and_default_missing_models() {
        let tags: TagsResponse = serde_json::from_value(json!({
            "models": [{"name": "llama3:8b", "size": 4661224676u64, "digest": "abc"}]
        }))
        .unwrap();
        assert_eq!(tags.models.len(), 1);
        assert_eq!(tags.models[0].name, "llama3:8b");

        let tags: TagsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(tags.models.is_empty());
    }

    #[test]
    fn test_tag_entry_without_name_is_rejected() {
        let result = serde_json::from_value::<TagsResponse>(json!({"models": [{"size": 1}]}));
        assert!(result.is_err());
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!([[{"name": "x"}]]))]
    #[case(json!({"models": [["x"]]}))]
    fn test_tags_must_be_objects(#[case] body: serde_json::Value) {
        assert!(serde_json::from_value::<TagsResponse>(body).is_err());
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!([{"content": "hi"}]))]
    #[case(json!({"message": ["hi"]}))]
    fn test_chat_reply_must_be_objects(#[case] body: serde_json::Value) {
        assert!(serde_json::from_value::<BackendChatResponse>(body).is_err());
    }

    #[test]
    fn test_chat_request_disables_streaming() {
        let messages: Vec<ChatMessage> =
            serde_json::from_value(json!([{"role": "user", "content": "Hello"}])).unwrap();
        let body = serde_json::to_value(BackendChatRequest {
            model: "llama3",
            messages: &messages,
            stream: false,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "model": "llama3",
                "messages": [{"role": "user", "content": "Hello"}],
                "stream": false
            })
        );
    }
}
