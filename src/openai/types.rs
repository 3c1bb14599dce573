//! Wire types for the chat-completions endpoint.
//!
//! Requests serialize to `{ model, messages: [{role, content}] }`. Responses are
//! deserialized leniently (every level optional) so that a body missing the
//! `choices[0].message.content` path can be reported as a shape failure rather
//! than a JSON error.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g. "gpt-3.5-turbo").
    pub model: String,
    /// Conversation messages, in order.
    pub messages: Vec<Message>,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// "system", "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Raw response body as returned by the endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    /// Kept as a raw value: the upstream may send `null` or a non-string here.
    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The text of the first choice, extracted from a well-shaped response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub model: Option<String>,
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Pulls `choices[0].message.content` out of the response.
    ///
    /// Returns a description of the first missing piece when the body does not
    /// have the expected shape.
    pub fn into_completion(self) -> Result<Completion, String> {
        let choice = self
            .choices
            .and_then(|choices| choices.into_iter().next())
            .ok_or_else(|| "response has no choices".to_string())?;
        let message = choice
            .message
            .ok_or_else(|| "first choice has no message".to_string())?;
        let content = match message.content {
            Some(serde_json::Value::String(text)) => text,
            Some(serde_json::Value::Null) | None => {
                return Err("message has no content".to_string());
            }
            Some(_) => return Err("message content is not a string".to_string()),
        };
        Ok(Completion {
            content,
            model: self.model,
            usage: self.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_to_api_format() {
        let req = ChatRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![Message::system("persona"), Message::user("task")],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "persona");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn completion_from_api_format() {
        let api_json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-3.5-turbo-0125",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"a\":1}"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
        }"#;
        let resp: ChatResponse = serde_json::from_str(api_json).unwrap();
        let completion = resp.into_completion().unwrap();
        assert_eq!(completion.content, r#"{"a":1}"#);
        assert_eq!(completion.model.as_deref(), Some("gpt-3.5-turbo-0125"));
        assert_eq!(completion.usage.unwrap().total_tokens, 21);
    }

    #[test]
    fn empty_choices_is_a_shape_failure() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(resp.into_completion().unwrap_err(), "response has no choices");
    }

    #[test]
    fn missing_choices_is_a_shape_failure() {
        let resp: ChatResponse = serde_json::from_str(r#"{"error": "nope"}"#).unwrap();
        assert!(resp.into_completion().is_err());
    }

    #[test]
    fn missing_message_is_a_shape_failure() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"finish_reason": "stop"}]}"#).unwrap();
        assert_eq!(
            resp.into_completion().unwrap_err(),
            "first choice has no message"
        );
    }

    #[test]
    fn null_or_non_string_content_is_a_shape_failure() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert_eq!(resp.into_completion().unwrap_err(), "message has no content");

        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": 42}}]}"#).unwrap();
        assert_eq!(
            resp.into_completion().unwrap_err(),
            "message content is not a string"
        );
    }
}
