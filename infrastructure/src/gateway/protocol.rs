//! OpenAI-compatible chat-completion wire types

use magi_application::GatewayError;
use serde::Deserialize;

/// Provider error text longer than this is cut before it reaches the user
const MAX_ERROR_LEN: usize = 300;

/// `{"choices":[{"message":{"content":"..."}}]}`
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// Error bodies seen across providers:
/// `{"error":{"message":".."}}`, `{"error":".."}` and `{"message":".."}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Object { message: String },
    Text(String),
}

/// Pull the first choice's content out of a successful response body.
pub fn extract_content(body: &str) -> Result<String, GatewayError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::InvalidResponse(format!("malformed completion: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| GatewayError::InvalidResponse("response has no message content".to_string()))
}

/// Human-readable message for a non-2xx response body.
pub fn error_message(body: &str) -> String {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| match envelope.error {
            Some(ErrorDetail::Object { message }) | Some(ErrorDetail::Text(message)) => {
                Some(message)
            }
            None => envelope.message,
        })
        .unwrap_or_else(|| body.trim().to_string());

    shorten(&message)
}

fn shorten(message: &str) -> String {
    if message.len() <= MAX_ERROR_LEN {
        return message.to_string();
    }
    let mut end = MAX_ERROR_LEN;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &message[..end])
}
