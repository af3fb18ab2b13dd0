//! Error taxonomy for the decision pipeline.
//!
//! Transport failures from the [`LlmGateway`](crate::ports::llm_gateway::LlmGateway)
//! are categorized into [`MagiError`] so the retry wrapper can tell transient
//! failures from fatal ones, and the UI can show a sentence the user can act on.

use crate::ports::llm_gateway::GatewayError;
use magi_domain::DomainError;
use thiserror::Error;

/// Sub-classification of provider API failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// HTTP 429
    RateLimit,
    /// HTTP 5xx
    ServerError,
    Other,
}

impl ApiErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorCode::RateLimit => "RATE_LIMIT",
            ApiErrorCode::ServerError => "SERVER_ERROR",
            ApiErrorCode::Other => "API_ERROR",
        }
    }
}

/// Coarse error category, as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    Api,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Network => "network",
            ErrorKind::Api => "api",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// Errors surfaced by the decision pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MagiError {
    /// Missing or rejected credentials; never retried
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connectivity failure or timeout; always retried
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({}): {message}", .code.as_str())]
    Api {
        code: ApiErrorCode,
        status: Option<u16>,
        message: String,
    },

    /// Another question is already being processed by this instance
    #[error("A question is already being processed")]
    Busy,

    #[error("Request cancelled")]
    Cancelled,
}

impl MagiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MagiError::Config(_) => ErrorKind::Config,
            MagiError::Network(_) => ErrorKind::Network,
            MagiError::Api { .. } => ErrorKind::Api,
            MagiError::Busy | MagiError::Cancelled => ErrorKind::Unknown,
        }
    }

    /// Whether the retry wrapper should try again
    pub fn is_retryable(&self) -> bool {
        match self {
            MagiError::Network(_) => true,
            MagiError::Api { code, .. } => {
                matches!(code, ApiErrorCode::RateLimit | ApiErrorCode::ServerError)
            }
            MagiError::Config(_) | MagiError::Busy | MagiError::Cancelled => false,
        }
    }

    /// A sentence telling the user what to do about this error
    pub fn user_message(&self) -> String {
        match self {
            MagiError::Config(_) => {
                "Configuration problem: check your provider settings and API key.".to_string()
            }
            MagiError::Network(_) => {
                "Network problem: check your connection and try again.".to_string()
            }
            MagiError::Api {
                code: ApiErrorCode::RateLimit,
                ..
            } => "Too many requests: the provider is rate limiting, retry later.".to_string(),
            MagiError::Api {
                code: ApiErrorCode::ServerError,
                ..
            } => "The provider is having trouble right now, retry later.".to_string(),
            MagiError::Api { message, .. } => format!("The provider rejected the request: {}", message),
            MagiError::Busy => {
                "MAGI is still deliberating; wait for the current question to finish.".to_string()
            }
            MagiError::Cancelled => "The request was cancelled.".to_string(),
        }
    }

    /// Short diagnostic stored in a failed persona's verdict
    pub fn diagnostic(&self) -> String {
        match self {
            MagiError::Network(message) => format!("Fetch Error: {}", message),
            other => format!("API Error: {}", other),
        }
    }

    /// Suggested remedy shown by the health check
    pub fn suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Config => "Set an API key with --config, [provider].api_key or MAGI_API_KEY.",
            ErrorKind::Network => "Check network access to the provider endpoint.",
            ErrorKind::Api => "Check the model name and the provider's service status.",
            ErrorKind::Unknown => "Try again.",
        }
    }
}

impl From<GatewayError> for MagiError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Http { status, message } => match status {
                401 | 403 => MagiError::Config(format!("HTTP {}: {}", status, message)),
                408 => MagiError::Network(format!("HTTP 408: {}", message)),
                429 => MagiError::Api {
                    code: ApiErrorCode::RateLimit,
                    status: Some(status),
                    message,
                },
                500..=599 => MagiError::Api {
                    code: ApiErrorCode::ServerError,
                    status: Some(status),
                    message,
                },
                _ => MagiError::Api {
                    code: ApiErrorCode::Other,
                    status: Some(status),
                    message,
                },
            },
            GatewayError::Network(message) => MagiError::Network(message),
            GatewayError::Timeout => MagiError::Network("request timed out".to_string()),
            GatewayError::InvalidResponse(message) => MagiError::Api {
                code: ApiErrorCode::Other,
                status: None,
                message,
            },
        }
    }
}

impl From<DomainError> for MagiError {
    fn from(error: DomainError) -> Self {
        MagiError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> MagiError {
        GatewayError::Http {
            status,
            message: "boom".to_string(),
        }
        .into()
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(http(401).kind(), ErrorKind::Config);
        assert_eq!(http(403).kind(), ErrorKind::Config);
        assert_eq!(http(408).kind(), ErrorKind::Network);
        assert!(matches!(
            http(429),
            MagiError::Api {
                code: ApiErrorCode::RateLimit,
                status: Some(429),
                ..
            }
        ));
        assert!(matches!(
            http(503),
            MagiError::Api {
                code: ApiErrorCode::ServerError,
                ..
            }
        ));
        assert!(matches!(
            http(400),
            MagiError::Api {
                code: ApiErrorCode::Other,
                ..
            }
        ));
    }

    #[test]
    fn test_retryable() {
        assert!(http(429).is_retryable());
        assert!(http(500).is_retryable());
        assert!(http(408).is_retryable());
        assert!(MagiError::from(GatewayError::Timeout).is_retryable());
        assert!(MagiError::Network("reset".to_string()).is_retryable());

        assert!(!http(401).is_retryable());
        assert!(!http(404).is_retryable());
        assert!(!MagiError::Busy.is_retryable());
        assert!(!MagiError::Cancelled.is_retryable());
    }

    #[test]
    fn test_user_message() {
        assert!(http(429).user_message().contains("retry later"));
        assert!(http(401).user_message().contains("check your provider settings"));
        assert!(MagiError::Network("x".to_string()).user_message().contains("connection"));
    }

    #[test]
    fn test_diagnostic_prefix() {
        assert_eq!(
            MagiError::Network("connection reset".to_string()).diagnostic(),
            "Fetch Error: connection reset"
        );
        assert!(http(500).diagnostic().starts_with("API Error: "));
    }

    #[test]
    fn test_domain_error_is_config() {
        let error: MagiError = DomainError::InvalidConfig("API key is not set".to_string()).into();
        assert_eq!(error.kind(), ErrorKind::Config);
    }
}
