//! HTTP gateway for OpenAI-compatible chat-completion endpoints

use super::protocol::{error_message, extract_content};
use async_trait::async_trait;
use magi_application::{GatewayError, LlmGateway};
use magi_domain::{ChatRequest, ProviderConfig};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Talks to any provider in the endpoint table over HTTPS.
///
/// The per-request deadline is enforced here as well as by the use case,
/// so a stalled connection never outlives the configured timeout.
pub struct HttpLlmGateway {
    client: Client,
}

impl HttpLlmGateway {
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Use a preconfigured client (proxies, custom TLS)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn map_send_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(error.to_string())
    }
}

#[async_trait]
impl LlmGateway for HttpLlmGateway {
    async fn complete(
        &self,
        config: &ProviderConfig,
        request: &ChatRequest,
    ) -> Result<String, GatewayError> {
        let endpoint = config.endpoint();
        debug!(
            provider = %config.provider,
            endpoint = %endpoint,
            model = %request.model,
            "Sending chat request"
        );

        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", config.api_key))
            .json(request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_send_error)?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(provider = %config.provider, status = status.as_u16(), error = %message, "Provider returned an error");
            return Err(GatewayError::Http {
                status: status.as_u16(),
                message,
            });
        }

        extract_content(&body)
    }
}
