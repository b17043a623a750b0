use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{OracleError, OracleRequest, RankingOracle};
use crate::config::OracleConfig;

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiOracle {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for OpenAiOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiOracle")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiOracle {
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &OracleConfig) -> Result<Option<Self>, OracleError> {
        let Some(api_key) = config.credential() else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| OracleError::Transport(err.to_string()))?;

        Ok(Some(Self {
            client,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
        }))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[async_trait]
impl RankingOracle for OpenAiOracle {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &raw));
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(map_transport_error)?;
        debug!(choices = completion.choices.len(), "oracle completion received");

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(OracleError::EmptyResponse)
    }
}

fn map_transport_error(err: reqwest::Error) -> OracleError {
    if err.is_timeout() {
        OracleError::Timeout
    } else {
        OracleError::Transport(err.to_string())
    }
}

/// Sort a non-success response into the oracle failure sub-kinds.
fn classify_failure(status: StatusCode, raw_body: &str) -> OracleError {
    let detail = serde_json::from_str::<ErrorEnvelope>(raw_body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_default();
    let message = if detail.message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        detail.message.clone()
    };

    let mentions_quota = [detail.code.as_deref(), detail.kind.as_deref()]
        .into_iter()
        .flatten()
        .any(|tag| tag == "insufficient_quota" || tag.contains("billing"))
        || {
            let lowered = message.to_ascii_lowercase();
            lowered.contains("quota") || lowered.contains("billing")
        };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => OracleError::Authentication(message),
        StatusCode::PAYMENT_REQUIRED => OracleError::QuotaExceeded(message),
        _ if mentions_quota => OracleError::QuotaExceeded(message),
        StatusCode::TOO_MANY_REQUESTS => OracleError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => OracleError::Timeout,
        _ => OracleError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}
