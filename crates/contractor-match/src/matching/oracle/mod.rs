//! Client side of the external ranking oracle.
//!
//! The pipeline only depends on [`RankingOracle`]; the OpenAI-compatible HTTP
//! client is one implementation and tests substitute their own.

mod openai;
mod prompt;

pub use openai::OpenAiOracle;
pub use prompt::{build_request, CandidateSnapshot, SYSTEM_INSTRUCTION};

use async_trait::async_trait;

/// Sampling temperature used for every ranking call.
pub const ORACLE_TEMPERATURE: f32 = 0.2;
/// Output budget for the oracle completion.
pub const ORACLE_MAX_TOKENS: u32 = 1000;

/// A single instruction + prompt pair to send to the oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Text-completion service used to re-rank the candidate set.
#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Model identifier reported back in response metadata.
    fn model(&self) -> &str;

    /// Issue one completion call. Implementations must not retry.
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError>;
}

/// Failure reported by the oracle transport.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle rejected the API key (authentication failed): {0}")]
    Authentication(String),
    #[error("oracle rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("oracle quota exceeded, check billing: {0}")]
    QuotaExceeded(String),
    #[error("oracle call timed out")]
    Timeout,
    #[error("no response from oracle")]
    EmptyResponse,
    #[error("oracle returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("oracle transport failed: {0}")]
    Transport(String),
}
