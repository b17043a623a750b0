use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

use super::fixtures::{default_homeowner, sample_contractors};
use super::oracle::{OracleError, RankingOracle};
use super::service::{MatchError, MatchingService};

/// Router builder exposing the scoring pipeline and its sample data.
pub fn matching_router<O>(service: Arc<MatchingService<O>>) -> Router
where
    O: RankingOracle + 'static,
{
    Router::new()
        .route("/api/score", post(score_handler::<O>))
        .route("/api/v1/score", post(score_handler::<O>))
        .route("/api/contractors", get(sample_data_handler))
        .with_state(service)
}

pub(crate) async fn score_handler<O>(
    State(service): State<Arc<MatchingService<O>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    O: RankingOracle + 'static,
{
    let outcome = match payload {
        Ok(Json(body)) => service.score_payload(body).await,
        Err(rejection) => match service.ensure_configured() {
            Ok(_) => Err(MatchError::InvalidRequest {
                detail: rejection.body_text(),
            }),
            Err(err) => Err(err),
        },
    };

    match outcome {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn sample_data_handler() -> Json<Value> {
    Json(json!({
        "contractors": sample_contractors(),
        "default_homeowner": default_homeowner(),
    }))
}

pub fn status_for(err: &MatchError) -> StatusCode {
    match err {
        MatchError::InvalidRequest { .. } | MatchError::NoEligibleContractors { .. } => {
            StatusCode::BAD_REQUEST
        }
        MatchError::Oracle(OracleError::Authentication(_)) => StatusCode::UNAUTHORIZED,
        MatchError::Oracle(OracleError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
        MatchError::Oracle(OracleError::QuotaExceeded(_)) => StatusCode::PAYMENT_REQUIRED,
        MatchError::OracleNotConfigured
        | MatchError::Prompt(_)
        | MatchError::Oracle(_)
        | MatchError::Extract(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: MatchError) -> Response {
    let status = status_for(&err);
    let payload = match &err {
        MatchError::OracleNotConfigured => json!({
            "error": "OpenAI API key is not configured. Please set OPENAI_API_KEY environment variable.",
        }),
        MatchError::InvalidRequest { .. } | MatchError::NoEligibleContractors { .. } => json!({
            "error": err.to_string(),
        }),
        MatchError::Oracle(OracleError::Authentication(_)) => json!({
            "error": "Invalid OpenAI API key. Please check your configuration.",
        }),
        MatchError::Oracle(OracleError::RateLimited(_)) => json!({
            "error": "OpenAI API rate limit exceeded. Please try again later.",
        }),
        MatchError::Oracle(OracleError::QuotaExceeded(_)) => json!({
            "error": "OpenAI API quota exceeded. Please check your billing.",
        }),
        MatchError::Prompt(_) | MatchError::Oracle(_) | MatchError::Extract(_) => json!({
            "error": "Internal server error. Please try again later.",
            "details": err.to_string(),
        }),
    };

    if status.is_server_error() {
        error!(error = %err, "scoring request failed");
    }

    (status, Json(payload)).into_response()
}
