use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::domain::{NormalizedContractor, ScoreMeta, ScoreRequest, ScoreResponse};
use super::extract::{extract_top3, ExtractError};
use super::filter::filter_relevant;
use super::normalizer::normalize;
use super::oracle::{build_request, OracleError, RankingOracle, ORACLE_TEMPERATURE};
use super::selector::select_candidates;

/// Runs one scoring request end to end: filter, normalize, select, rank, extract.
///
/// Holds no per-request state, so a single instance is shared across handlers.
pub struct MatchingService<O> {
    oracle: Option<Arc<O>>,
}

impl<O> MatchingService<O>
where
    O: RankingOracle + 'static,
{
    /// `None` means no oracle credential is configured; every score call will fail fast.
    pub fn new(oracle: Option<Arc<O>>) -> Self {
        Self { oracle }
    }

    pub fn is_configured(&self) -> bool {
        self.oracle.is_some()
    }

    pub fn ensure_configured(&self) -> Result<&O, MatchError> {
        self.oracle.as_deref().ok_or(MatchError::OracleNotConfigured)
    }

    /// Score an untyped request body, validating its shape after the credential check.
    pub async fn score_payload(&self, payload: Value) -> Result<ScoreResponse, MatchError> {
        let started = Instant::now();
        let oracle = self.ensure_configured()?;
        let request = parse_request(payload)?;
        rank(oracle, request, started).await
    }

    pub async fn score(&self, request: ScoreRequest) -> Result<ScoreResponse, MatchError> {
        let started = Instant::now();
        let oracle = self.ensure_configured()?;
        rank(oracle, request, started).await
    }
}

pub fn parse_request(payload: Value) -> Result<ScoreRequest, MatchError> {
    serde_json::from_value(payload).map_err(|err| {
        warn!(error = %err, "rejecting malformed score request");
        MatchError::InvalidRequest {
            detail: err.to_string(),
        }
    })
}

/// The deterministic stage: everything that happens before the oracle is consulted.
pub fn prepare_candidates(request: &ScoreRequest) -> Result<Vec<NormalizedContractor>, MatchError> {
    let homeowner = &request.homeowner;
    let relevant = filter_relevant(&request.contractors, &homeowner.project_type);
    debug!(
        project_type = %homeowner.project_type,
        submitted = request.contractors.len(),
        relevant = relevant.len(),
        "filtered contractors"
    );

    if relevant.is_empty() {
        return Err(MatchError::NoEligibleContractors {
            project_type: homeowner.project_type.clone(),
        });
    }

    let normalized = relevant
        .into_iter()
        .map(|contractor| normalize(contractor, &homeowner.weights))
        .collect();

    Ok(select_candidates(normalized))
}

async fn rank<O>(
    oracle: &O,
    request: ScoreRequest,
    started: Instant,
) -> Result<ScoreResponse, MatchError>
where
    O: RankingOracle + ?Sized,
{
    info!(
        project_type = %request.homeowner.project_type,
        contractors = request.contractors.len(),
        "scoring request received"
    );

    let candidates = prepare_candidates(&request)?;
    let candidate_ids: Vec<&str> = candidates
        .iter()
        .map(|candidate| candidate.contractor.id.as_str())
        .collect();
    debug!(?candidate_ids, "candidate set selected");

    let oracle_request = build_request(&candidates, &request.homeowner)?;

    info!(model = oracle.model(), candidates = candidates.len(), "calling ranking oracle");
    let raw_text = oracle.complete(&oracle_request).await?;
    debug!(raw = %raw_text, "oracle response text");

    let top3 = extract_top3(&raw_text)?;
    if top3.len() < 3 {
        warn!(returned = top3.len(), "oracle returned fewer than 3 matches");
    }

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(elapsed_ms, matches = top3.len(), "scoring request completed");

    Ok(ScoreResponse {
        top3,
        meta: ScoreMeta {
            model: oracle.model().to_string(),
            temperature: ORACLE_TEMPERATURE,
            elapsed_ms,
        },
    })
}

/// Terminal failure of a scoring request.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("ranking oracle API key is not configured; set OPENAI_API_KEY")]
    OracleNotConfigured,
    #[error("Invalid request format. Expected homeowner and contractors array.")]
    InvalidRequest { detail: String },
    #[error("No contractors found for the specified project type.")]
    NoEligibleContractors { project_type: String },
    #[error("unable to render oracle prompt: {0}")]
    Prompt(#[from] serde_json::Error),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}
