//! Contractor matching pipeline.
//!
//! Raw contractors are filtered by project type, normalized into 0-100
//! sub-scores, cut down to the best candidates by weighted score, and then
//! handed to an external ranking oracle whose reply is parsed into the final
//! top 3.

pub mod domain;
pub mod extract;
pub mod filter;
pub mod fixtures;
pub mod normalizer;
pub mod oracle;
pub mod router;
pub mod selector;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Contractor, ContractorMatch, Homeowner, HomeownerWeights, NormalizedContractor, ScoreMeta,
    ScoreRequest, ScoreResponse, SubScores,
};
pub use extract::{extract_top3, ExtractError};
pub use filter::filter_relevant;
pub use normalizer::normalize;
pub use oracle::{OpenAiOracle, OracleError, OracleRequest, RankingOracle};
pub use router::matching_router;
pub use selector::{select_candidates, CANDIDATE_LIMIT};
pub use service::{prepare_candidates, MatchError, MatchingService};
