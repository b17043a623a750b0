use serde::Serialize;

use super::{OracleRequest, ORACLE_MAX_TOKENS, ORACLE_TEMPERATURE};
use crate::matching::domain::{Homeowner, NormalizedContractor, SubScores};

pub const SYSTEM_INSTRUCTION: &str =
    "You are an expert contractor matching system. Always respond with valid JSON only.";

/// Maximum adjustment the oracle may apply to a pre-computed weighted score.
const SCORE_ADJUSTMENT_POINTS: u8 = 5;

/// Candidate fields shared with the oracle. Licenses and service area stay local.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSnapshot<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub vertical: &'a str,
    pub years_in_business: u32,
    pub rating: f64,
    pub review_count: u32,
    pub pricing_band: &'a str,
    pub flags: &'a [String],
    pub weighted_score: f64,
    pub normalized_scores: SubScores,
}

impl<'a> From<&'a NormalizedContractor> for CandidateSnapshot<'a> {
    fn from(candidate: &'a NormalizedContractor) -> Self {
        let contractor = &candidate.contractor;
        Self {
            id: &contractor.id,
            name: &contractor.name,
            vertical: &contractor.vertical,
            years_in_business: contractor.years_in_business,
            rating: contractor.rating,
            review_count: contractor.review_count,
            pricing_band: &contractor.pricing_band,
            flags: &contractor.flags,
            weighted_score: candidate.weighted_score,
            normalized_scores: candidate.normalized_scores,
        }
    }
}

/// Render the ranking instruction for the candidate set.
pub fn build_request(
    candidates: &[NormalizedContractor],
    homeowner: &Homeowner,
) -> Result<OracleRequest, serde_json::Error> {
    let snapshots: Vec<CandidateSnapshot<'_>> = candidates.iter().map(Into::into).collect();
    let candidate_json = serde_json::to_string_pretty(&snapshots)?;
    let weights = &homeowner.weights;

    let prompt = format!(
        "Rank the contractors below for this homeowner and return the best 3 matches \
         with a trust score (0-100) and a one-line reason for each.

Homeowner
- City: {city}
- Project type: {project_type}
- Notes: {notes}
- Weights: experience {experience}, reviews {reviews}, rating {rating}, price {price}, speed {speed}

Candidates (weighted_score is already computed from the weights):
{candidate_json}

Instructions
1. Choose exactly 3 of the candidates above.
2. Start from each weighted_score and adjust it by at most {SCORE_ADJUSTMENT_POINTS} points \
   up or down based on qualitative factors such as flags and the homeowner notes.
3. Keep every trust_score between 0 and 100.
4. Give a single-line reason for each pick.

Respond with ONLY a JSON object. No prose, no markdown, no code fences.
Format: {{\"top3\":[{{\"id\":\"c1\",\"name\":\"Contractor Name\",\"trust_score\":85.5,\"reason\":\"One-line explanation\"}}]}}",
        city = homeowner.city,
        project_type = homeowner.project_type,
        notes = homeowner.notes,
        experience = weights.experience,
        reviews = weights.reviews,
        rating = weights.rating,
        price = weights.price,
        speed = weights.speed,
    );

    Ok(OracleRequest {
        system: SYSTEM_INSTRUCTION.to_string(),
        prompt,
        temperature: ORACLE_TEMPERATURE,
        max_tokens: ORACLE_MAX_TOKENS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::fixtures::{default_homeowner, sample_contractors};
    use crate::matching::normalizer::normalize;

    #[test]
    fn prompt_embeds_homeowner_and_candidate_snapshot() {
        let homeowner = default_homeowner();
        let candidates: Vec<_> = sample_contractors()
            .iter()
            .take(2)
            .map(|c| normalize(c, &homeowner.weights))
            .collect();

        let request = build_request(&candidates, &homeowner).expect("prompt renders");

        assert_eq!(request.system, SYSTEM_INSTRUCTION);
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_tokens, 1000);
        assert!(request.prompt.contains("- City: Salt Lake City"));
        assert!(request.prompt.contains("- Project type: roofing"));
        assert!(request.prompt.contains(&homeowner.notes));
        assert!(request
            .prompt
            .contains("experience 0.4, reviews 0.25, rating 0.2, price 0.1, speed 0.05"));
        assert!(request.prompt.contains("\"id\": \"c1\""));
        assert!(request.prompt.contains("\"normalized_scores\""));
        assert!(request.prompt.contains("\"weighted_score\""));
        assert!(!request.prompt.contains("UT-ROOF-44121"));
        assert!(request.prompt.contains("at most 5 points"));
        assert!(request.prompt.contains("{\"top3\":["));
        assert!(request.prompt.contains("\n\nInstructions\n1. Choose exactly 3"));
        assert!(request.prompt.ends_with("\"reason\":\"One-line explanation\"}]}"));
    }
}
