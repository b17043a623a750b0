use crate::infra::{load_contractors, matching_service, override_weights, parse_weight};
use clap::Args;
use contractor_match::config::AppConfig;
use contractor_match::error::AppError;
use contractor_match::matching::fixtures::default_homeowner;
use contractor_match::matching::{
    prepare_candidates, NormalizedContractor, ScoreRequest, ScoreResponse,
};
use contractor_match::telemetry;
use std::path::PathBuf;

/// Homeowner profile and contractor source shared by the CLI commands.
#[derive(Args, Debug, Default)]
pub(crate) struct ProfileArgs {
    /// JSON file holding an array of contractors (defaults to the bundled sample set)
    #[arg(long)]
    pub(crate) contractors: Option<PathBuf>,
    /// Project type used for relevance filtering (defaults to roofing)
    #[arg(long)]
    pub(crate) project_type: Option<String>,
    /// Homeowner city passed to the oracle as context
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Free-text notes passed to the oracle verbatim
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// Weight for years in business
    #[arg(long, value_parser = parse_weight)]
    pub(crate) experience: Option<f64>,
    /// Weight for review volume
    #[arg(long, value_parser = parse_weight)]
    pub(crate) reviews: Option<f64>,
    /// Weight for star rating
    #[arg(long, value_parser = parse_weight)]
    pub(crate) rating: Option<f64>,
    /// Weight for affordability
    #[arg(long, value_parser = parse_weight)]
    pub(crate) price: Option<f64>,
    /// Weight for availability
    #[arg(long, value_parser = parse_weight)]
    pub(crate) speed: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CandidatesArgs {
    #[command(flatten)]
    pub(crate) profile: ProfileArgs,
    /// Print the sub-score breakdown for each candidate
    #[arg(long)]
    pub(crate) breakdown: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    #[command(flatten)]
    pub(crate) profile: ProfileArgs,
    /// Emit the response as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

fn build_request(profile: ProfileArgs) -> Result<ScoreRequest, AppError> {
    let ProfileArgs {
        contractors,
        project_type,
        city,
        notes,
        experience,
        reviews,
        rating,
        price,
        speed,
    } = profile;

    let mut homeowner = default_homeowner();
    if let Some(project_type) = project_type {
        homeowner.project_type = project_type;
    }
    if let Some(city) = city {
        homeowner.city = city;
    }
    if let Some(notes) = notes {
        homeowner.notes = notes;
    }
    homeowner.weights = override_weights(
        homeowner.weights,
        experience,
        reviews,
        rating,
        price,
        speed,
    );

    Ok(ScoreRequest {
        homeowner,
        contractors: load_contractors(contractors.as_deref())?,
    })
}

pub(crate) fn run_candidates(args: CandidatesArgs) -> Result<(), AppError> {
    let CandidatesArgs { profile, breakdown } = args;
    let request = build_request(profile)?;
    let candidates = prepare_candidates(&request)?;

    render_candidates(&request, &candidates, breakdown);
    Ok(())
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { profile, json } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let request = build_request(profile)?;
    let service = matching_service(&config.oracle)?;
    let response = service.score(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        render_matches(&response);
    }
    Ok(())
}

fn render_candidates(request: &ScoreRequest, candidates: &[NormalizedContractor], breakdown: bool) {
    let homeowner = &request.homeowner;
    let weights = &homeowner.weights;

    println!("Candidate set for {} ({})", homeowner.project_type, homeowner.city);
    println!(
        "Weights: experience {} | reviews {} | rating {} | price {} | speed {} (sum {:.2})",
        weights.experience,
        weights.reviews,
        weights.rating,
        weights.price,
        weights.speed,
        weights.total()
    );
    println!(
        "{} of {} contractors eligible\n",
        candidates.len(),
        request.contractors.len()
    );

    for (rank, candidate) in candidates.iter().enumerate() {
        let contractor = &candidate.contractor;
        println!(
            "{}. {} [{}] {} | weighted {:.2}",
            rank + 1,
            contractor.name,
            contractor.id,
            contractor.vertical,
            candidate.weighted_score
        );
        if breakdown {
            let scores = &candidate.normalized_scores;
            println!(
                "   experience {:.1} | reviews {:.1} | rating {:.1} | price {:.1} | speed {:.1}",
                scores.experience, scores.reviews, scores.rating, scores.price, scores.speed
            );
        }
    }
}

fn render_matches(response: &ScoreResponse) {
    println!("Top matches");
    for (rank, matched) in response.top3.iter().enumerate() {
        println!(
            "{}. {} [{}] trust {:.1}",
            rank + 1,
            matched.name,
            matched.id,
            matched.trust_score
        );
        println!("   {}", matched.reason);
    }
    println!(
        "\nmodel {} | temperature {} | {} ms",
        response.meta.model, response.meta.temperature, response.meta.elapsed_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_request_applies_overrides() {
        let profile = ProfileArgs {
            project_type: Some("plumbing".to_string()),
            notes: Some("Need it done this week".to_string()),
            speed: Some(0.6),
            ..ProfileArgs::default()
        };

        let request = build_request(profile).expect("request builds");
        assert_eq!(request.homeowner.project_type, "plumbing");
        assert_eq!(request.homeowner.city, "Salt Lake City");
        assert_eq!(request.homeowner.weights.speed, 0.6);
        assert_eq!(request.homeowner.weights.experience, 0.4);
        assert_eq!(request.contractors.len(), 5);
    }

    #[test]
    fn candidates_command_keeps_handyman_for_other_trades() {
        let args = CandidatesArgs {
            profile: ProfileArgs {
                project_type: Some("plumbing".to_string()),
                ..ProfileArgs::default()
            },
            breakdown: true,
        };
        assert!(run_candidates(args).is_ok(), "handyman keeps plumbing eligible");
    }
}
