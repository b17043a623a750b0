use super::domain::{Contractor, HomeownerWeights, NormalizedContractor, SubScores};

const SCORE_CEILING: f64 = 100.0;
const UNKNOWN_PRICE_SCORE: f64 = 50.0;
const NEWER_COMPANY_FLAG: &str = "newer_company";

/// Project a contractor onto the five 0-100 sub-scores and weight them.
pub fn normalize(contractor: &Contractor, weights: &HomeownerWeights) -> NormalizedContractor {
    let normalized_scores = sub_scores(contractor);
    let weighted_score = normalized_scores.weighted(weights);

    NormalizedContractor {
        contractor: contractor.clone(),
        normalized_scores,
        weighted_score,
    }
}

pub fn sub_scores(contractor: &Contractor) -> SubScores {
    SubScores {
        experience: experience_score(contractor.years_in_business),
        reviews: reviews_score(contractor.review_count),
        rating: rating_score(contractor.rating),
        price: price_score(&contractor.pricing_band),
        speed: speed_score(contractor),
    }
}

/// Saturates at 20 years.
fn experience_score(years_in_business: u32) -> f64 {
    (f64::from(years_in_business) * 5.0).min(SCORE_CEILING)
}

/// Saturates at 500 reviews.
fn reviews_score(review_count: u32) -> f64 {
    (f64::from(review_count) / 5.0).min(SCORE_CEILING)
}

/// Maps the 1-5 star range onto 0-100; ratings outside the range saturate.
fn rating_score(rating: f64) -> f64 {
    if rating.is_nan() {
        return 0.0;
    }
    ((rating - 1.0) / 4.0 * SCORE_CEILING).clamp(0.0, SCORE_CEILING)
}

pub fn price_score(pricing_band: &str) -> f64 {
    match pricing_band {
        "$" => 100.0,
        "$$" => 75.0,
        "$$$" => 50.0,
        "$$$$" => 25.0,
        _ => UNKNOWN_PRICE_SCORE,
    }
}

// Availability proxy: newer firms have open calendars, long-tenured ones are booked out.
fn speed_score(contractor: &Contractor) -> f64 {
    if contractor.has_flag(NEWER_COMPANY_FLAG) {
        80.0
    } else if contractor.years_in_business > 15 {
        40.0
    } else {
        60.0
    }
}
