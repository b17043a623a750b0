//! Bundled sample data used by the form defaults, the CLI and tests.

use super::domain::{Contractor, Homeowner, HomeownerWeights};

#[allow(clippy::too_many_arguments)]
fn contractor(
    id: &str,
    name: &str,
    vertical: &str,
    years_in_business: u32,
    rating: f64,
    review_count: u32,
    pricing_band: &str,
    license: &str,
    flags: &[&str],
) -> Contractor {
    Contractor {
        id: id.to_string(),
        name: name.to_string(),
        vertical: vertical.to_string(),
        years_in_business,
        rating,
        review_count,
        service_area: "Salt Lake City".to_string(),
        pricing_band: pricing_band.to_string(),
        licenses: vec![license.to_string()],
        flags: flags.iter().map(|flag| flag.to_string()).collect(),
    }
}

pub fn sample_contractors() -> Vec<Contractor> {
    vec![
        contractor(
            "c1",
            "NorthPeak Roofing",
            "roofing",
            18,
            4.7,
            312,
            "",
            "UT-ROOF-44121",
            &[],
        ),
        contractor(
            "c2",
            "Beehive Home Repair",
            "handyman",
            6,
            4.4,
            128,
            "$$",
            "UT-GEN-99812",
            &["limited_roofing_experience"],
        ),
        contractor(
            "c3",
            "Wasatch Elite Exteriors",
            "siding",
            12,
            4.8,
            205,
            "",
            "UT-EXT-77421",
            &["premium_pricing"],
        ),
        contractor(
            "c4",
            "Granite Peak Roofing Co.",
            "roofing",
            9,
            4.5,
            164,
            "$$",
            "UT-ROOF-55210",
            &[],
        ),
        contractor(
            "c5",
            "QuickFix Pros",
            "roofing",
            3,
            4.2,
            59,
            "$",
            "UT-ROOF-12003",
            &["newer_company"],
        ),
    ]
}

pub fn default_homeowner() -> Homeowner {
    Homeowner {
        city: "Salt Lake City".to_string(),
        project_type: "roofing".to_string(),
        notes: "I value experience and warranty over price. Prefer bids under 3 weeks."
            .to_string(),
        weights: HomeownerWeights {
            experience: 0.4,
            reviews: 0.25,
            rating: 0.2,
            price: 0.1,
            speed: 0.05,
        },
    }
}
