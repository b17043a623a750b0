use super::domain::NormalizedContractor;

/// Upper bound on how many contractors are sent to the oracle.
pub const CANDIDATE_LIMIT: usize = 5;

/// Order by weighted score, best first, and keep at most [`CANDIDATE_LIMIT`].
///
/// The sort is stable, so contractors with equal scores keep their input order.
pub fn select_candidates(mut normalized: Vec<NormalizedContractor>) -> Vec<NormalizedContractor> {
    normalized.sort_by(|a, b| b.weighted_score.total_cmp(&a.weighted_score));
    normalized.truncate(CANDIDATE_LIMIT);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::{Contractor, SubScores};

    fn scored(id: &str, weighted_score: f64) -> NormalizedContractor {
        NormalizedContractor {
            contractor: Contractor {
                id: id.to_string(),
                name: id.to_uppercase(),
                vertical: "roofing".to_string(),
                years_in_business: 1,
                rating: 3.0,
                review_count: 1,
                service_area: String::new(),
                pricing_band: String::new(),
                licenses: Vec::new(),
                flags: Vec::new(),
            },
            normalized_scores: SubScores {
                experience: 0.0,
                reviews: 0.0,
                rating: 0.0,
                price: 0.0,
                speed: 0.0,
            },
            weighted_score,
        }
    }

    fn ids(selected: &[NormalizedContractor]) -> Vec<&str> {
        selected.iter().map(|c| c.contractor.id.as_str()).collect()
    }

    #[test]
    fn caps_at_five_in_descending_order() {
        let pool = vec![
            scored("a", 10.0),
            scored("b", 70.0),
            scored("c", 40.0),
            scored("d", 90.0),
            scored("e", 20.0),
            scored("f", 55.0),
            scored("g", 5.0),
        ];

        let selected = select_candidates(pool);
        assert_eq!(selected.len(), CANDIDATE_LIMIT);
        assert_eq!(ids(&selected), vec!["d", "b", "f", "c", "e"]);
        assert!(selected
            .windows(2)
            .all(|pair| pair[0].weighted_score >= pair[1].weighted_score));
    }

    #[test]
    fn ties_keep_input_order() {
        let pool = vec![scored("x", 50.0), scored("y", 60.0), scored("z", 50.0)];
        assert_eq!(ids(&select_candidates(pool)), vec!["y", "x", "z"]);
    }

    #[test]
    fn passes_through_short_lists() {
        let pool = vec![scored("only", 12.0), scored("other", 30.0)];
        assert_eq!(ids(&select_candidates(pool)), vec!["other", "only"]);
        assert!(select_candidates(Vec::new()).is_empty());
    }
}
