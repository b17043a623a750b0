use serde::{Deserialize, Serialize};

/// Contractor record supplied by the caller or the bundled fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contractor {
    pub id: String,
    pub name: String,
    pub vertical: String,
    pub years_in_business: u32,
    pub rating: f64,
    pub review_count: u32,
    #[serde(default)]
    pub service_area: String,
    #[serde(default)]
    pub pricing_band: String,
    #[serde(default)]
    pub licenses: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

impl Contractor {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|candidate| candidate == flag)
    }
}

/// Relative importance of each scoring dimension. Not renormalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeownerWeights {
    pub experience: f64,
    pub reviews: f64,
    pub rating: f64,
    pub price: f64,
    pub speed: f64,
}

impl HomeownerWeights {
    pub fn total(&self) -> f64 {
        self.experience + self.reviews + self.rating + self.price + self.speed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Homeowner {
    #[serde(default)]
    pub city: String,
    pub project_type: String,
    #[serde(default)]
    pub notes: String,
    pub weights: HomeownerWeights,
}

/// Per-dimension scores, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub experience: f64,
    pub reviews: f64,
    pub rating: f64,
    pub price: f64,
    pub speed: f64,
}

impl SubScores {
    pub fn weighted(&self, weights: &HomeownerWeights) -> f64 {
        self.experience * weights.experience
            + self.reviews * weights.reviews
            + self.rating * weights.rating
            + self.price * weights.price
            + self.speed * weights.speed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedContractor {
    #[serde(flatten)]
    pub contractor: Contractor,
    pub normalized_scores: SubScores,
    pub weighted_score: f64,
}

/// One oracle-ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorMatch {
    pub id: String,
    pub name: String,
    pub trust_score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub homeowner: Homeowner,
    pub contractors: Vec<Contractor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMeta {
    pub model: String,
    pub temperature: f32,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub top3: Vec<ContractorMatch>,
    pub meta: ScoreMeta,
}
