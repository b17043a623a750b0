use contractor_match::config::OracleConfig;
use contractor_match::error::AppError;
use contractor_match::matching::fixtures::sample_contractors;
use contractor_match::matching::{Contractor, HomeownerWeights, MatchingService, OpenAiOracle};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) oracle: OracleStatus,
}

/// What the status probe reports about the oracle without exposing the key.
#[derive(Debug, Clone)]
pub(crate) struct OracleStatus {
    pub(crate) configured: bool,
    pub(crate) model: String,
}

impl OracleStatus {
    pub(crate) fn from_config(config: &OracleConfig) -> Self {
        Self {
            configured: config.credential().is_some(),
            model: config.model.clone(),
        }
    }
}

pub(crate) fn matching_service(
    config: &OracleConfig,
) -> Result<MatchingService<OpenAiOracle>, AppError> {
    let oracle = OpenAiOracle::from_config(config)?.map(Arc::new);
    Ok(MatchingService::new(oracle))
}

/// Contractors from a JSON array on disk, or the bundled sample set.
pub(crate) fn load_contractors(path: Option<&Path>) -> Result<Vec<Contractor>, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(sample_contractors()),
    }
}

pub(crate) fn parse_weight(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a weight ({err})"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("weight '{raw}' must be a non-negative number"))
    }
}

/// Replace only the weights that were supplied on the command line.
pub(crate) fn override_weights(
    base: HomeownerWeights,
    experience: Option<f64>,
    reviews: Option<f64>,
    rating: Option<f64>,
    price: Option<f64>,
    speed: Option<f64>,
) -> HomeownerWeights {
    HomeownerWeights {
        experience: experience.unwrap_or(base.experience),
        reviews: reviews.unwrap_or(base.reviews),
        rating: rating.unwrap_or(base.rating),
        price: price.unwrap_or(base.price),
        speed: speed.unwrap_or(base.speed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_weight_rejects_negative_and_garbage() {
        assert_eq!(parse_weight("0.25"), Ok(0.25));
        assert!(parse_weight("-0.1").is_err());
        assert!(parse_weight("heavy").is_err());
        assert!(parse_weight("NaN").is_err());
    }

    #[test]
    fn override_weights_keeps_unspecified_values() {
        let base = HomeownerWeights {
            experience: 0.4,
            reviews: 0.25,
            rating: 0.2,
            price: 0.1,
            speed: 0.05,
        };
        let updated = override_weights(base, None, None, None, Some(0.5), None);
        assert_eq!(updated.price, 0.5);
        assert_eq!(updated.experience, 0.4);
    }

    #[test]
    fn load_contractors_defaults_to_sample_set() {
        let contractors = load_contractors(None).expect("sample set");
        assert_eq!(contractors.len(), 5);
    }

    #[test]
    fn load_contractors_reports_missing_file() {
        let err = load_contractors(Some(Path::new("/nonexistent/contractors.json")))
            .expect_err("missing file");
        assert!(matches!(err, AppError::Io(_)));
    }
}
