use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::matching::domain::ScoreRequest;
use crate::matching::fixtures::{default_homeowner, sample_contractors};
use crate::matching::oracle::{OracleError, OracleRequest, RankingOracle};
use crate::matching::service::MatchingService;

type Reply = Box<dyn Fn() -> Result<String, OracleError> + Send + Sync>;

/// Oracle double that replays a canned reply and records every request.
pub(super) struct ScriptedOracle {
    reply: Reply,
    requests: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    pub(super) fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with(Box::new(move || Ok(text.clone())))
    }

    pub(super) fn failing(make_error: fn() -> OracleError) -> Self {
        Self::with(Box::new(move || Err(make_error())))
    }

    fn with(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().expect("request mutex poisoned").clone()
    }
}

#[async_trait]
impl RankingOracle for ScriptedOracle {
    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request.clone());
        (self.reply)()
    }
}

pub(super) const RANKED_REPLY: &str = r#"{"top3":[
    {"id":"c1","name":"NorthPeak Roofing","trust_score":82.4,"reason":"Longest roofing track record"},
    {"id":"c4","name":"Granite Peak Roofing Co.","trust_score":71.0,"reason":"Solid reviews at a fair price"},
    {"id":"c3","name":"Wasatch Elite Exteriors","trust_score":69.5,"reason":"Top rating, adjacent trade"}
]}"#;

pub(super) fn sample_request() -> ScoreRequest {
    ScoreRequest {
        homeowner: default_homeowner(),
        contractors: sample_contractors(),
    }
}

pub(super) fn build_service(
    oracle: ScriptedOracle,
) -> (Arc<MatchingService<ScriptedOracle>>, Arc<ScriptedOracle>) {
    let oracle = Arc::new(oracle);
    let service = Arc::new(MatchingService::new(Some(oracle.clone())));
    (service, oracle)
}

pub(super) fn unconfigured_service() -> Arc<MatchingService<ScriptedOracle>> {
    Arc::new(MatchingService::new(None))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
