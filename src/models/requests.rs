use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::Sample;
use crate::models::report::EvaluationReport;

/// Score a single prompt/response pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate(length(min = 1))]
    pub prompt: String,
    pub response: String,
}

/// Evaluate a batch of samples
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EvaluateRequest {
    #[serde(default = "default_name")]
    pub name: String,
    #[validate(length(min = 1))]
    pub samples: Vec<Sample>,
}

fn default_name() -> String {
    "dataset".to_string()
}

/// Compare two previously produced evaluation reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub baseline: EvaluationReport,
    pub candidate: EvaluationReport,
}

/// Build preference pairs for one prompt from its candidate responses
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PreferenceRequest {
    #[validate(length(min = 1))]
    pub prompt: String,
    #[validate(length(min = 1))]
    pub responses: Vec<String>,
}
