use serde::{Deserialize, Serialize};
use crate::models::domain::{DomainCandidateScore, PreferencePair};

/// Response for the preference endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceResponse {
    pub prompt: String,
    pub candidates: Vec<DomainCandidateScore>,
    pub pairs: Vec<PreferencePair>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub judges: Vec<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
