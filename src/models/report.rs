use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::domain::{
    ConstraintResult, DiversityResult, PremiumResult, PronounceabilityResult,
};

/// Mean of every sub-score of one rubric across a batch
///
/// Serialized flat, e.g. `{"num_samples": 10, "avg_overall": 0.8, "avg_tld_satisfied": 1.0}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub num_samples: usize,
    pub avg_overall: f64,
    #[serde(flatten)]
    pub averages: BTreeMap<String, f64>,
}

impl BatchReport {
    /// Look up the mean of a sub-score by its plain field name
    pub fn average(&self, field: &str) -> Option<f64> {
        if field == "overall" {
            return Some(self.avg_overall);
        }
        self.averages.get(&format!("avg_{}", field)).copied()
    }
}

/// How often a value occurred in the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Corpus-level repetition statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrossBatchDiversity {
    pub total_names: usize,
    pub unique_names: usize,
    pub unique_ratio: f64,
    #[serde(default)]
    pub most_common_names: Vec<FrequencyEntry>,
    #[serde(default)]
    pub most_common_prefixes: Vec<FrequencyEntry>,
    #[serde(default)]
    pub most_common_suffixes: Vec<FrequencyEntry>,
}

/// Full evaluation of one corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub name: String,
    pub run_id: uuid::Uuid,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub num_samples: usize,
    pub constraints: BatchReport,
    pub diversity: BatchReport,
    pub cross_batch_diversity: CrossBatchDiversity,
    pub pronounceability: BatchReport,
    pub premium: BatchReport,
    pub combined_score: f64,
}

/// All four rubric results for a single prompt/response pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleScores {
    pub domains_found: usize,
    pub constraints: ConstraintResult,
    pub diversity: DiversityResult,
    pub pronounceability: PronounceabilityResult,
    pub premium: PremiumResult,
    pub combined_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

impl Direction {
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Unchanged => "=",
        }
    }
}

/// Change of one metric between two evaluation reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: String,
    pub before: f64,
    pub after: f64,
    pub delta: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub baseline: String,
    pub candidate: String,
    pub deltas: Vec<MetricDelta>,
}

impl ComparisonReport {
    pub fn delta(&self, metric: &str) -> Option<&MetricDelta> {
        self.deltas.iter().find(|d| d.metric == metric)
    }
}
