// Model exports
pub mod domain;
pub mod report;
pub mod requests;
pub mod responses;

pub use domain::{
    AggregateWeights, ConstraintResult, DiversityResult, DomainCandidate, DomainCandidateScore,
    JudgeOutcome, JudgeReport, JudgeVerdict, PreferencePair, PremiumResult,
    PronounceabilityResult, ResponseSet, Rubric, RubricScore, Sample, VerdictWeights,
};
pub use report::{
    BatchReport, ComparisonReport, CrossBatchDiversity, Direction, EvaluationReport,
    FrequencyEntry, MetricDelta, SampleScores,
};
pub use requests::{CompareRequest, EvaluateRequest, PreferenceRequest, ScoreRequest};
pub use responses::{ErrorResponse, HealthResponse, PreferenceResponse};
