use serde::{Deserialize, Serialize};

/// A domain suggestion parsed out of a model response
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainCandidate {
    pub name: String,
    pub tld: String,
}

impl DomainCandidate {
    pub fn new(name: impl Into<String>, tld: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tld: tld.into(),
        }
    }

    /// Full `name.tld` rendering, as sent to judges
    pub fn domain(&self) -> String {
        format!("{}.{}", self.name, self.tld)
    }
}

/// The four independent scoring rubrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rubric {
    Constraints,
    Diversity,
    Pronounceability,
    Premium,
}

impl Rubric {
    pub const ALL: [Rubric; 4] = [
        Rubric::Constraints,
        Rubric::Diversity,
        Rubric::Pronounceability,
        Rubric::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rubric::Constraints => "constraints",
            Rubric::Diversity => "diversity",
            Rubric::Pronounceability => "pronounceability",
            Rubric::Premium => "premium",
        }
    }
}

/// Common view over the per-rubric score results so batches can be averaged
/// without knowing the rubric's field names.
pub trait RubricScore {
    const RUBRIC: Rubric;

    /// Named sub-scores, excluding `overall`, in declaration order
    fn sub_scores(&self) -> Vec<(&'static str, f64)>;

    fn overall(&self) -> f64;
}

/// Constraint satisfaction scores, each 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstraintResult {
    pub length_satisfied: f64,
    pub tld_satisfied: f64,
    pub prefix_suffix_satisfied: f64,
    pub count_satisfied: f64,
    pub overall: f64,
}

impl RubricScore for ConstraintResult {
    const RUBRIC: Rubric = Rubric::Constraints;

    fn sub_scores(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("length_satisfied", self.length_satisfied),
            ("tld_satisfied", self.tld_satisfied),
            ("prefix_suffix_satisfied", self.prefix_suffix_satisfied),
            ("count_satisfied", self.count_satisfied),
        ]
    }

    fn overall(&self) -> f64 {
        self.overall
    }
}

/// Per-response diversity scores
///
/// `duplicate_rate` is the only field where lower is better; it is inverted
/// before being folded into `overall`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiversityResult {
    pub type_token_ratio: f64,
    pub duplicate_rate: f64,
    pub char_diversity: f64,
    pub prefix_diversity: f64,
    pub suffix_diversity: f64,
    pub overall: f64,
}

impl DiversityResult {
    /// Result for a response with no extractable names: worst-case duplicate rate
    pub fn empty() -> Self {
        Self {
            type_token_ratio: 0.0,
            duplicate_rate: 1.0,
            char_diversity: 0.0,
            prefix_diversity: 0.0,
            suffix_diversity: 0.0,
            overall: 0.0,
        }
    }
}

impl RubricScore for DiversityResult {
    const RUBRIC: Rubric = Rubric::Diversity;

    fn sub_scores(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("type_token_ratio", self.type_token_ratio),
            ("duplicate_rate", self.duplicate_rate),
            ("char_diversity", self.char_diversity),
            ("prefix_diversity", self.prefix_diversity),
            ("suffix_diversity", self.suffix_diversity),
        ]
    }

    fn overall(&self) -> f64 {
        self.overall
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PronounceabilityResult {
    pub vowel_ratio: f64,
    pub consonant_cluster_score: f64,
    pub pattern_score: f64,
    pub length_score: f64,
    pub overall: f64,
}

impl RubricScore for PronounceabilityResult {
    const RUBRIC: Rubric = Rubric::Pronounceability;

    fn sub_scores(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("vowel_ratio", self.vowel_ratio),
            ("consonant_cluster_score", self.consonant_cluster_score),
            ("pattern_score", self.pattern_score),
            ("length_score", self.length_score),
        ]
    }

    fn overall(&self) -> f64 {
        self.overall
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PremiumResult {
    pub length_score: f64,
    pub word_score: f64,
    pub tld_score: f64,
    pub pattern_score: f64,
    pub memorability_score: f64,
    pub overall: f64,
}

impl RubricScore for PremiumResult {
    const RUBRIC: Rubric = Rubric::Premium;

    fn sub_scores(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("length_score", self.length_score),
            ("word_score", self.word_score),
            ("tld_score", self.tld_score),
            ("pattern_score", self.pattern_score),
            ("memorability_score", self.memorability_score),
        ]
    }

    fn overall(&self) -> f64 {
        self.overall
    }
}

/// Raw rubric returned by one judge, each field 1-10
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JudgeVerdict {
    pub brandability: f64,
    pub pronounceability: f64,
    pub constraint: f64,
    pub creativity: f64,
    pub overall: f64,
}

impl JudgeVerdict {
    pub const NEUTRAL_SCORE: f64 = 5.0;
    pub const MIN_SCORE: f64 = 1.0;
    pub const MAX_SCORE: f64 = 10.0;

    /// Verdict substituted for a judge that could not be consulted
    pub const fn neutral() -> Self {
        Self {
            brandability: Self::NEUTRAL_SCORE,
            pronounceability: Self::NEUTRAL_SCORE,
            constraint: Self::NEUTRAL_SCORE,
            creativity: Self::NEUTRAL_SCORE,
            overall: Self::NEUTRAL_SCORE,
        }
    }

    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("brandability", self.brandability),
            ("pronounceability", self.pronounceability),
            ("constraint", self.constraint),
            ("creativity", self.creativity),
            ("overall", self.overall),
        ]
    }

    /// First field that is non-finite or outside 1-10
    pub fn out_of_range(&self) -> Option<(&'static str, f64)> {
        self.fields()
            .into_iter()
            .find(|(_, value)| !value.is_finite() || !(Self::MIN_SCORE..=Self::MAX_SCORE).contains(value))
    }
}

/// Result of a single judge call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum JudgeOutcome {
    Scored(JudgeVerdict),
    Failed(String),
}

impl JudgeOutcome {
    /// The verdict this judge reports; failed calls report the neutral verdict
    pub fn verdict(&self) -> JudgeVerdict {
        match self {
            JudgeOutcome::Scored(verdict) => *verdict,
            JudgeOutcome::Failed(_) => JudgeVerdict::neutral(),
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, JudgeOutcome::Scored(_))
    }
}

/// One judge's contribution to a candidate's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeReport {
    pub judge: String,
    pub weight: f64,
    pub outcome: JudgeOutcome,
}

/// A candidate domain with its per-judge verdicts and blended score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCandidateScore {
    pub domain: String,
    pub verdicts: Vec<JudgeReport>,
    /// Weighted blend over contributing judges; `None` when no judge contributed
    pub blended: Option<JudgeVerdict>,
    #[serde(rename = "combinedScore")]
    pub combined_score: f64,
}

/// DPO training pair: the best candidate for a prompt versus a clearly worse one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencePair {
    pub prompt: String,
    pub chosen: String,
    pub rejected: String,
    pub chosen_score: f64,
    pub rejected_score: f64,
}

/// Weights used to blend the four rubric averages into one combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateWeights {
    pub constraints: f64,
    pub diversity: f64,
    pub pronounceability: f64,
    pub premium: f64,
}

impl Default for AggregateWeights {
    fn default() -> Self {
        Self {
            constraints: 0.30,
            diversity: 0.20,
            pronounceability: 0.25,
            premium: 0.25,
        }
    }
}

/// Weights used to collapse a blended judge verdict into one combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerdictWeights {
    pub brandability: f64,
    pub pronounceability: f64,
    pub constraint: f64,
    pub creativity: f64,
    pub overall: f64,
}

impl Default for VerdictWeights {
    fn default() -> Self {
        Self {
            brandability: 0.25,
            pronounceability: 0.20,
            constraint: 0.25,
            creativity: 0.15,
            overall: 0.15,
        }
    }
}

/// One prompt/response pair from an evaluation corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub prompt: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl Sample {
    pub fn new(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            meta: None,
        }
    }
}

/// A prompt together with every candidate response generated for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSet {
    pub prompt: String,
    pub responses: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_domain_rendering() {
        let candidate = DomainCandidate::new("brewlo", "io");
        assert_eq!(candidate.domain(), "brewlo.io");
    }

    #[test]
    fn test_verdict_rejects_extra_keys() {
        let raw = r#"{"brandability": 8, "pronounceability": 7, "constraint": 9, "creativity": 6, "overall": 8, "notes": "x"}"#;
        assert!(serde_json::from_str::<JudgeVerdict>(raw).is_err());
    }

    #[test]
    fn test_failed_outcome_reports_neutral_verdict() {
        let outcome = JudgeOutcome::Failed("timeout".to_string());
        assert_eq!(outcome.verdict(), JudgeVerdict::neutral());
        assert!(!outcome.is_scored());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let a = AggregateWeights::default();
        assert!((a.constraints + a.diversity + a.pronounceability + a.premium - 1.0).abs() < 1e-9);

        let v = VerdictWeights::default();
        let total = v.brandability + v.pronounceability + v.constraint + v.creativity + v.overall;
        assert!((total - 1.0).abs() < 1e-9);
    }
}
