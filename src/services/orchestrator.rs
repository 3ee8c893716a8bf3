use crate::core::{build_preference_pairs, unique_domains, DEFAULT_PAIRING_MARGIN};
use crate::models::{
    DomainCandidateScore, JudgeOutcome, JudgeReport, JudgeVerdict, PreferencePair, ResponseSet,
    VerdictWeights,
};
use crate::services::judge::{JudgeBackend, JudgeError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// How failed judge calls enter the blend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Blend only judges that returned a verdict
    #[default]
    Exclude,
    /// Failed judges contribute the neutral verdict at full weight
    Neutral,
}

/// A judge together with its blend weight
#[derive(Clone)]
pub struct WeightedJudge {
    pub backend: Arc<dyn JudgeBackend>,
    pub weight: f64,
}

impl WeightedJudge {
    pub fn new(backend: Arc<dyn JudgeBackend>, weight: f64) -> Self {
        Self { backend, weight }
    }
}

/// Weighted per-field mean over the contributing reports
///
/// Returns `None` when no report carries weight.
pub fn blend(reports: &[JudgeReport], policy: FailurePolicy) -> Option<JudgeVerdict> {
    let mut total_weight = 0.0;
    let mut sum = JudgeVerdict {
        brandability: 0.0,
        pronounceability: 0.0,
        constraint: 0.0,
        creativity: 0.0,
        overall: 0.0,
    };

    for report in reports {
        let verdict = match (&report.outcome, policy) {
            (JudgeOutcome::Scored(verdict), _) => *verdict,
            (JudgeOutcome::Failed(_), FailurePolicy::Neutral) => JudgeVerdict::neutral(),
            (JudgeOutcome::Failed(_), FailurePolicy::Exclude) => continue,
        };

        total_weight += report.weight;
        sum.brandability += verdict.brandability * report.weight;
        sum.pronounceability += verdict.pronounceability * report.weight;
        sum.constraint += verdict.constraint * report.weight;
        sum.creativity += verdict.creativity * report.weight;
        sum.overall += verdict.overall * report.weight;
    }

    if total_weight <= 0.0 {
        return None;
    }

    Some(JudgeVerdict {
        brandability: sum.brandability / total_weight,
        pronounceability: sum.pronounceability / total_weight,
        constraint: sum.constraint / total_weight,
        creativity: sum.creativity / total_weight,
        overall: sum.overall / total_weight,
    })
}

/// Collapse a blended verdict into one 1-10 score; a missing blend scores 5 per field
pub fn verdict_score(weights: &VerdictWeights, blended: Option<&JudgeVerdict>) -> f64 {
    let neutral = JudgeVerdict::neutral();
    let v = blended.unwrap_or(&neutral);

    v.brandability * weights.brandability
        + v.pronounceability * weights.pronounceability
        + v.constraint * weights.constraint
        + v.creativity * weights.creativity
        + v.overall * weights.overall
}

/// Fans one candidate out to every judge and blends the verdicts
#[derive(Clone)]
pub struct JudgeOrchestrator {
    judges: Vec<WeightedJudge>,
    timeout: Duration,
    policy: FailurePolicy,
    weights: VerdictWeights,
}

impl JudgeOrchestrator {
    pub fn new(judges: Vec<WeightedJudge>, timeout: Duration) -> Self {
        Self {
            judges,
            timeout,
            policy: FailurePolicy::default(),
            weights: VerdictWeights::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_weights(mut self, weights: VerdictWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Keep only the named judges; an empty list keeps every judge
    pub fn retain_judges(&mut self, names: &[String]) {
        if names.is_empty() {
            return;
        }
        self.judges
            .retain(|j| names.iter().any(|name| name == j.backend.name()));
    }

    pub fn judge_names(&self) -> Vec<String> {
        self.judges
            .iter()
            .map(|j| j.backend.name().to_string())
            .collect()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Score one candidate with every judge concurrently
    ///
    /// Each judge runs in its own task under its own timeout, so one slow or
    /// failing judge never affects another.
    pub async fn score_candidate(&self, prompt: &str, domain: &str) -> DomainCandidateScore {
        let timeout = self.timeout;

        let handles: Vec<_> = self
            .judges
            .iter()
            .map(|judge| {
                let backend = Arc::clone(&judge.backend);
                let prompt = prompt.to_string();
                let domain = domain.to_string();
                tokio::spawn(async move {
                    match tokio::time::timeout(timeout, backend.score(&prompt, &domain)).await {
                        Ok(result) => result,
                        Err(_) => Err(JudgeError::Timeout(timeout)),
                    }
                })
            })
            .collect();

        let mut verdicts = Vec::with_capacity(handles.len());
        for (judge, handle) in self.judges.iter().zip(handles) {
            let name = judge.backend.name().to_string();
            let outcome = match handle.await {
                Ok(Ok(verdict)) => JudgeOutcome::Scored(verdict),
                Ok(Err(e)) => {
                    tracing::warn!("Judge {} failed on {}: {}", name, domain, e);
                    JudgeOutcome::Failed(e.to_string())
                }
                Err(e) => {
                    tracing::warn!("Judge {} task aborted on {}: {}", name, domain, e);
                    JudgeOutcome::Failed(format!("judge task aborted: {}", e))
                }
            };

            verdicts.push(JudgeReport {
                judge: name,
                weight: judge.weight,
                outcome,
            });
        }

        let blended = blend(&verdicts, self.policy);
        let combined_score = verdict_score(&self.weights, blended.as_ref());

        tracing::debug!("Scored {}: combined={:.3}", domain, combined_score);

        DomainCandidateScore {
            domain: domain.to_string(),
            verdicts,
            blended,
            combined_score,
        }
    }
}

/// Tunables for turning candidate responses into preference pairs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingOptions {
    pub margin: f64,
    pub max_candidates: usize,
    pub candidate_delay: Duration,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_PAIRING_MARGIN,
            max_candidates: 8,
            candidate_delay: Duration::from_millis(1000),
        }
    }
}

/// Scored candidates and the pairs built from them for one prompt
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPreferences {
    pub prompt: String,
    pub candidates: Vec<DomainCandidateScore>,
    pub pairs: Vec<PreferencePair>,
}

/// Runs the per-prompt preference pipeline on top of the orchestrator
#[derive(Clone)]
pub struct PreferenceGenerator {
    orchestrator: JudgeOrchestrator,
    options: PairingOptions,
}

impl PreferenceGenerator {
    pub fn new(orchestrator: JudgeOrchestrator, options: PairingOptions) -> Self {
        Self {
            orchestrator,
            options,
        }
    }

    pub fn orchestrator(&self) -> &JudgeOrchestrator {
        &self.orchestrator
    }

    pub fn options(&self) -> &PairingOptions {
        &self.options
    }

    /// De-duplicated `name.tld` candidates across every response, capped
    pub fn candidates<S: AsRef<str>>(&self, responses: &[S]) -> Vec<String> {
        let mut domains = unique_domains(responses.iter().map(|r| r.as_ref()));
        domains.truncate(self.options.max_candidates);
        domains
    }

    /// Score every candidate for one prompt and pair the best against the rest
    ///
    /// Returns `None` when fewer than two candidates can be extracted.
    pub async fn process_prompt<S: AsRef<str>>(
        &self,
        prompt: &str,
        responses: &[S],
    ) -> Option<PromptPreferences> {
        let domains = self.candidates(responses);
        if domains.len() < 2 {
            tracing::debug!("Skipping prompt with {} candidate(s)", domains.len());
            return None;
        }

        let mut candidates = Vec::with_capacity(domains.len());
        for (i, domain) in domains.iter().enumerate() {
            if i > 0 && !self.options.candidate_delay.is_zero() {
                tokio::time::sleep(self.options.candidate_delay).await;
            }
            candidates.push(self.orchestrator.score_candidate(prompt, domain).await);
        }

        let pairs = build_preference_pairs(prompt, &candidates, self.options.margin);

        Some(PromptPreferences {
            prompt: prompt.to_string(),
            candidates,
            pairs,
        })
    }

    /// Process prompts one after another and collect every pair
    pub async fn generate(&self, sets: &[ResponseSet]) -> Vec<PreferencePair> {
        let mut all_pairs = Vec::new();
        let mut skipped = 0usize;

        for (i, set) in sets.iter().enumerate() {
            if i > 0 && !self.options.candidate_delay.is_zero() {
                tokio::time::sleep(self.options.candidate_delay).await;
            }

            match self.process_prompt(&set.prompt, &set.responses).await {
                Some(result) => all_pairs.extend(result.pairs),
                None => skipped += 1,
            }

            if (i + 1) % 10 == 0 {
                tracing::info!("Processed {}/{} prompts ({} pairs)", i + 1, sets.len(), all_pairs.len());
            }
        }

        tracing::info!(
            "Generated {} preference pairs from {} prompts ({} skipped)",
            all_pairs.len(),
            sets.len(),
            skipped
        );

        all_pairs
    }
}
