use crate::core::{
    aggregate::{combined_score, summarize},
    constraints::{score_constraints, PromptConstraints},
    diversity::DiversityScorer,
    extractor::extract_domains,
    premium::PremiumScorer,
    pronounceability::PronounceabilityScorer,
    ScoringError,
};
use crate::models::{
    AggregateWeights, ConstraintResult, DomainCandidate, DiversityResult, EvaluationReport, PremiumResult,
    PronounceabilityResult, Sample, SampleScores,
};

/// Runs the four rubrics over samples and aggregates them
///
/// # Pipeline
/// 1. Extract domains once per response
/// 2. Score constraints, diversity, pronounceability and premium
/// 3. Average each rubric across the batch
/// 4. Blend the rubric averages into the combined score
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    diversity: DiversityScorer,
    pronounceability: PronounceabilityScorer,
    premium: PremiumScorer,
    weights: AggregateWeights,
}

impl Evaluator {
    pub fn new(
        diversity: DiversityScorer,
        pronounceability: PronounceabilityScorer,
        premium: PremiumScorer,
        weights: AggregateWeights,
    ) -> Self {
        Self {
            diversity,
            pronounceability,
            premium,
            weights,
        }
    }

    pub fn with_weights(weights: AggregateWeights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }

    pub fn weights(&self) -> &AggregateWeights {
        &self.weights
    }

    /// Score one prompt/response pair on every rubric
    pub fn score_sample(&self, prompt: &str, response: &str) -> SampleScores {
        self.score_extracted(prompt, &extract_domains(response))
    }

    fn score_extracted(&self, prompt: &str, domains: &[DomainCandidate]) -> SampleScores {
        let names: Vec<String> = domains.iter().map(|d| d.name.clone()).collect();

        let constraints = score_constraints(&PromptConstraints::from_prompt(prompt), domains);
        let diversity = self.diversity.score_names(&names);
        let pronounceability = self.pronounceability.score_names(&names);
        let premium = self.premium.score_domains(domains);

        let combined = combined_score(
            &self.weights,
            constraints.overall,
            diversity.overall,
            pronounceability.overall,
            premium.overall,
        );

        SampleScores {
            domains_found: domains.len(),
            constraints,
            diversity,
            pronounceability,
            premium,
            combined_score: combined,
        }
    }

    /// Evaluate a whole corpus and produce the nested report
    pub fn evaluate(&self, name: &str, samples: &[Sample]) -> Result<EvaluationReport, ScoringError> {
        if samples.is_empty() {
            return Err(ScoringError::EmptyBatch);
        }

        tracing::info!("Evaluating {} ({} samples)", name, samples.len());

        let mut constraints: Vec<ConstraintResult> = Vec::with_capacity(samples.len());
        let mut diversity: Vec<DiversityResult> = Vec::with_capacity(samples.len());
        let mut pronounceability: Vec<PronounceabilityResult> = Vec::with_capacity(samples.len());
        let mut premium: Vec<PremiumResult> = Vec::with_capacity(samples.len());
        let mut all_names: Vec<String> = Vec::new();
        let mut empty_responses = 0usize;

        for sample in samples {
            let domains = extract_domains(&sample.response);
            let scores = self.score_extracted(&sample.prompt, &domains);
            if scores.domains_found == 0 {
                empty_responses += 1;
            }

            all_names.extend(domains.into_iter().map(|d| d.name));
            constraints.push(scores.constraints);
            diversity.push(scores.diversity);
            pronounceability.push(scores.pronounceability);
            premium.push(scores.premium);
        }

        if empty_responses > 0 {
            tracing::debug!("{} of {} responses contained no domains", empty_responses, samples.len());
        }

        let constraints = summarize(&constraints);
        let diversity = summarize(&diversity);
        let pronounceability = summarize(&pronounceability);
        let premium = summarize(&premium);
        let cross_batch_diversity = self.diversity.cross_batch(&all_names);

        let combined = combined_score(
            &self.weights,
            constraints.avg_overall,
            diversity.avg_overall,
            pronounceability.avg_overall,
            premium.avg_overall,
        );

        tracing::info!(
            "Evaluated {}: constraints={:.3} diversity={:.3} pronounceability={:.3} premium={:.3} combined={:.3}",
            name,
            constraints.avg_overall,
            diversity.avg_overall,
            pronounceability.avg_overall,
            premium.avg_overall,
            combined
        );

        Ok(EvaluationReport {
            name: name.to_string(),
            run_id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            num_samples: samples.len(),
            constraints,
            diversity,
            cross_batch_diversity,
            pronounceability,
            premium,
            combined_score: combined,
        })
    }
}
