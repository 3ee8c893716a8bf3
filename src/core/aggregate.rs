use crate::core::round3;
use crate::models::{
    AggregateWeights, BatchReport, ComparisonReport, Direction, EvaluationReport, MetricDelta,
    Rubric, RubricScore,
};
use std::collections::BTreeMap;

/// Differences smaller than this are reported as unchanged
pub const COMPARISON_EPSILON: f64 = 0.001;

/// Average every sub-score of one rubric over a batch
///
/// An empty batch yields a report with `num_samples == 0` and zero means.
pub fn summarize<R: RubricScore>(results: &[R]) -> BatchReport {
    let n = results.len();
    if n == 0 {
        return BatchReport::default();
    }

    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    let mut overall = 0.0;
    for result in results {
        for (field, value) in result.sub_scores() {
            *sums.entry(format!("avg_{}", field)).or_insert(0.0) += value;
        }
        overall += result.overall();
    }

    let averages = sums
        .into_iter()
        .map(|(key, sum)| (key, round3(sum / n as f64)))
        .collect();

    BatchReport {
        num_samples: n,
        avg_overall: round3(overall / n as f64),
        averages,
    }
}

/// Blend the four rubric overalls into one 0-1 score
pub fn combined_score(
    weights: &AggregateWeights,
    constraints: f64,
    diversity: f64,
    pronounceability: f64,
    premium: f64,
) -> f64 {
    round3(
        constraints * weights.constraints
            + diversity * weights.diversity
            + pronounceability * weights.pronounceability
            + premium * weights.premium,
    )
}

fn rubric_report(report: &EvaluationReport, rubric: Rubric) -> &BatchReport {
    match rubric {
        Rubric::Constraints => &report.constraints,
        Rubric::Diversity => &report.diversity,
        Rubric::Pronounceability => &report.pronounceability,
        Rubric::Premium => &report.premium,
    }
}

fn metric_delta(metric: String, before: f64, after: f64) -> MetricDelta {
    let delta = round3(after - before);
    let direction = if delta.abs() < COMPARISON_EPSILON {
        Direction::Unchanged
    } else if delta > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };

    MetricDelta {
        metric,
        before,
        after,
        delta,
        direction,
    }
}

/// Field-by-field delta between two evaluation reports
///
/// Metrics present in the baseline but missing from the candidate are skipped.
pub fn compare_reports(baseline: &EvaluationReport, candidate: &EvaluationReport) -> ComparisonReport {
    let mut deltas = Vec::new();

    for rubric in Rubric::ALL {
        let before = rubric_report(baseline, rubric);
        let after = rubric_report(candidate, rubric);

        deltas.push(metric_delta(
            format!("{}.overall", rubric.as_str()),
            before.avg_overall,
            after.avg_overall,
        ));

        for (key, value) in &before.averages {
            let field = key.trim_start_matches("avg_");
            if let Some(after_value) = after.averages.get(key) {
                deltas.push(metric_delta(
                    format!("{}.{}", rubric.as_str(), field),
                    *value,
                    *after_value,
                ));
            }
        }
    }

    deltas.push(metric_delta(
        "cross_batch_diversity.unique_ratio".to_string(),
        baseline.cross_batch_diversity.unique_ratio,
        candidate.cross_batch_diversity.unique_ratio,
    ));
    deltas.push(metric_delta(
        "combined_score".to_string(),
        baseline.combined_score,
        candidate.combined_score,
    ));

    ComparisonReport {
        baseline: baseline.name.clone(),
        candidate: candidate.name.clone(),
        deltas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstraintResult, CrossBatchDiversity};

    fn constraint(overall: f64, tld: f64) -> ConstraintResult {
        ConstraintResult {
            length_satisfied: 1.0,
            tld_satisfied: tld,
            prefix_suffix_satisfied: 1.0,
            count_satisfied: 1.0,
            overall,
        }
    }

    fn report(name: &str, constraints_overall: f64, combined: f64) -> EvaluationReport {
        EvaluationReport {
            name: name.to_string(),
            run_id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            num_samples: 1,
            constraints: summarize(&[constraint(constraints_overall, 1.0)]),
            diversity: BatchReport::default(),
            cross_batch_diversity: CrossBatchDiversity::default(),
            pronounceability: BatchReport::default(),
            premium: BatchReport::default(),
            combined_score: combined,
        }
    }

    #[test]
    fn test_summarize_means() {
        let summary = summarize(&[constraint(1.0, 1.0), constraint(0.5, 0.0)]);
        assert_eq!(summary.num_samples, 2);
        assert_eq!(summary.avg_overall, 0.75);
        assert_eq!(summary.average("tld_satisfied"), Some(0.5));
        assert_eq!(summary.average("length_satisfied"), Some(1.0));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize::<ConstraintResult>(&[]);
        assert_eq!(summary.num_samples, 0);
        assert_eq!(summary.avg_overall, 0.0);
    }

    #[test]
    fn test_combined_score_weights() {
        let weights = AggregateWeights::default();
        assert_eq!(combined_score(&weights, 1.0, 1.0, 1.0, 1.0), 1.0);
        assert_eq!(combined_score(&weights, 1.0, 0.0, 0.0, 0.0), 0.3);
        assert_eq!(combined_score(&weights, 0.0, 0.0, 0.0, 1.0), 0.25);
    }

    #[test]
    fn test_compare_directions() {
        let before = report("base", 0.5, 0.600);
        let after = report("tuned", 0.7, 0.6004);

        let comparison = compare_reports(&before, &after);
        assert_eq!(comparison.baseline, "base");

        let constraints = comparison.delta("constraints.overall").unwrap();
        assert_eq!(constraints.direction, Direction::Up);
        assert_eq!(constraints.delta, 0.2);

        let combined = comparison.delta("combined_score").unwrap();
        assert_eq!(combined.direction, Direction::Unchanged);

        let reverse = compare_reports(&after, &before);
        assert_eq!(
            reverse.delta("constraints.overall").unwrap().direction,
            Direction::Down
        );
    }

    #[test]
    fn test_compare_one_step_is_a_change() {
        let before = report("a", 0.5, 0.500);
        let after = report("b", 0.5, 0.501);
        let comparison = compare_reports(&before, &after);
        assert_eq!(
            comparison.delta("combined_score").unwrap().direction,
            Direction::Up
        );
    }
}
