// Core algorithm exports
pub mod aggregate;
pub mod constraints;
pub mod diversity;
pub mod evaluator;
pub mod extractor;
pub mod pairing;
pub mod premium;
pub mod pronounceability;

use thiserror::Error;

pub use aggregate::{combined_score, compare_reports, summarize};
pub use constraints::{check_constraints, PromptConstraints};
pub use diversity::{DiversityParams, DiversityScorer};
pub use evaluator::Evaluator;
pub use extractor::{extract_domains, extract_names, unique_domains};
pub use pairing::{build_preference_pairs, rank_candidates, DEFAULT_PAIRING_MARGIN};
pub use premium::{PremiumScorer, PremiumTables};
pub use pronounceability::{PhoneticPatterns, PronounceabilityScorer};

/// Errors raised by the scoring core
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid scoring pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("No samples to evaluate")]
    EmptyBatch,
}

/// Round to 3 decimal places, the precision every rubric reports at
#[inline]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.83333), 0.833);
        assert_eq!(round3(0.1666), 0.167);
        assert_eq!(round3(1.0), 1.0);
    }
}
