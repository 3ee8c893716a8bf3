//! Brandscore - quality scoring for brandable domain name generation
//!
//! This library scores model responses that suggest domain names. It runs four
//! deterministic rubrics (constraint satisfaction, diversity, pronounceability,
//! premium value) and aggregates them per corpus. It also consults remote LLM
//! judges to rank candidates and build preference pairs for DPO training.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

use crate::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

// Re-export commonly used types
pub use core::{build_preference_pairs, compare_reports, extract_domains, Evaluator};
pub use models::{
    DomainCandidate, DomainCandidateScore, EvaluationReport, JudgeOutcome, JudgeVerdict,
    PreferencePair, Sample,
};
pub use services::{JudgeBackend, JudgeOrchestrator, PreferenceGenerator};

/// Initialise the global tracing subscriber from the `[logging]` settings
///
/// `LOG_LEVEL` and `LOG_FORMAT` override the configured values. A format of
/// `pretty` selects human-readable output, anything else emits JSON.
pub fn init_tracing(logging: &LoggingSettings) {
    let logging = logging.clone().with_env_overrides();

    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let domains = extract_domains("- brewlo.io — coffee");
        assert_eq!(domains, vec![DomainCandidate::new("brewlo", "io")]);
    }
}
