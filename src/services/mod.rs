// Service exports
pub mod corpus;
pub mod judge;
pub mod orchestrator;

pub use corpus::{
    load_report, load_response_sets, load_samples, reference_sets, run_name, save_report,
    timestamped_report_path, write_pairs, CorpusError,
};
pub use judge::{parse_verdict, JudgeBackend, JudgeError, OpenRouterJudge, OPENROUTER_ENDPOINT};
pub use orchestrator::{
    blend, verdict_score, FailurePolicy, JudgeOrchestrator, PairingOptions, PreferenceGenerator,
    PromptPreferences, WeightedJudge,
};
