use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::core::Evaluator;
use crate::models::{AggregateWeights, VerdictWeights};
use crate::services::{
    FailurePolicy, JudgeError, JudgeOrchestrator, OpenRouterJudge, PairingOptions,
    PreferenceGenerator, WeightedJudge, OPENROUTER_ENDPOINT,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub judge: JudgeSettings,
    #[serde(default)]
    pub pairing: PairingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub judge_weights: JudgeWeightsConfig,
}

/// Rubric weights for the aggregate combined score
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_constraints_weight")]
    pub constraints: f64,
    #[serde(default = "default_diversity_weight")]
    pub diversity: f64,
    #[serde(default = "default_pronounceability_weight")]
    pub pronounceability: f64,
    #[serde(default = "default_premium_weight")]
    pub premium: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            constraints: default_constraints_weight(),
            diversity: default_diversity_weight(),
            pronounceability: default_pronounceability_weight(),
            premium: default_premium_weight(),
        }
    }
}

fn default_constraints_weight() -> f64 { 0.30 }
fn default_diversity_weight() -> f64 { 0.20 }
fn default_pronounceability_weight() -> f64 { 0.25 }
fn default_premium_weight() -> f64 { 0.25 }

/// Field weights for collapsing a blended judge verdict
#[derive(Debug, Clone, Deserialize)]
pub struct JudgeWeightsConfig {
    #[serde(default = "default_brandability_weight")]
    pub brandability: f64,
    #[serde(default = "default_verdict_pronounceability_weight")]
    pub pronounceability: f64,
    #[serde(default = "default_constraint_weight")]
    pub constraint: f64,
    #[serde(default = "default_creativity_weight")]
    pub creativity: f64,
    #[serde(default = "default_overall_weight")]
    pub overall: f64,
}

impl Default for JudgeWeightsConfig {
    fn default() -> Self {
        Self {
            brandability: default_brandability_weight(),
            pronounceability: default_verdict_pronounceability_weight(),
            constraint: default_constraint_weight(),
            creativity: default_creativity_weight(),
            overall: default_overall_weight(),
        }
    }
}

fn default_brandability_weight() -> f64 { 0.25 }
fn default_verdict_pronounceability_weight() -> f64 { 0.20 }
fn default_constraint_weight() -> f64 { 0.25 }
fn default_creativity_weight() -> f64 { 0.15 }
fn default_overall_weight() -> f64 { 0.15 }

/// One remote judge model
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JudgeModelSettings {
    pub name: String,
    pub model: String,
    pub weight: f64,
    #[serde(default)]
    pub focus: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JudgeSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_candidate_delay_ms")]
    pub candidate_delay_ms: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default = "default_judges")]
    pub judges: Vec<JudgeModelSettings>,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            candidate_delay_ms: default_candidate_delay_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            failure_policy: FailurePolicy::default(),
            judges: default_judges(),
        }
    }
}

fn default_endpoint() -> String { OPENROUTER_ENDPOINT.to_string() }
fn default_timeout_secs() -> u64 { 60 }
fn default_candidate_delay_ms() -> u64 { 1000 }
fn default_temperature() -> f64 { 0.1 }
fn default_max_tokens() -> u32 { 200 }

fn default_judges() -> Vec<JudgeModelSettings> {
    vec![
        JudgeModelSettings {
            name: "minimax".to_string(),
            model: "minimax/minimax-m2.1".to_string(),
            weight: 0.5,
            focus: "brandability, memorability, creativity".to_string(),
        },
        JudgeModelSettings {
            name: "deepseek".to_string(),
            model: "deepseek/deepseek-chat-v3-0324".to_string(),
            weight: 0.5,
            focus: "constraint satisfaction, pronounceability, uniqueness".to_string(),
        },
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairingSettings {
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default = "default_candidates_per_prompt")]
    pub candidates_per_prompt: usize,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            candidates_per_prompt: default_candidates_per_prompt(),
        }
    }
}

impl PairingSettings {
    /// Candidates scored per prompt after de-duplication
    pub fn max_candidates(&self) -> usize {
        self.candidates_per_prompt * 2
    }
}

fn default_margin() -> f64 { 0.5 }
fn default_candidates_per_prompt() -> usize { 4 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// `LOG_LEVEL` and `LOG_FORMAT` take precedence over the configured values
    pub fn with_env_overrides(self) -> Self {
        self.overridden(std::env::var("LOG_LEVEL").ok(), std::env::var("LOG_FORMAT").ok())
    }

    pub fn overridden(self, level: Option<String>, format: Option<String>) -> Self {
        Self {
            level: level.filter(|l| !l.trim().is_empty()).unwrap_or(self.level),
            format: format.filter(|f| !f.trim().is_empty()).unwrap_or(self.format),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with BRANDSCORE_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., BRANDSCORE_SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// The judge credential, or a configuration error when it is unset
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.judge
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Message(
                    "OPENROUTER_API_KEY not set (get a key at https://openrouter.ai/keys)".to_string(),
                )
            })
    }

    pub fn aggregate_weights(&self) -> AggregateWeights {
        let w = &self.scoring.weights;
        AggregateWeights {
            constraints: w.constraints,
            diversity: w.diversity,
            pronounceability: w.pronounceability,
            premium: w.premium,
        }
    }

    pub fn verdict_weights(&self) -> VerdictWeights {
        let w = &self.scoring.judge_weights;
        VerdictWeights {
            brandability: w.brandability,
            pronounceability: w.pronounceability,
            constraint: w.constraint,
            creativity: w.creativity,
            overall: w.overall,
        }
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::with_weights(self.aggregate_weights())
    }

    pub fn pairing_options(&self) -> PairingOptions {
        PairingOptions {
            margin: self.pairing.margin,
            max_candidates: self.pairing.max_candidates(),
            candidate_delay: Duration::from_millis(self.judge.candidate_delay_ms),
        }
    }

    /// Build the remote judges and the orchestrator that fans out to them
    pub fn orchestrator(&self, api_key: &str) -> Result<JudgeOrchestrator, JudgeError> {
        let judges = self
            .judge
            .judges
            .iter()
            .map(|j| -> Result<WeightedJudge, JudgeError> {
                let backend = OpenRouterJudge::new(
                    j.name.clone(),
                    j.model.clone(),
                    j.focus.clone(),
                    self.judge.endpoint.clone(),
                    api_key,
                )?
                .with_sampling(self.judge.temperature, self.judge.max_tokens);
                Ok(WeightedJudge::new(Arc::new(backend), j.weight))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(JudgeOrchestrator::new(judges, Duration::from_secs(self.judge.timeout_secs))
            .with_policy(self.judge.failure_policy)
            .with_weights(self.verdict_weights()))
    }

    pub fn preference_generator(&self, api_key: &str) -> Result<PreferenceGenerator, JudgeError> {
        Ok(PreferenceGenerator::new(
            self.orchestrator(api_key)?,
            self.pairing_options(),
        ))
    }
}

fn environment() -> Environment {
    Environment::with_prefix("BRANDSCORE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Apply well-known environment variables that live outside the BRANDSCORE_ prefix
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let api_key = std::env::var("OPENROUTER_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    let mut builder = Config::builder().add_source(settings);
    if let Some(key) = api_key {
        builder = builder.set_override("judge.api_key", key)?;
    }

    builder.build()
}
