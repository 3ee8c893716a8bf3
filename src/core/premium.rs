use crate::core::{extractor::extract_domains, round3};
use crate::models::{DomainCandidate, PremiumResult};
use std::collections::HashMap;

/// Common words that make good domain bases
pub const VALUABLE_WORDS: &[&str] = &[
    "get", "try", "go", "my", "the", "app", "hub", "lab", "box", "kit", "pro", "max", "top",
    "best", "fast", "easy", "smart", "super", "mega", "cloud", "data", "code", "dev", "tech",
    "web", "net", "link", "sync", "flow", "stream", "wave", "spark", "bolt", "flash", "swift",
    "quick", "zen", "nova", "pixel", "byte", "bit", "node", "mesh", "grid", "stack", "ai", "ml",
    "api", "io", "fx", "hq", "os", "ux", "ui",
];

/// Endings that read as tech/startup brands
pub const VALUABLE_SUFFIXES: &[&str] = &[
    "ly", "ify", "io", "fy", "er", "hub", "lab", "box", "hq", "ai", "app", "dev", "pro", "max",
    "able", "ful",
];

/// Resale value of common TLDs
pub const TLD_VALUES: &[(&str, f64)] = &[
    ("com", 1.0),
    ("io", 0.9),
    ("co", 0.85),
    ("ai", 0.9),
    ("app", 0.8),
    ("dev", 0.8),
    ("net", 0.7),
    ("org", 0.65),
    ("xyz", 0.5),
    ("one", 0.6),
    ("tech", 0.7),
];

/// Letters that are easy to type and spell out
pub const EASY_CHARS: &str = "abcdefghijklmnoprstuvwy";

const UNKNOWN_TLD_VALUE: f64 = 0.4;

/// Lookup tables behind the premium rubric
#[derive(Debug, Clone, PartialEq)]
pub struct PremiumTables {
    pub valuable_words: Vec<String>,
    pub valuable_suffixes: Vec<String>,
    pub tld_values: HashMap<String, f64>,
    pub unknown_tld_value: f64,
    pub easy_chars: String,
}

impl Default for PremiumTables {
    fn default() -> Self {
        Self {
            valuable_words: VALUABLE_WORDS.iter().map(|w| w.to_string()).collect(),
            valuable_suffixes: VALUABLE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            tld_values: TLD_VALUES
                .iter()
                .map(|(tld, value)| (tld.to_string(), *value))
                .collect(),
            unknown_tld_value: UNKNOWN_TLD_VALUE,
            easy_chars: EASY_CHARS.to_string(),
        }
    }
}

/// Scores commercial brandability of a domain
#[derive(Debug, Clone, Default)]
pub struct PremiumScorer {
    tables: PremiumTables,
}

fn is_alpha(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphabetic())
}

/// Any character repeated three or more times in a row
fn has_triple_run(name: &str) -> bool {
    let chars: Vec<char> = name.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Two or more rare letters (x, z, q) in a row
fn has_rare_run(name: &str) -> bool {
    let rare = |c: char| matches!(c, 'x' | 'z' | 'q');
    let chars: Vec<char> = name.chars().collect();
    chars.windows(2).any(|w| rare(w[0]) && rare(w[1]))
}

/// Shorter is better
pub fn length_score(name: &str) -> f64 {
    match name.chars().count() {
        0..=4 => 1.0,
        5..=6 => 0.9,
        7..=8 => 0.7,
        9..=10 => 0.5,
        11..=12 => 0.4,
        _ => 0.3,
    }
}

/// Clean, all-letter names without hyphens or stutters
pub fn pattern_score(name: &str) -> f64 {
    let name = name.to_lowercase();
    let mut score: f64 = 0.5;

    if is_alpha(&name) {
        score += 0.2;
    }
    if !has_triple_run(&name) {
        score += 0.1;
    }
    if name.chars().next().is_some_and(|c| c.is_alphabetic()) {
        score += 0.1;
    }
    if !name.contains('-') {
        score += 0.1;
    }

    score.min(1.0)
}

impl PremiumScorer {
    pub fn new(tables: PremiumTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &PremiumTables {
        &self.tables
    }

    /// Bonuses for a valuable word anywhere, a valuable ending, and being a
    /// short plain word
    pub fn word_score(&self, name: &str) -> f64 {
        let name = name.to_lowercase();
        let mut score: f64 = 0.5;

        if self.tables.valuable_words.iter().any(|w| name.contains(w.as_str())) {
            score += 0.2;
        }
        if self.tables.valuable_suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            score += 0.15;
        }
        if is_alpha(&name) && name.chars().count() <= 8 {
            score += 0.1;
        }

        score.min(1.0)
    }

    pub fn tld_score(&self, tld: &str) -> f64 {
        self.tables
            .tld_values
            .get(&tld.to_lowercase())
            .copied()
            .unwrap_or(self.tables.unknown_tld_value)
    }

    /// How easy the name is to remember and type
    pub fn memorability_score(&self, name: &str) -> f64 {
        let name = name.to_lowercase();
        let len = name.chars().count();
        let mut score: f64 = 0.5;

        if len <= 7 {
            score += 0.2;
        }
        if name.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')) {
            score += 0.1;
        }
        if !has_rare_run(&name) {
            score += 0.1;
        }
        if len > 0 {
            let easy = name.chars().filter(|c| self.tables.easy_chars.contains(*c)).count();
            score += easy as f64 / len as f64 * 0.1;
        }

        score.min(1.0)
    }

    pub fn check_domain(&self, name: &str, tld: &str) -> PremiumResult {
        let length = length_score(name);
        let word = self.word_score(name);
        let tld = self.tld_score(tld);
        let pattern = pattern_score(name);
        let memorability = self.memorability_score(name);

        let overall =
            length * 0.25 + word * 0.20 + tld * 0.20 + pattern * 0.15 + memorability * 0.20;

        PremiumResult {
            length_score: round3(length),
            word_score: round3(word),
            tld_score: round3(tld),
            pattern_score: round3(pattern),
            memorability_score: round3(memorability),
            overall: round3(overall),
        }
    }

    /// Mean premium score across every domain in a response
    pub fn score_domains(&self, domains: &[DomainCandidate]) -> PremiumResult {
        if domains.is_empty() {
            return PremiumResult::default();
        }

        let results: Vec<PremiumResult> = domains
            .iter()
            .map(|d| self.check_domain(&d.name, &d.tld))
            .collect();
        let n = results.len() as f64;
        let mean = |f: fn(&PremiumResult) -> f64| round3(results.iter().map(f).sum::<f64>() / n);

        PremiumResult {
            length_score: mean(|r| r.length_score),
            word_score: mean(|r| r.word_score),
            tld_score: mean(|r| r.tld_score),
            pattern_score: mean(|r| r.pattern_score),
            memorability_score: mean(|r| r.memorability_score),
            overall: mean(|r| r.overall),
        }
    }

    pub fn check_response(&self, response: &str) -> PremiumResult {
        self.score_domains(&extract_domains(response))
    }
}
