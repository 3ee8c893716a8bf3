use crate::core::{extractor::extract_names, round3, ScoringError};
use crate::models::PronounceabilityResult;
use regex::Regex;
use std::sync::LazyLock;

const VOWELS: &str = "aeiouy";

/// Patterns that make a name easier to say
pub const GOOD_PATTERNS: &[&str] = &[
    r"[aeiou]",
    r"[bcdfghjklmnprstvwz][aeiou]",
    r"[aeiou][bcdfghjklmnprstvwz]",
    r"ing$",
    r"ify$",
    r"ly$",
    r"io$",
    r"ia$",
    r"^[bcdfghjklmnprstvw]",
];

/// Patterns that make a name hard to say
pub const BAD_PATTERNS: &[&str] = &[
    r"[bcdfghjkmnpqstvwxz]{4,}",
    r"[aeiou]{3,}",
    r"[qxz]{2,}",
    r"^[xz]",
    r"[0-9]{3,}",
    r"[bcdfghjklmnpqrstvwxz]$",
];

static DEFAULT_PATTERNS: LazyLock<PhoneticPatterns> = LazyLock::new(|| {
    PhoneticPatterns::compile(GOOD_PATTERNS, BAD_PATTERNS).expect("built-in phonetic patterns are valid")
});

/// Compiled good/bad pattern tables
#[derive(Debug, Clone)]
pub struct PhoneticPatterns {
    good: Vec<Regex>,
    bad: Vec<Regex>,
}

impl PhoneticPatterns {
    pub fn compile<S: AsRef<str>>(good: &[S], bad: &[S]) -> Result<Self, ScoringError> {
        let compile_all = |patterns: &[S]| -> Result<Vec<Regex>, ScoringError> {
            patterns
                .iter()
                .map(|p| Regex::new(p.as_ref()).map_err(ScoringError::from))
                .collect()
        };

        Ok(Self {
            good: compile_all(good)?,
            bad: compile_all(bad)?,
        })
    }
}

impl Default for PhoneticPatterns {
    fn default() -> Self {
        DEFAULT_PATTERNS.clone()
    }
}

/// Scores how easy a name is to say out loud
#[derive(Debug, Clone, Default)]
pub struct PronounceabilityScorer {
    patterns: PhoneticPatterns,
}

/// Banded score around the ideal vowel ratio of 0.30 - 0.50
pub fn vowel_ratio_score(alpha_name: &str) -> f64 {
    let letters: Vec<char> = alpha_name.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return 0.0;
    }

    let vowels = letters.iter().filter(|c| VOWELS.contains(**c)).count();
    let ratio = vowels as f64 / letters.len() as f64;

    if (0.30..=0.50).contains(&ratio) {
        1.0
    } else if (0.20..0.30).contains(&ratio) || (ratio > 0.50 && ratio <= 0.60) {
        0.7
    } else if (0.10..0.20).contains(&ratio) || (ratio > 0.60 && ratio <= 0.70) {
        0.4
    } else {
        0.2
    }
}

/// Ideal length is 5-10 characters
pub fn length_score(name: &str) -> f64 {
    match name.chars().count() {
        5..=10 => 1.0,
        4..=12 => 0.8,
        3..=15 => 0.6,
        _ => 0.3,
    }
}

impl PronounceabilityScorer {
    pub fn new(patterns: PhoneticPatterns) -> Self {
        Self { patterns }
    }

    /// 1.0 with no bad-pattern matches, decaying with each additional match
    pub fn consonant_cluster_score(&self, name: &str) -> f64 {
        let bad_count: usize = self
            .patterns
            .bad
            .iter()
            .map(|re| re.find_iter(name).count())
            .sum();

        match bad_count {
            0 => 1.0,
            1 => 0.7,
            2 => 0.4,
            _ => 0.2,
        }
    }

    /// Number of good patterns present, where four is already perfect
    pub fn pattern_score(&self, name: &str) -> f64 {
        let good_count = self.patterns.good.iter().filter(|re| re.is_match(name)).count();
        (good_count as f64 / 4.0).min(1.0)
    }

    /// Score one name; digits and hyphens are ignored except for length
    pub fn check_name(&self, name: &str) -> PronounceabilityResult {
        let lowered = name.to_lowercase();
        let alpha_name: String = lowered.chars().filter(|c| c.is_ascii_lowercase()).collect();

        if alpha_name.is_empty() {
            return PronounceabilityResult::default();
        }

        let vowel = vowel_ratio_score(&alpha_name);
        let cluster = self.consonant_cluster_score(&alpha_name);
        let pattern = self.pattern_score(&alpha_name);
        let length = length_score(name);

        let overall = vowel * 0.25 + cluster * 0.35 + pattern * 0.25 + length * 0.15;

        PronounceabilityResult {
            vowel_ratio: round3(vowel),
            consonant_cluster_score: round3(cluster),
            pattern_score: round3(pattern),
            length_score: round3(length),
            overall: round3(overall),
        }
    }

    /// Mean pronounceability of every name in a response
    pub fn score_names(&self, names: &[String]) -> PronounceabilityResult {
        if names.is_empty() {
            return PronounceabilityResult::default();
        }

        let results: Vec<PronounceabilityResult> =
            names.iter().map(|name| self.check_name(name)).collect();
        let n = results.len() as f64;
        let mean = |f: fn(&PronounceabilityResult) -> f64| {
            round3(results.iter().map(f).sum::<f64>() / n)
        };

        PronounceabilityResult {
            vowel_ratio: mean(|r| r.vowel_ratio),
            consonant_cluster_score: mean(|r| r.consonant_cluster_score),
            pattern_score: mean(|r| r.pattern_score),
            length_score: mean(|r| r.length_score),
            overall: mean(|r| r.overall),
        }
    }

    pub fn check_response(&self, response: &str) -> PronounceabilityResult {
        self.score_names(&extract_names(response))
    }
}
