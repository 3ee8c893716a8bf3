use crate::core::{extractor::extract_domains, round3};
use crate::models::{ConstraintResult, DomainCandidate};
use regex::Regex;
use std::sync::LazyLock;

static LENGTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"length\s*(\d+)\s*-\s*(\d+)").expect("length pattern is valid"));

static TLD_LIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"use tlds?:\s*([^.]*(?:\.[a-z]+[,\s]*)+)").expect("tld list pattern is valid")
});

static TLD_ITEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([a-z]+)").expect("tld item pattern is valid"));

static INCLUDE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"must include\s*["']([^"']+)["']"#).expect("include pattern is valid")
});

static START_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"must start with\s*["']([^"']+)["']"#).expect("start pattern is valid")
});

static END_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"must end with\s*["']([^"']+)["']"#).expect("end pattern is valid")
});

static COUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"generate\s+(\d+)").expect("count pattern is valid"));

/// Found/target ratios inside this band count as fully satisfied
const COUNT_TOLERANCE_LOW: f64 = 0.8;
const COUNT_TOLERANCE_HIGH: f64 = 1.2;

/// Inclusive name length range, from "Length 4-10"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    pub fn contains(&self, len: usize) -> bool {
        self.min <= len && len <= self.max
    }
}

/// Required substring and/or suffix
///
/// "must start with" is stored in `required` and, like "must include",
/// is satisfied by the substring appearing anywhere in the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixRule {
    pub required: Option<String>,
    pub suffix: Option<String>,
}

impl AffixRule {
    /// A name satisfies the rule if it contains the required substring or,
    /// failing that, ends with the suffix. Both are never demanded together.
    pub fn matches(&self, name: &str) -> bool {
        if let Some(required) = &self.required {
            if name.contains(required.as_str()) {
                return true;
            }
        }
        if let Some(suffix) = &self.suffix {
            if name.ends_with(suffix.as_str()) {
                return true;
            }
        }
        false
    }
}

/// Constraints declared in a prompt; each is independent and optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptConstraints {
    pub length: Option<LengthRange>,
    pub tlds: Option<Vec<String>>,
    pub affix: Option<AffixRule>,
    pub count: Option<usize>,
}

impl PromptConstraints {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            length: extract_length_constraint(prompt),
            tlds: extract_tld_constraint(prompt),
            affix: extract_affix_constraint(prompt),
            count: extract_count_constraint(prompt),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.length.is_none() && self.tlds.is_none() && self.affix.is_none() && self.count.is_none()
    }
}

/// "Length A-B" (case-insensitive)
pub fn extract_length_constraint(prompt: &str) -> Option<LengthRange> {
    let prompt = prompt.to_lowercase();
    let caps = LENGTH_PATTERN.captures(&prompt)?;
    Some(LengthRange {
        min: caps[1].parse().ok()?,
        max: caps[2].parse().ok()?,
    })
}

/// "Use TLDs: .com, .io"; an empty list counts as no constraint
pub fn extract_tld_constraint(prompt: &str) -> Option<Vec<String>> {
    let prompt = prompt.to_lowercase();
    let caps = TLD_LIST_PATTERN.captures(&prompt)?;
    let tlds: Vec<String> = TLD_ITEM_PATTERN
        .captures_iter(&caps[1])
        .map(|item| item[1].to_string())
        .collect();

    if tlds.is_empty() {
        None
    } else {
        Some(tlds)
    }
}

/// "Must include 'x'", "Must start with 'x'" (overrides include), "Must end with 'x'"
pub fn extract_affix_constraint(prompt: &str) -> Option<AffixRule> {
    let prompt = prompt.to_lowercase();

    let included = INCLUDE_PATTERN.captures(&prompt).map(|c| c[1].to_string());
    let started = START_PATTERN.captures(&prompt).map(|c| c[1].to_string());
    let suffix = END_PATTERN.captures(&prompt).map(|c| c[1].to_string());

    let required = started.or(included);
    if required.is_none() && suffix.is_none() {
        return None;
    }

    Some(AffixRule { required, suffix })
}

/// "Generate N"; a target of zero is treated as absent
pub fn extract_count_constraint(prompt: &str) -> Option<usize> {
    let prompt = prompt.to_lowercase();
    let caps = COUNT_PATTERN.captures(&prompt)?;
    caps[1].parse().ok().filter(|&n: &usize| n > 0)
}

/// Score the number of suggestions against the requested count
///
/// 1.0 inside the 80%-120% band, `ratio / 0.8` below it, `1.2 / ratio` above.
pub fn count_score(found: usize, target: usize) -> f64 {
    if target == 0 {
        return 1.0;
    }

    let ratio = found as f64 / target as f64;
    if (COUNT_TOLERANCE_LOW..=COUNT_TOLERANCE_HIGH).contains(&ratio) {
        1.0
    } else if ratio < COUNT_TOLERANCE_LOW {
        ratio / COUNT_TOLERANCE_LOW
    } else {
        COUNT_TOLERANCE_HIGH / ratio
    }
}

fn fraction<F>(domains: &[DomainCandidate], predicate: F) -> f64
where
    F: Fn(&DomainCandidate) -> bool,
{
    if domains.is_empty() {
        return 0.0;
    }
    domains.iter().filter(|d| predicate(*d)).count() as f64 / domains.len() as f64
}

/// Score already-extracted domains against already-parsed constraints
pub fn score_constraints(
    constraints: &PromptConstraints,
    domains: &[DomainCandidate],
) -> ConstraintResult {
    // No output at all is a total failure, not vacuous success
    if domains.is_empty() {
        return ConstraintResult::default();
    }

    let length_satisfied = match constraints.length {
        Some(range) => fraction(domains, |d| range.contains(d.name.chars().count())),
        None => 1.0,
    };

    let tld_satisfied = match &constraints.tlds {
        Some(tlds) => fraction(domains, |d| tlds.contains(&d.tld)),
        None => 1.0,
    };

    let prefix_suffix_satisfied = match &constraints.affix {
        Some(rule) => fraction(domains, |d| rule.matches(&d.name)),
        None => 1.0,
    };

    let count_satisfied = match constraints.count {
        Some(target) => count_score(domains.len(), target),
        None => 1.0,
    };

    let overall =
        (length_satisfied + tld_satisfied + prefix_suffix_satisfied + count_satisfied) / 4.0;

    ConstraintResult {
        length_satisfied: round3(length_satisfied),
        tld_satisfied: round3(tld_satisfied),
        prefix_suffix_satisfied: round3(prefix_suffix_satisfied),
        count_satisfied: round3(count_satisfied),
        overall: round3(overall),
    }
}

/// Check how well a response follows the constraints declared in its prompt
pub fn check_constraints(prompt: &str, response: &str) -> ConstraintResult {
    let constraints = PromptConstraints::from_prompt(prompt);
    let domains = extract_domains(response);
    score_constraints(&constraints, &domains)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMPT: &str = "Generate 6 brandable domain names for a research assistant. \
        Style: technical. Length 4-10. Constraints: Must include \"nova\". Use TLDs: .com, .one, .ai.";

    #[test]
    fn test_extracts_each_constraint() {
        let constraints = PromptConstraints::from_prompt(PROMPT);
        assert_eq!(constraints.length, Some(LengthRange { min: 4, max: 10 }));
        assert_eq!(
            constraints.tlds,
            Some(vec!["com".to_string(), "one".to_string(), "ai".to_string()])
        );
        assert_eq!(
            constraints.affix,
            Some(AffixRule {
                required: Some("nova".to_string()),
                suffix: None
            })
        );
        assert_eq!(constraints.count, Some(6));
    }

    #[test]
    fn test_absent_constraints() {
        let constraints = PromptConstraints::from_prompt("Suggest some names for a bakery");
        assert!(constraints.is_empty());
    }

    #[test]
    fn test_start_with_overrides_include() {
        let rule = extract_affix_constraint("Must include 'ly'. Must start with 'go'").unwrap();
        assert_eq!(rule.required.as_deref(), Some("go"));
    }

    #[test]
    fn test_suffix_only_rule() {
        let rule = extract_affix_constraint("Must end with 'ify'").unwrap();
        assert!(rule.matches("brandify"));
        assert!(!rule.matches("ifybrand"));
    }

    #[test]
    fn test_required_substring_matches_anywhere() {
        let rule = AffixRule {
            required: Some("nova".to_string()),
            suffix: Some("ly".to_string()),
        };
        assert!(rule.matches("abnovax"));
        assert!(rule.matches("brightly"));
        assert!(!rule.matches("zento"));
    }

    #[test]
    fn test_count_score_band() {
        assert_eq!(count_score(5, 5), 1.0);
        assert_eq!(count_score(4, 5), 1.0);
        assert_eq!(count_score(6, 5), 1.0);
        assert!((count_score(2, 5) - 0.5).abs() < 1e-9);
        assert!((count_score(12, 5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_generate_zero_is_ignored() {
        assert_eq!(extract_count_constraint("Generate 0 names"), None);
    }

    #[test]
    fn test_no_domains_scores_zero_everywhere() {
        let result = check_constraints(PROMPT, "I could not think of anything.");
        assert_eq!(result, ConstraintResult::default());

        let unconstrained = check_constraints("anything", "");
        assert_eq!(unconstrained.overall, 0.0);
    }

    #[test]
    fn test_partial_satisfaction() {
        let response = "- slnovai.com — a\n- stnova.ai — b\n- verylongnovaname.xyz — c";
        let result = check_constraints(PROMPT, response);
        assert_eq!(result.length_satisfied, 0.667);
        assert_eq!(result.tld_satisfied, 0.667);
        assert_eq!(result.prefix_suffix_satisfied, 1.0);
        // 3 of 6 requested -> ratio 0.5 -> 0.625
        assert_eq!(result.count_satisfied, 0.625);
    }
}
