use crate::core::{extractor::extract_names, round3};
use crate::models::{CrossBatchDiversity, DiversityResult, FrequencyEntry};
use std::collections::{HashMap, HashSet};

/// Tunables for the diversity rubric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversityParams {
    /// Character n-gram size used for the type-token ratio
    pub ngram_size: usize,
    /// Affix length for per-response prefix/suffix diversity
    pub affix_len: usize,
    /// Size of the symbol alphabet (a-z, 0-9)
    pub alphabet_size: usize,
    /// Affix length for corpus-level most-common prefixes/suffixes
    pub corpus_affix_len: usize,
    /// Number of entries kept in each most-common list
    pub top_k: usize,
}

impl Default for DiversityParams {
    fn default() -> Self {
        Self {
            ngram_size: 3,
            affix_len: 2,
            alphabet_size: 36,
            corpus_affix_len: 3,
            top_k: 10,
        }
    }
}

/// Measures lexical variety within one response and across a corpus
#[derive(Debug, Clone, Default)]
pub struct DiversityScorer {
    params: DiversityParams,
}

fn char_ngrams(name: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    if n == 0 || chars.len() < n {
        return Vec::new();
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}

fn prefix(name: &str, len: usize) -> Option<String> {
    if name.chars().count() < len {
        return None;
    }
    Some(name.chars().take(len).collect())
}

fn suffix(name: &str, len: usize) -> Option<String> {
    let count = name.chars().count();
    if count < len {
        return None;
    }
    Some(name.chars().skip(count - len).collect())
}

fn unique_ratio(items: &[String]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&String> = items.iter().collect();
    unique.len() as f64 / items.len() as f64
}

/// Count occurrences and return the `k` most frequent, ties in first-seen order
fn most_common<I>(values: I, k: usize) -> Vec<FrequencyEntry>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<FrequencyEntry> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(value.clone(), entries.len());
                entries.push(FrequencyEntry { value, count: 1 });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(k);
    entries
}

impl DiversityScorer {
    pub fn new(params: DiversityParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DiversityParams {
        &self.params
    }

    /// Unique n-grams over total n-grams across all names
    ///
    /// When no name is long enough to produce an n-gram the set is trivially
    /// diverse (1.0).
    pub fn type_token_ratio(&self, names: &[String]) -> f64 {
        if names.is_empty() {
            return 0.0;
        }

        let ngrams: Vec<String> = names
            .iter()
            .flat_map(|name| char_ngrams(name, self.params.ngram_size))
            .collect();

        if ngrams.is_empty() {
            return 1.0;
        }
        unique_ratio(&ngrams)
    }

    /// Share of names that repeat an earlier one
    pub fn duplicate_rate(&self, names: &[String]) -> f64 {
        if names.is_empty() {
            return 0.0;
        }
        let unique: HashSet<&String> = names.iter().collect();
        (names.len() - unique.len()) as f64 / names.len() as f64
    }

    /// Distinct characters used, relative to the full alphabet
    pub fn char_diversity(&self, names: &[String]) -> f64 {
        let chars: HashSet<char> = names.iter().flat_map(|n| n.chars()).collect();
        if chars.is_empty() || self.params.alphabet_size == 0 {
            return 0.0;
        }
        (chars.len() as f64 / self.params.alphabet_size as f64).min(1.0)
    }

    pub fn prefix_diversity(&self, names: &[String]) -> f64 {
        let prefixes: Vec<String> = names
            .iter()
            .filter_map(|n| prefix(n, self.params.affix_len))
            .collect();
        unique_ratio(&prefixes)
    }

    pub fn suffix_diversity(&self, names: &[String]) -> f64 {
        let suffixes: Vec<String> = names
            .iter()
            .filter_map(|n| suffix(n, self.params.affix_len))
            .collect();
        unique_ratio(&suffixes)
    }

    /// Score a list of names extracted from one response
    pub fn score_names(&self, names: &[String]) -> DiversityResult {
        if names.is_empty() {
            return DiversityResult::empty();
        }

        let ttr = self.type_token_ratio(names);
        let dup_rate = self.duplicate_rate(names);
        let char_div = self.char_diversity(names);
        let prefix_div = self.prefix_diversity(names);
        let suffix_div = self.suffix_diversity(names);

        let overall = (ttr + (1.0 - dup_rate) + char_div + prefix_div + suffix_div) / 5.0;

        DiversityResult {
            type_token_ratio: round3(ttr),
            duplicate_rate: round3(dup_rate),
            char_diversity: round3(char_div),
            prefix_diversity: round3(prefix_div),
            suffix_diversity: round3(suffix_div),
            overall: round3(overall),
        }
    }

    pub fn check_diversity(&self, response: &str) -> DiversityResult {
        self.score_names(&extract_names(response))
    }

    /// Repetition statistics over every name generated for a corpus
    pub fn cross_batch(&self, all_names: &[String]) -> CrossBatchDiversity {
        let total_names = all_names.len();
        let unique_names = all_names.iter().collect::<HashSet<_>>().len();
        let unique_ratio = if total_names == 0 {
            0.0
        } else {
            round3(unique_names as f64 / total_names as f64)
        };

        let k = self.params.top_k;
        let affix_len = self.params.corpus_affix_len;

        CrossBatchDiversity {
            total_names,
            unique_names,
            unique_ratio,
            most_common_names: most_common(all_names.iter().cloned(), k),
            most_common_prefixes: most_common(
                all_names.iter().filter_map(|n| prefix(n, affix_len)),
                k,
            ),
            most_common_suffixes: most_common(
                all_names.iter().filter_map(|n| suffix(n, affix_len)),
                k,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_names() {
        let scorer = DiversityScorer::default();
        let result = scorer.score_names(&names(&["brewlo"; 6]));

        assert_eq!(result.duplicate_rate, 0.833);
        // 4 distinct 3-grams out of 24
        assert_eq!(result.type_token_ratio, 0.167);
        assert_eq!(result.prefix_diversity, 0.167);
        assert_eq!(result.suffix_diversity, 0.167);
    }

    #[test]
    fn test_short_names_are_trivially_diverse() {
        let scorer = DiversityScorer::default();
        assert_eq!(scorer.type_token_ratio(&names(&["ab", "cd"])), 1.0);
    }

    #[test]
    fn test_empty_response_is_worst_case() {
        let scorer = DiversityScorer::default();
        let result = scorer.check_diversity("no domains here");
        assert_eq!(result, DiversityResult::empty());
        assert_eq!(result.duplicate_rate, 1.0);
    }

    #[test]
    fn test_char_diversity_caps_at_one() {
        let scorer = DiversityScorer::default();
        let all = names(&["abcdefghijklmnopqrstuvwxyz0123456789", "more"]);
        assert_eq!(scorer.char_diversity(&all), 1.0);
    }

    #[test]
    fn test_most_common_ties_keep_first_seen_order() {
        let entries = most_common(names(&["b", "a", "a", "b", "c"]), 2);
        assert_eq!(entries[0].value, "b");
        assert_eq!(entries[1].value, "a");
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_cross_batch_counts() {
        let scorer = DiversityScorer::default();
        let all = names(&["novaly", "novaly", "brewio", "novatek"]);
        let stats = scorer.cross_batch(&all);

        assert_eq!(stats.total_names, 4);
        assert_eq!(stats.unique_names, 3);
        assert_eq!(stats.unique_ratio, 0.75);
        assert_eq!(stats.most_common_names[0].value, "novaly");
        assert_eq!(stats.most_common_names[0].count, 2);
        assert_eq!(stats.most_common_prefixes[0].value, "nov");
        assert_eq!(stats.most_common_prefixes[0].count, 3);
    }

    #[test]
    fn test_cross_batch_empty_corpus() {
        let stats = DiversityScorer::default().cross_batch(&[]);
        assert_eq!(stats.total_names, 0);
        assert_eq!(stats.unique_ratio, 0.0);
        assert!(stats.most_common_names.is_empty());
    }
}
