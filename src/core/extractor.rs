use crate::models::DomainCandidate;
use regex::Regex;
use std::sync::LazyLock;

/// A domain suggestion is `name.tld` followed by a dash-like separator
/// (hyphen, em dash or en dash) introducing its rationale, e.g.
/// `- slnovai.com — Compact brand feel`.
static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-z0-9-]+)\.([a-z]{2,10})\s*[—\-–]").expect("domain pattern is valid")
});

/// Parse every `(name, tld)` pair out of a response, in reading order
///
/// Matching is done on the lowercased text, so the returned candidates are
/// lowercase. Lines that do not follow the `domain — rationale` convention
/// are skipped; an empty result is a valid outcome.
pub fn extract_domains(response: &str) -> Vec<DomainCandidate> {
    let lowered = response.to_lowercase();

    DOMAIN_PATTERN
        .captures_iter(&lowered)
        .map(|caps| DomainCandidate::new(&caps[1], &caps[2]))
        .collect()
}

/// Same as [`extract_domains`] but keeps only the name part
pub fn extract_names(response: &str) -> Vec<String> {
    extract_domains(response)
        .into_iter()
        .map(|candidate| candidate.name)
        .collect()
}

/// Render extracted domains as `name.tld` strings, de-duplicated in
/// first-seen order
pub fn unique_domains<'a, I>(responses: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut domains = Vec::new();

    for response in responses {
        for candidate in extract_domains(response) {
            let domain = candidate.domain();
            if seen.insert(domain.clone()) {
                domains.push(domain);
            }
        }
    }

    domains
}
