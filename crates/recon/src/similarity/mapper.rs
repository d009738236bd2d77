//! Header correspondence suggestions from name similarity.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::ratio::ratio;
use crate::mapping::ColumnMapping;

/// Configuration for the header mapper.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// A fuzzy candidate is accepted only if its ratio is strictly above this.
    pub threshold: f64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self { threshold: 0.6 }
    }
}

/// A proposed correspondence between a reference and a target header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSuggestion {
    /// Reference header.
    pub source: String,
    /// Target header.
    pub target: String,
    /// Similarity in `[0, 1]`; `1.0` for case-insensitive equality.
    pub score: f64,
    /// Whether the headers are equal ignoring case.
    pub exact: bool,
}

/// Proposes a [`ColumnMapping`] between two header lists.
///
/// For each reference header, the target headers are scanned in order. A
/// case-insensitive exact match wins immediately. Otherwise the target with
/// the highest lower-cased similarity ratio is kept, earlier targets winning
/// ties, and accepted only if it beats the threshold.
#[derive(Debug, Clone, Default)]
pub struct HeaderSimilarityMapper {
    config: MapperConfig,
}

impl HeaderSimilarityMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Case-insensitive similarity between two headers.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        ratio(&a.to_lowercase(), &b.to_lowercase())
    }

    /// Best qualifying target for a single reference header, if any.
    pub fn best_match<S: AsRef<str>>(&self, source: &str, targets: &[S]) -> Option<MappingSuggestion> {
        let source_lower = source.to_lowercase();
        let mut best: Option<(&str, f64)> = None;

        for target in targets {
            let target = target.as_ref();
            let target_lower = target.to_lowercase();

            if source_lower == target_lower {
                return Some(MappingSuggestion {
                    source: source.to_string(),
                    target: target.to_string(),
                    score: 1.0,
                    exact: true,
                });
            }

            let score = ratio(&source_lower, &target_lower);
            let improves = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if improves && score > self.config.threshold {
                best = Some((target, score));
            }
        }

        best.map(|(target, score)| MappingSuggestion {
            source: source.to_string(),
            target: target.to_string(),
            score,
            exact: false,
        })
    }

    /// One suggestion per reference header that has a qualifying target,
    /// in reference header order.
    pub fn suggest<S: AsRef<str>, T: AsRef<str>>(
        &self,
        reference: &[S],
        target: &[T],
    ) -> Vec<MappingSuggestion> {
        let suggestions: Vec<MappingSuggestion> = reference
            .iter()
            .filter_map(|source| {
                let suggestion = self.best_match(source.as_ref(), target);
                match &suggestion {
                    Some(s) => trace!(
                        source = %s.source,
                        target = %s.target,
                        score = s.score,
                        exact = s.exact,
                        "header matched"
                    ),
                    None => trace!(source = source.as_ref(), "header left unmapped"),
                }
                suggestion
            })
            .collect();

        debug!(
            reference_headers = reference.len(),
            target_headers = target.len(),
            mapped = suggestions.len(),
            threshold = self.config.threshold,
            "derived column mapping"
        );

        suggestions
    }

    /// Derive a fresh mapping from scratch.
    pub fn propose<S: AsRef<str>, T: AsRef<str>>(&self, reference: &[S], target: &[T]) -> ColumnMapping {
        self.suggest(reference, target)
            .into_iter()
            .map(|s| (s.source, s.target))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> HeaderSimilarityMapper {
        HeaderSimilarityMapper::new()
    }

    #[test]
    fn test_exact_match_ignores_case() {
        let m = mapper().best_match("USERNAME", &["email", "username"]).unwrap();
        assert_eq!(m.target, "username");
        assert_eq!(m.score, 1.0);
        assert!(m.exact);
    }

    #[test]
    fn test_exact_match_overrides_earlier_fuzzy_candidate() {
        // "ids" scores 0.8 against "id" but the later exact match wins.
        let m = mapper().best_match("id", &["ids", "ID"]).unwrap();
        assert_eq!(m.target, "ID");
        assert!(m.exact);
    }

    #[test]
    fn test_exact_match_stops_scan() {
        // Nothing after the exact match can replace it.
        let m = mapper().best_match("name", &["Name", "name"]).unwrap();
        assert_eq!(m.target, "Name");
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let m = mapper()
            .best_match("First Name", &["Email", "firstname"])
            .unwrap();
        assert_eq!(m.target, "firstname");
        assert!(!m.exact);
        assert!(m.score > 0.9);
    }

    #[test]
    fn test_ties_keep_first_target() {
        let m = mapper().best_match("name", &["namex", "names"]).unwrap();
        assert_eq!(m.target, "namex");
    }

    #[test]
    fn test_ratio_at_threshold_is_rejected() {
        // "abc" common, 2 * 3 / 10 == 0.6 exactly.
        assert_eq!(mapper().score("abcde", "abcxy"), 0.6);
        assert!(mapper().best_match("abcde", &["abcxy"]).is_none());
    }

    #[test]
    fn test_unrelated_headers_unmapped() {
        assert!(mapper().best_match("Role", &["Department", "Project"]).is_none());
    }

    #[test]
    fn test_custom_threshold() {
        let strict = HeaderSimilarityMapper::with_config(MapperConfig { threshold: 0.95 });
        assert!(strict.best_match("First Name", &["firstname"]).is_none());
    }

    #[test]
    fn test_propose_preserves_reference_order() {
        let reference = ["Username", "First Name", "Last Name", "Role"];
        let target = ["Last Name", "first name", "User Name", "Project"];

        let mapping = mapper().propose(&reference, &target);

        assert_eq!(
            mapping.iter().collect::<Vec<_>>(),
            vec![
                ("Username", "User Name"),
                ("First Name", "first name"),
                ("Last Name", "Last Name"),
            ]
        );
    }

    #[test]
    fn test_propose_is_deterministic() {
        let reference = ["Email Address", "Surname", "Given"];
        let target = ["email", "surname_", "given name"];
        let m = mapper();
        assert_eq!(m.propose(&reference, &target), m.propose(&reference, &target));
    }
}
