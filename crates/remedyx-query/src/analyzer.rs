//! Medical query analysis: abbreviation expansion, spell correction, and
//! typed entity extraction.
//!
//! `analyze` is a pure function of the raw query plus the static lexicon.
//! Malformed or empty input degrades to an analysis with no entities and
//! `expanded == original`; it never fails.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use remedyx_lexicon::MedicalLexicon;
use tracing::debug;

use remedyx_common::{EngineConfig, Entity, EntityType, QueryAnalysis};

/// Confidence assigned to dictionary matches.
const DICTIONARY_CONFIDENCE: f64 = 0.95;
/// Confidence assigned to pattern-derived dosage entities.
const DOSAGE_CONFIDENCE: f64 = 0.85;

pub struct QueryAnalyzer {
    lexicon: Arc<MedicalLexicon>,
    dosage_pattern: Regex,
    max_edit_distance: usize,
    min_correction_len: usize,
    dosage_adjacency_window: usize,
}

impl QueryAnalyzer {
    pub fn new(lexicon: Arc<MedicalLexicon>, config: &EngineConfig) -> Self {
        // <number><unit>, optionally separated by whitespace
        let dosage_pattern = Regex::new(
            r"(?i)\b(\d+(?:\.\d+)?)\s*(mg|mcg|g|ml|l|units?|iu|milligrams?|micrograms?|milliliters?|grams?)\b",
        )
        .expect("dosage pattern is valid");

        Self {
            lexicon,
            dosage_pattern,
            max_edit_distance: config.max_edit_distance,
            min_correction_len: config.min_correction_len,
            dosage_adjacency_window: config.dosage_adjacency_window,
        }
    }

    pub fn analyze(&self, raw: &str) -> QueryAnalysis {
        if raw.trim().is_empty() {
            return QueryAnalysis {
                original: raw.to_string(),
                expanded: raw.to_string(),
                entities: Vec::new(),
                corrections: HashMap::new(),
                expansions: HashMap::new(),
            };
        }

        let (expanded, expansions, corrections) = self.rewrite_tokens(raw);
        let entities = self.extract_entities(&expanded);

        if !expansions.is_empty() || !corrections.is_empty() {
            debug!(?expansions, ?corrections, "query rewritten");
        }

        QueryAnalysis {
            original: raw.to_string(),
            expanded,
            entities,
            corrections,
            expansions,
        }
    }

    /// Token-wise rewrite of the raw query: abbreviation expansion first,
    /// then spell correction for tokens the lexicon does not know.
    /// Separators between tokens are preserved byte-for-byte.
    fn rewrite_tokens(
        &self,
        raw: &str,
    ) -> (String, HashMap<String, String>, HashMap<String, String>) {
        let mut expanded = String::with_capacity(raw.len());
        let mut expansions = HashMap::new();
        let mut corrections = HashMap::new();
        let mut prev_end = 0;

        for (start, end) in tokenize(raw) {
            expanded.push_str(&raw[prev_end..start]);
            let token = &raw[start..end];

            if let Some(expansion) = self.lexicon.expand_abbreviation(token) {
                expansions.insert(token.to_lowercase(), expansion.to_string());
                expanded.push_str(expansion);
            } else if let Some(corrected) = self.correct_token(token) {
                corrections.insert(token.to_lowercase(), corrected.clone());
                expanded.push_str(&corrected);
            } else {
                expanded.push_str(token);
            }
            prev_end = end;
        }
        expanded.push_str(&raw[prev_end..]);

        (expanded, expansions, corrections)
    }

    /// Spell-correct one token, or None to leave it unchanged.
    /// Never guesses under ambiguity: a correction is applied only for a
    /// curated misspelling or a unique minimum within the edit bound.
    fn correct_token(&self, token: &str) -> Option<String> {
        if token.len() < self.min_correction_len
            || !token.chars().all(|c| c.is_ascii_alphabetic())
            || self.lexicon.is_known_token(token)
        {
            return None;
        }

        if let Some(corrected) = self.lexicon.correct_misspelling(token) {
            return Some(corrected.to_string());
        }

        let lower = token.to_lowercase();
        let mut best_distance = self.max_edit_distance + 1;
        let mut best: Option<&str> = None;
        let mut tied = false;

        for candidate in self.lexicon.spell_candidates() {
            // Length difference is a lower bound on edit distance
            if candidate.len().abs_diff(lower.len()) > self.max_edit_distance {
                continue;
            }
            let distance = strsim::levenshtein(&lower, candidate);
            if distance < best_distance {
                best_distance = distance;
                best = Some(candidate);
                tied = false;
            } else if distance == best_distance {
                tied = true;
            }
        }

        match best {
            Some(candidate) if !tied && best_distance <= self.max_edit_distance => {
                Some(candidate.to_string())
            }
            _ => None,
        }
    }

    /// Longest-match entity extraction over the expanded text, plus the
    /// dosage pattern. Overlaps resolve longest-span-wins, earliest-start.
    fn extract_entities(&self, expanded: &str) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .lexicon
            .match_terms(expanded)
            .into_iter()
            .map(|m| {
                Entity::new(
                    &expanded[m.start..m.end],
                    m.entity_type,
                    m.normalized,
                    DICTIONARY_CONFIDENCE,
                    (m.start, m.end),
                )
            })
            .collect();

        let drug_spans: Vec<(usize, usize)> = entities
            .iter()
            .filter(|e| e.entity_type == EntityType::Drug)
            .map(|e| e.span)
            .collect();

        for caps in self.dosage_pattern.captures_iter(expanded) {
            let Some(mat) = caps.get(0) else { continue };
            if !self.near_a_drug(&drug_spans, mat.start(), mat.end()) {
                continue;
            }
            let normalized = format!("{} {}", &caps[1], caps[2].to_lowercase());
            entities.push(Entity::new(
                mat.as_str(),
                EntityType::Dosage,
                normalized,
                DOSAGE_CONFIDENCE,
                (mat.start(), mat.end()),
            ));
        }

        resolve_overlaps(entities)
    }

    fn near_a_drug(&self, drug_spans: &[(usize, usize)], start: usize, end: usize) -> bool {
        drug_spans.iter().any(|&(ds, de)| {
            let gap = if de <= start {
                start - de
            } else if end <= ds {
                ds - end
            } else {
                0
            };
            gap <= self.dosage_adjacency_window
        })
    }
}

/// Byte ranges of maximal alphanumeric runs.
fn tokenize(text: &str) -> Vec<(usize, usize)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            if start.is_none() {
                start = Some(idx);
            }
        } else if let Some(s) = start.take() {
            tokens.push((s, idx));
        }
    }
    if let Some(s) = start {
        tokens.push((s, text.len()));
    }
    tokens
}

/// Keep the longest span on overlap; equal spans keep the earlier start.
fn resolve_overlaps(mut entities: Vec<Entity>) -> Vec<Entity> {
    entities.sort_by(|a, b| {
        a.span
            .0
            .cmp(&b.span.0)
            .then_with(|| (b.span.1 - b.span.0).cmp(&(a.span.1 - a.span.0)))
    });

    let mut result: Vec<Entity> = Vec::with_capacity(entities.len());
    for entity in entities {
        match result.last() {
            Some(prev) if entity.span.0 < prev.span.1 => {
                if entity.span.1 - entity.span.0 > prev.span.1 - prev.span.0 {
                    result.pop();
                    result.push(entity);
                }
            }
            _ => result.push(entity),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> QueryAnalyzer {
        QueryAnalyzer::new(Arc::new(MedicalLexicon::builtin()), &EngineConfig::default())
    }

    #[test]
    fn test_empty_input_never_fails() {
        let analysis = analyzer().analyze("");
        assert_eq!(analysis.expanded, "");
        assert!(analysis.entities.is_empty());

        let analysis = analyzer().analyze("   ");
        assert_eq!(analysis.expanded, analysis.original);
    }

    #[test]
    fn test_abbreviation_expansion_round_trip() {
        let analysis = analyzer().analyze("HTN treatment guidelines");
        assert!(analysis.expanded.contains("hypertension"));
        let diseases: Vec<_> = analysis.entities_of_type(EntityType::Disease).collect();
        assert_eq!(diseases.len(), 1);
        assert_eq!(diseases[0].normalized, "hypertension");
    }

    #[test]
    fn test_ambiguous_abbreviation_uses_default() {
        let analysis = analyzer().analyze("pe after surgery");
        assert!(analysis.expanded.contains("pulmonary embolism"));
        assert_eq!(
            analysis.expansions.get("pe").map(String::as_str),
            Some("pulmonary embolism")
        );
    }

    #[test]
    fn test_curated_misspelling_corrected() {
        let analysis = analyzer().analyze("diabetis treatment");
        assert!(analysis.expanded.contains("diabetes"));
        assert_eq!(
            analysis.corrections.get("diabetis").map(String::as_str),
            Some("diabetes")
        );
    }

    #[test]
    fn test_edit_distance_correction_unique_candidate() {
        // "metfornin" is distance 1 from "metformin" and nothing else
        let analysis = analyzer().analyze("metfornin dose");
        assert!(analysis.expanded.contains("metformin"));
    }

    #[test]
    fn test_known_and_short_tokens_untouched() {
        let analysis = analyzer().analyze("what is the dose");
        assert!(analysis.corrections.is_empty());
        assert_eq!(analysis.expanded, "what is the dose");
    }

    #[test]
    fn test_entity_spans_index_expanded_text() {
        let analysis = analyzer().analyze("metformin for diabetes");
        for entity in &analysis.entities {
            let (start, end) = entity.span;
            assert!(end > start);
            assert_eq!(&analysis.expanded[start..end], entity.text);
        }
    }

    #[test]
    fn test_dosage_requires_adjacent_drug() {
        let with_drug = analyzer().analyze("metformin 500 mg twice daily");
        assert!(with_drug.has_entity_of_type(EntityType::Dosage));

        let without_drug = analyzer().analyze("drink 500 ml of water");
        assert!(!without_drug.has_entity_of_type(EntityType::Dosage));
    }

    #[test]
    fn test_longest_span_wins() {
        let analysis = analyzer().analyze("type 2 diabetes mellitus management");
        let diseases: Vec<_> = analysis.entities_of_type(EntityType::Disease).collect();
        assert_eq!(diseases.len(), 1);
        assert_eq!(diseases[0].normalized, "type 2 diabetes mellitus");
    }

    #[test]
    fn test_dosage_scenario_entities() {
        let analysis = analyzer().analyze("What is the dosage of metformin for diabetes?");
        assert!(analysis
            .entities_of_type(EntityType::Drug)
            .any(|e| e.normalized == "metformin"));
        assert!(analysis
            .entities_of_type(EntityType::Disease)
            .any(|e| e.normalized.contains("diabetes")));
    }
}
