//! Lexicon data model and lookup API.

use ahash::{AHashMap, AHashSet};
use remedyx_common::{EngineError, EntityType, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::matcher::{TermMatch, TermMatcher};

/// Expansions for one abbreviation. `expansions[0]` is the configured
/// default used when the abbreviation is ambiguous; there is no dynamic
/// disambiguation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbbreviationEntry {
    pub expansions: Vec<String>,
}

impl AbbreviationEntry {
    pub fn default_expansion(&self) -> &str {
        &self.expansions[0]
    }
}

/// One dictionary surface form mapped to its type and canonical form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermEntry {
    pub surface: String,
    pub entity_type: EntityType,
    pub normalized: String,
}

impl TermEntry {
    pub fn new(
        surface: impl Into<String>,
        entity_type: EntityType,
        normalized: impl Into<String>,
    ) -> Self {
        Self {
            surface: surface.into(),
            entity_type,
            normalized: normalized.into(),
        }
    }
}

/// Serializable lexicon document, for loading deployment-specific tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconData {
    /// abbreviation → expansions, default first
    pub abbreviations: AHashMap<String, Vec<String>>,
    /// misspelled → corrected
    pub misspellings: AHashMap<String, String>,
    pub terms: Vec<TermEntry>,
    /// normalized term → synonyms (brand↔generic, lay names)
    pub synonyms: AHashMap<String, Vec<String>>,
    /// Extra tokens treated as known (never spell-corrected).
    pub extra_vocabulary: Vec<String>,
}

/// The process-wide medical lexicon. Construct once, wrap in `Arc`, share.
pub struct MedicalLexicon {
    abbreviations: AHashMap<String, AbbreviationEntry>,
    misspellings: AHashMap<String, String>,
    synonyms: AHashMap<String, Vec<String>>,
    /// Every token the analyzer should consider already correct.
    vocabulary: AHashSet<String>,
    /// Sorted unique single-word correction targets.
    spell_candidates: Vec<String>,
    matcher: TermMatcher,
}

impl MedicalLexicon {
    /// Build from the embedded curated tables.
    pub fn builtin() -> Self {
        // Embedded tables are static and well-formed; a build failure here
        // is a compile-time data bug.
        Self::from_data(crate::builtin::builtin_data())
            .expect("embedded lexicon tables must build")
    }

    /// Load a lexicon document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: LexiconData = serde_json::from_str(json)
            .map_err(|e| EngineError::Config(format!("lexicon parse failed: {e}")))?;
        Self::from_data(data)
    }

    pub fn from_data(data: LexiconData) -> Result<Self> {
        let matcher = TermMatcher::new(&data.terms)?;

        let abbreviations: AHashMap<String, AbbreviationEntry> = data
            .abbreviations
            .into_iter()
            .filter(|(_, expansions)| !expansions.is_empty())
            .map(|(abbrev, expansions)| {
                (abbrev.to_lowercase(), AbbreviationEntry { expansions })
            })
            .collect();

        let misspellings: AHashMap<String, String> = data
            .misspellings
            .into_iter()
            .map(|(wrong, right)| (wrong.to_lowercase(), right))
            .collect();

        let mut vocabulary = AHashSet::new();
        let mut spell_candidates = Vec::new();
        let mut add_words = |text: &str, candidates: &mut Vec<String>| {
            for word in text.split_whitespace() {
                let word = word.to_lowercase();
                if word.len() >= 4 {
                    candidates.push(word.clone());
                }
                vocabulary.insert(word);
            }
        };

        for term in &data.terms {
            add_words(&term.surface, &mut spell_candidates);
            add_words(&term.normalized, &mut spell_candidates);
        }
        for entry in abbreviations.values() {
            for expansion in &entry.expansions {
                add_words(expansion, &mut spell_candidates);
            }
        }
        for corrected in misspellings.values() {
            add_words(corrected, &mut spell_candidates);
        }
        for word in &data.extra_vocabulary {
            vocabulary.insert(word.to_lowercase());
        }
        // Abbreviations count as known tokens even when left unexpanded.
        for abbrev in abbreviations.keys() {
            vocabulary.insert(abbrev.clone());
        }

        spell_candidates.sort();
        spell_candidates.dedup();

        info!(
            terms = data.terms.len(),
            abbreviations = abbreviations.len(),
            misspellings = misspellings.len(),
            vocabulary = vocabulary.len(),
            "medical lexicon built"
        );

        Ok(Self {
            abbreviations,
            misspellings,
            synonyms: data.synonyms,
            vocabulary,
            spell_candidates,
            matcher,
        })
    }

    /// Default expansion for an abbreviation, case-insensitively.
    pub fn expand_abbreviation(&self, token: &str) -> Option<&str> {
        self.abbreviations
            .get(&token.to_lowercase())
            .map(|entry| entry.default_expansion())
    }

    /// Direct curated correction for a known misspelling.
    pub fn correct_misspelling(&self, token: &str) -> Option<&str> {
        self.misspellings.get(&token.to_lowercase()).map(String::as_str)
    }

    /// Whether the analyzer should treat this token as already correct.
    pub fn is_known_token(&self, token: &str) -> bool {
        self.vocabulary.contains(&token.to_lowercase())
    }

    /// Sorted candidate words for bounded edit-distance correction.
    pub fn spell_candidates(&self) -> &[String] {
        &self.spell_candidates
    }

    /// Synonyms registered for a normalized term.
    pub fn synonyms_of(&self, normalized: &str) -> &[String] {
        self.synonyms
            .get(normalized)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Longest-match dictionary scan over `text`.
    pub fn match_terms(&self, text: &str) -> Vec<TermMatch> {
        self.matcher.find(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_builds() {
        let lexicon = MedicalLexicon::builtin();
        assert!(lexicon.is_known_token("metformin"));
        assert!(lexicon.is_known_token("hypertension"));
    }

    #[test]
    fn test_abbreviation_default_expansion() {
        let lexicon = MedicalLexicon::builtin();
        assert_eq!(lexicon.expand_abbreviation("HTN"), Some("hypertension"));
        // Ambiguous: configured default wins
        assert_eq!(lexicon.expand_abbreviation("pe"), Some("pulmonary embolism"));
    }

    #[test]
    fn test_misspelling_lookup() {
        let lexicon = MedicalLexicon::builtin();
        assert_eq!(lexicon.correct_misspelling("diabetis"), Some("diabetes"));
        assert_eq!(lexicon.correct_misspelling("metropolol"), Some("metoprolol"));
        assert_eq!(lexicon.correct_misspelling("metformin"), None);
    }

    #[test]
    fn test_synonyms_brand_generic() {
        let lexicon = MedicalLexicon::builtin();
        assert!(lexicon
            .synonyms_of("metformin")
            .iter()
            .any(|s| s == "glucophage"));
        assert!(lexicon.synonyms_of("no-such-term").is_empty());
    }

    #[test]
    fn test_match_terms_typed() {
        let lexicon = MedicalLexicon::builtin();
        let matches = lexicon.match_terms("metformin for type 2 diabetes mellitus");
        assert!(matches
            .iter()
            .any(|m| m.entity_type == EntityType::Drug && m.normalized == "metformin"));
        assert!(matches
            .iter()
            .any(|m| m.entity_type == EntityType::Disease
                && m.normalized == "type 2 diabetes mellitus"));
    }

    #[test]
    fn test_from_json_roundtrip() {
        let json = r#"{
            "abbreviations": {"htn": ["hypertension"]},
            "misspellings": {"hypertenion": "hypertension"},
            "terms": [
                {"surface": "hypertension", "entity_type": "disease", "normalized": "hypertension"}
            ],
            "synonyms": {"hypertension": ["high blood pressure"]},
            "extra_vocabulary": ["guidelines"]
        }"#;
        let lexicon = MedicalLexicon::from_json(json).unwrap();
        assert_eq!(lexicon.expand_abbreviation("htn"), Some("hypertension"));
        assert!(lexicon.is_known_token("guidelines"));
    }
}
