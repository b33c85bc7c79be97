//! Rule-based intent classification.
//!
//! Each intent carries a static trigger-keyword set; the required entity
//! types come from its profile. A score is keyword hits (capped) plus
//! required-entity presence, normalized by the rule set's maximum, so
//! confidences are comparable across intents. Same input, same output;
//! there is no randomness anywhere in the scoring.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use remedyx_common::{Intent, IntentProfiles, QueryAnalysis};

/// Keyword hits beyond this count add no further evidence.
const KEYWORD_HIT_CAP: usize = 2;
const KEYWORD_WEIGHT: f64 = 2.0;
const ENTITY_WEIGHT: f64 = 1.0;

/// Trigger keywords and phrases per intent. Matching is word-bounded on the
/// lowercased expanded query.
fn trigger_keywords(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::DosageLookup => &[
            "dosage", "dose", "dosing", "how much", "how many",
            "daily dose", "maximum dose", "recommended dose", "administration",
        ],
        Intent::SideEffectsLookup => &[
            "side effects", "side effect", "adverse", "reactions",
            "complications", "toxicity", "risks", "warnings",
        ],
        Intent::ContraindicationsLookup => &[
            "contraindications", "contraindication", "when not to",
            "should not", "avoid", "precautions", "not safe", "safe to take",
        ],
        Intent::DiseaseInfo => &[
            "definition", "overview", "symptoms", "signs", "causes",
            "prognosis", "risk factors", "about",
        ],
        Intent::TreatmentLookup => &[
            "treatment", "treat", "therapy", "management", "manage",
            "cure", "guidelines", "protocol", "options",
        ],
        Intent::DrugInteraction => &[
            "interaction", "interactions", "interact", "together",
            "combined with", "taking with", "combine",
        ],
        Intent::ProcedureInfo => &[
            "procedure", "performed", "technique", "steps",
            "preparation", "recovery", "how is",
        ],
        Intent::General => &[],
    }
}

/// Classification output: the winning intent plus runner-up evidence for the
/// explainability report.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub intent: Intent,
    pub confidence: f64,
    /// Next-best intents with nonzero score and their score relative to the
    /// winner, most relevant first.
    pub secondary_intents: Vec<(Intent, f64)>,
}

pub struct IntentClassifier {
    profiles: Arc<IntentProfiles>,
    min_score: f64,
}

impl IntentClassifier {
    pub fn new(profiles: Arc<IntentProfiles>, min_score: f64) -> Self {
        Self { profiles, min_score }
    }

    pub fn classify(&self, analysis: &QueryAnalysis) -> Classification {
        let text = analysis.expanded.to_lowercase();

        // Iterate most-specific first: a strictly-greater comparison then
        // resolves exact ties toward the more specific intent.
        let mut best_intent = Intent::General;
        let mut best_score = 0.0f64;
        let mut scored: Vec<(Intent, f64)> = Vec::new();

        for intent in Intent::SPECIFICITY {
            let score = self.score_intent(intent, analysis, &text);
            if score > 0.0 {
                scored.push((intent, score));
            }
            if score > best_score {
                best_score = score;
                best_intent = intent;
            }
        }

        // Below threshold the query is treated as general, but the computed
        // score is reported honestly rather than a synthetic zero.
        let intent = if best_score < self.min_score {
            Intent::General
        } else {
            best_intent
        };

        let mut secondary: Vec<(Intent, f64)> = scored
            .iter()
            .filter(|(i, _)| *i != intent)
            .map(|(i, s)| (*i, s / best_score.max(1.0e-9)))
            .collect();
        secondary.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        secondary.truncate(3);

        debug!(
            intent = intent.as_str(),
            confidence = best_score,
            "intent classified"
        );

        Classification {
            intent,
            confidence: best_score,
            secondary_intents: secondary,
        }
    }

    /// Score in [0, 1]: capped keyword hits + required-entity presence over
    /// the rule set's maximum possible score.
    fn score_intent(&self, intent: Intent, analysis: &QueryAnalysis, text: &str) -> f64 {
        let keywords = trigger_keywords(intent);
        if keywords.is_empty() {
            return 0.0;
        }

        let hits = keywords
            .iter()
            .filter(|k| contains_phrase(text, k))
            .count()
            .min(KEYWORD_HIT_CAP) as f64;

        let required = &self.profiles.get(intent).entity_types_of_interest;
        let present = required
            .iter()
            .filter(|t| analysis.has_entity_of_type(**t))
            .count() as f64;

        let max_possible =
            KEYWORD_HIT_CAP as f64 * KEYWORD_WEIGHT + required.len() as f64 * ENTITY_WEIGHT;

        (hits * KEYWORD_WEIGHT + present * ENTITY_WEIGHT) / max_possible
    }
}

/// Word-bounded phrase containment, so "dose" never fires inside "dosage".
fn contains_phrase(text: &str, phrase: &str) -> bool {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(pos) = text[from..].find(phrase) {
        let start = from + pos;
        let end = start + phrase.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
        from = start + 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use remedyx_common::EngineConfig;
    use remedyx_lexicon::MedicalLexicon;

    use crate::analyzer::QueryAnalyzer;

    fn classify(query: &str) -> Classification {
        let config = EngineConfig::default();
        let analyzer = QueryAnalyzer::new(Arc::new(MedicalLexicon::builtin()), &config);
        let classifier =
            IntentClassifier::new(Arc::new(IntentProfiles::builtin()), config.intent_min_score);
        classifier.classify(&analyzer.analyze(query))
    }

    #[test]
    fn test_dosage_scenario() {
        let result = classify("What is the dosage of metformin for diabetes?");
        assert_eq!(result.intent, Intent::DosageLookup);
        assert!(result.confidence >= 0.5, "got {}", result.confidence);
    }

    #[test]
    fn test_side_effects() {
        let result = classify("side effects of atorvastatin");
        assert_eq!(result.intent, Intent::SideEffectsLookup);
    }

    #[test]
    fn test_drug_interaction_beats_contraindications() {
        let result = classify("drug interactions with warfarin");
        assert_eq!(result.intent, Intent::DrugInteraction);
    }

    #[test]
    fn test_contraindications() {
        let result = classify("when not to use metformin");
        assert_eq!(result.intent, Intent::ContraindicationsLookup);
    }

    #[test]
    fn test_treatment_from_expanded_abbreviation() {
        let result = classify("HTN treatment guidelines");
        assert_eq!(result.intent, Intent::TreatmentLookup);
        assert!(result.confidence >= 0.5);
    }

    #[test]
    fn test_no_signal_is_general_with_honest_confidence() {
        let result = classify("tell me something interesting");
        assert_eq!(result.intent, Intent::General);
        assert!(result.confidence < 0.3);
    }

    #[test]
    fn test_weak_signal_still_general_but_scored() {
        // A lone disease entity without trigger keywords stays below the
        // threshold but is not reported as zero.
        let result = classify("COPD");
        assert_eq!(result.intent, Intent::General);
        assert!(result.confidence > 0.0);
        assert!(result.confidence < 0.3);
    }

    #[test]
    fn test_deterministic() {
        let a = classify("metformin dosage for diabetes");
        let b = classify("metformin dosage for diabetes");
        assert_eq!(a.intent, b.intent);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn test_secondary_intents_relative_to_winner() {
        let result = classify("What is the dosage of metformin for diabetes?");
        for (intent, relative) in &result.secondary_intents {
            assert_ne!(*intent, result.intent);
            assert!(*relative <= 1.0 + 1e-9);
        }
    }
}
