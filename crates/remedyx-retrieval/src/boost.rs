//! Deterministic multiplicative boost scoring.
//!
//! Factors apply in a fixed order (entity, section, answer-type,
//! chunk-type), each an independent pure predicate with a factor >= 1.0, so
//! `boosted_score >= raw_score` always holds and repeated runs are
//! bit-for-bit identical. The final sort is a total order: boosted score
//! desc, raw score desc, chunk_id asc, collection asc.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use remedyx_common::{BoostKind, Candidate, EngineConfig, IntentProfiles, SearchStrategy};

pub struct BoostEngine {
    profiles: Arc<IntentProfiles>,
    entity_boost: f64,
    answer_type_boost: f64,
    chunk_type_boost: f64,
}

impl BoostEngine {
    pub fn new(profiles: Arc<IntentProfiles>, config: &EngineConfig) -> Self {
        Self {
            profiles,
            entity_boost: config.entity_boost,
            answer_type_boost: config.answer_type_boost,
            chunk_type_boost: config.chunk_type_boost,
        }
    }

    /// Boost and rank the full candidate list. Truncation to top-N is the
    /// caller's call; nothing is dropped here.
    pub fn score(
        &self,
        mut candidates: Vec<Candidate>,
        strategy: &SearchStrategy,
    ) -> Vec<Candidate> {
        let preferred_chunk_types = &self.profiles.get(strategy.intent).preferred_chunk_types;

        for candidate in &mut candidates {
            // Fixed application order; each factor fires independently
            let factors: [(BoostKind, bool, f64); 4] = [
                (
                    BoostKind::EntityMatch,
                    entity_matches(candidate, strategy),
                    self.entity_boost,
                ),
                (
                    BoostKind::SectionMatch,
                    section_matches(candidate, strategy),
                    strategy.boost_params.weight,
                ),
                (
                    BoostKind::AnswerTypeMatch,
                    answer_type_matches(candidate, strategy),
                    self.answer_type_boost,
                ),
                (
                    BoostKind::ChunkTypeMatch,
                    preferred_chunk_types.contains(&candidate.metadata.chunk_type),
                    self.chunk_type_boost,
                ),
            ];

            candidate.boosted_score = candidate.raw_score;
            candidate.applied_boosts.clear();
            for (kind, triggered, factor) in factors {
                if triggered {
                    candidate.boosted_score *= factor;
                    candidate.applied_boosts.push(kind);
                }
            }
        }

        candidates.sort_by(compare_ranked);

        debug!(candidates = candidates.len(), "candidates boosted and ranked");
        candidates
    }
}

/// Any entity filter value present in the chunk's entity metadata.
fn entity_matches(candidate: &Candidate, strategy: &SearchStrategy) -> bool {
    strategy
        .entity_filters
        .values()
        .flatten()
        .any(|value| candidate.metadata.entities.contains(value))
}

fn section_matches(candidate: &Candidate, strategy: &SearchStrategy) -> bool {
    candidate
        .metadata
        .section
        .as_ref()
        .is_some_and(|section| strategy.boost_params.sections.contains(section))
}

fn answer_type_matches(candidate: &Candidate, strategy: &SearchStrategy) -> bool {
    candidate
        .metadata
        .answer_types
        .iter()
        .any(|t| strategy.answer_type_filter.contains(t))
}

fn compare_ranked(a: &Candidate, b: &Candidate) -> Ordering {
    b.boosted_score
        .partial_cmp(&a.boosted_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.raw_score
                .partial_cmp(&a.raw_score)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        .then_with(|| a.source_collection.cmp(&b.source_collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet, HashSet};

    use remedyx_common::{BoostParams, ChunkMetadata, ChunkType, Intent};

    fn dosage_strategy() -> SearchStrategy {
        let mut entity_filters = BTreeMap::new();
        entity_filters.insert(
            "drugs".to_string(),
            BTreeSet::from(["metformin".to_string()]),
        );
        SearchStrategy {
            query_variants: vec!["metformin dosage".to_string()],
            entity_filters,
            boost_params: BoostParams {
                sections: HashSet::from(["dosage".to_string()]),
                weight: 1.30,
            },
            answer_type_filter: HashSet::from(["dosage".to_string()]),
            intent: Intent::DosageLookup,
            confidence: 0.8,
            use_entity_filtering: true,
        }
    }

    fn engine() -> BoostEngine {
        BoostEngine::new(Arc::new(IntentProfiles::builtin()), &EngineConfig::default())
    }

    fn candidate(chunk_id: &str, raw: f64, metadata: ChunkMetadata) -> Candidate {
        Candidate::from_hit(chunk_id, raw, "pubmedbert", metadata, "metformin dosage")
    }

    #[test]
    fn test_boost_arithmetic_entity_and_section() {
        let mut metadata = ChunkMetadata::default();
        metadata.entities.insert("metformin".to_string());
        metadata.section = Some("dosage".to_string());
        // No answer-type intersection, no preferred chunk type
        metadata.chunk_type = ChunkType::Heading;

        let ranked = engine().score(vec![candidate("c1", 0.85, metadata)], &dosage_strategy());
        assert!((ranked[0].boosted_score - 1.38125).abs() < 1e-6);
        assert_eq!(
            ranked[0].applied_boosts,
            vec![BoostKind::EntityMatch, BoostKind::SectionMatch]
        );
    }

    #[test]
    fn test_no_evidence_leaves_score_unchanged() {
        let mut metadata = ChunkMetadata::default();
        metadata.chunk_type = ChunkType::Heading;
        let ranked = engine().score(vec![candidate("c1", 0.4, metadata)], &dosage_strategy());
        assert_eq!(ranked[0].boosted_score, 0.4);
        assert!(ranked[0].applied_boosts.is_empty());
    }

    #[test]
    fn test_boosted_never_below_raw() {
        let mut with_everything = ChunkMetadata::default();
        with_everything.entities.insert("metformin".to_string());
        with_everything.section = Some("dosage".to_string());
        with_everything.answer_types.insert("dosage".to_string());
        with_everything.chunk_type = ChunkType::Medication;

        let ranked = engine().score(
            vec![
                candidate("c1", 0.5, with_everything),
                candidate("c2", 0.5, ChunkMetadata::default()),
            ],
            &dosage_strategy(),
        );
        for c in &ranked {
            assert!(c.boosted_score >= c.raw_score);
        }
        // All four factors fired on the rich candidate
        assert_eq!(ranked[0].applied_boosts.len(), 4);
        assert!((ranked[0].boosted_score - 0.5 * 1.25 * 1.30 * 1.15 * 1.20).abs() < 1e-9);
    }

    #[test]
    fn test_tie_break_chunk_id_ascending() {
        let ranked = engine().score(
            vec![
                candidate("b", 1.0, ChunkMetadata::default()),
                candidate("a", 1.0, ChunkMetadata::default()),
            ],
            &dosage_strategy(),
        );
        assert_eq!(ranked[0].chunk_id, "a");
        assert_eq!(ranked[1].chunk_id, "b");
    }

    #[test]
    fn test_raw_score_breaks_boosted_ties() {
        // c1: raw 1.0 unboosted; c2: raw 0.8 boosted by section 1.25 → 1.0
        let mut sectioned = ChunkMetadata::default();
        sectioned.section = Some("dosage".to_string());
        sectioned.chunk_type = ChunkType::Heading;

        let mut strategy = dosage_strategy();
        strategy.boost_params.weight = 1.25;
        strategy.entity_filters.clear();
        strategy.answer_type_filter.clear();

        let ranked = engine().score(
            vec![
                candidate("zz", 1.0, ChunkMetadata::default()),
                candidate("aa", 0.8, sectioned),
            ],
            &strategy,
        );
        assert!((ranked[0].boosted_score - ranked[1].boosted_score).abs() < 1e-9);
        assert_eq!(ranked[0].chunk_id, "zz");
    }

    #[test]
    fn test_deterministic_over_repeated_runs() {
        let mut metadata = ChunkMetadata::default();
        metadata.entities.insert("metformin".to_string());

        let input = vec![
            candidate("c3", 0.7, metadata.clone()),
            candidate("c1", 0.9, ChunkMetadata::default()),
            candidate("c2", 0.7, metadata),
        ];
        let first = engine().score(input.clone(), &dosage_strategy());
        let second = engine().score(input, &dosage_strategy());

        let ids = |ranked: &[Candidate]| -> Vec<String> {
            ranked.iter().map(|c| c.chunk_id.clone()).collect()
        };
        assert_eq!(ids(&first), ids(&second));
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.boosted_score, b.boosted_score);
        }
    }

    #[test]
    fn test_full_list_returned_untruncated() {
        let many: Vec<Candidate> = (0..20)
            .map(|i| candidate(&format!("c{i:02}"), 0.5, ChunkMetadata::default()))
            .collect();
        let ranked = engine().score(many, &dosage_strategy());
        assert_eq!(ranked.len(), 20);
    }
}
