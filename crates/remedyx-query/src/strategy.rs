//! Search strategy assembly.
//!
//! Folds the analysis, intent, and variants into the concrete execution
//! plan the retriever consumes. Entity filtering is only switched on when
//! the classifier was confident AND an entity of an interesting type was
//! actually found; otherwise the retriever falls back to unfiltered
//! semantic search to protect recall.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use remedyx_common::{
    BoostParams, Intent, IntentProfiles, QueryAnalysis, SearchStrategy,
};

pub struct StrategyBuilder {
    profiles: Arc<IntentProfiles>,
    confidence_threshold: f64,
}

impl StrategyBuilder {
    pub fn new(profiles: Arc<IntentProfiles>, confidence_threshold: f64) -> Self {
        Self {
            profiles,
            confidence_threshold,
        }
    }

    pub fn build(
        &self,
        analysis: &QueryAnalysis,
        intent: Intent,
        confidence: f64,
        variants: Vec<String>,
    ) -> SearchStrategy {
        let profile = self.profiles.get(intent);

        // Only entity types the intent cares about become filters; the rest
        // stay available for boosting via chunk metadata.
        let mut entity_filters: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for entity in &analysis.entities {
            if !profile.entity_types_of_interest.contains(&entity.entity_type) {
                continue;
            }
            entity_filters
                .entry(entity.entity_type.filter_field().to_string())
                .or_default()
                .insert(entity.normalized.to_lowercase());
        }

        let use_entity_filtering =
            confidence >= self.confidence_threshold && !entity_filters.is_empty();

        debug!(
            intent = intent.as_str(),
            confidence,
            use_entity_filtering,
            filters = entity_filters.len(),
            "strategy built"
        );

        SearchStrategy {
            query_variants: variants,
            entity_filters,
            boost_params: BoostParams {
                sections: profile.boost_sections.clone(),
                weight: profile.boost_weight,
            },
            answer_type_filter: profile.answer_types.clone(),
            intent,
            confidence,
            use_entity_filtering,
        }
    }
}
