//! Structured per-query analysis report.
//!
//! Everything a caller needs to explain a response: what the query became,
//! which intent and filters drove retrieval, and which collections actually
//! answered. Serializes directly into an API payload.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use remedyx_common::{Intent, QueryAnalysis, SearchStrategy};
use remedyx_query::Classification;

#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub query_id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub original: String,
    pub expanded: String,
    /// misspelled → corrected
    pub corrections: HashMap<String, String>,
    /// abbreviation → expansion
    pub expansions: HashMap<String, String>,

    pub intent: Intent,
    pub confidence: f64,
    pub secondary_intents: Vec<(Intent, f64)>,

    /// Normalized entities grouped by type.
    pub entities: HashMap<&'static str, Vec<String>>,
    pub entity_filters: BTreeMap<String, BTreeSet<String>>,
    pub use_entity_filtering: bool,

    pub boost_sections: Vec<String>,
    pub boost_weight: f64,
    pub answer_type_filter: Vec<String>,

    pub query_variants: Vec<String>,
    pub searched_collections: Vec<String>,
    pub failed_collections: Vec<String>,
    /// True only when every collection failed and the candidate list is
    /// empty for that reason.
    pub retrieval_failed: bool,
    pub candidate_count: usize,
}

impl QueryReport {
    pub fn new(
        analysis: &QueryAnalysis,
        classification: &Classification,
        strategy: &SearchStrategy,
        searched_collections: &[String],
        failed_collections: &[String],
        retrieval_failed: bool,
        candidate_count: usize,
    ) -> Self {
        let mut boost_sections: Vec<String> =
            strategy.boost_params.sections.iter().cloned().collect();
        boost_sections.sort();
        let mut answer_type_filter: Vec<String> =
            strategy.answer_type_filter.iter().cloned().collect();
        answer_type_filter.sort();

        Self {
            query_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            original: analysis.original.clone(),
            expanded: analysis.expanded.clone(),
            corrections: analysis.corrections.clone(),
            expansions: analysis.expansions.clone(),
            intent: classification.intent,
            confidence: classification.confidence,
            secondary_intents: classification.secondary_intents.clone(),
            entities: analysis.entities_by_type(),
            entity_filters: strategy.entity_filters.clone(),
            use_entity_filtering: strategy.use_entity_filtering,
            boost_sections,
            boost_weight: strategy.boost_params.weight,
            answer_type_filter,
            query_variants: strategy.query_variants.clone(),
            searched_collections: searched_collections.to_vec(),
            failed_collections: failed_collections.to_vec(),
            retrieval_failed,
            candidate_count,
        }
    }
}
