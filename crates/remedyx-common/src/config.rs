//! Engine configuration surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Configuration for the retrieval fusion engine.
///
/// Boost factors are multiplicative and must stay >= 1.0: absence of
/// evidence leaves a score unchanged, presence only raises it. The section
/// factor is intent-specific and comes from the profile table, not from
/// here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Active collection ids, one per embedding model.
    pub collections: Vec<String>,

    /// Top-k per (variant, collection) search leg.
    pub k_per_query: usize,

    /// Maximum concurrent retrieval legs.
    pub concurrency: usize,

    /// Overall deadline for the retrieval fan-out.
    pub retrieval_timeout: Duration,

    /// Factor applied when a filter entity appears in chunk metadata.
    pub entity_boost: f64,

    /// Factor applied when chunk answer types intersect the intent's.
    pub answer_type_boost: f64,

    /// Factor applied when the chunk's structural type is preferred by the
    /// intent.
    pub chunk_type_boost: f64,

    /// Minimum intent confidence before entity filters are attached to
    /// searches.
    pub entity_filter_confidence: f64,

    /// Intent scores below this classify as General.
    pub intent_min_score: f64,

    /// Maximum edit distance for spell correction.
    pub max_edit_distance: usize,

    /// Tokens shorter than this are never spell-corrected.
    pub min_correction_len: usize,

    /// Maximum number of query variants per strategy.
    pub variant_cap: usize,

    /// A number+unit match becomes a dosage entity only when a drug entity
    /// lies within this many bytes.
    pub dosage_adjacency_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collections: vec!["pubmedbert".to_string(), "biobert".to_string()],
            k_per_query: 50,
            concurrency: 8,
            retrieval_timeout: Duration::from_secs(10),
            entity_boost: 1.25,
            answer_type_boost: 1.15,
            chunk_type_boost: 1.20,
            entity_filter_confidence: 0.5,
            intent_min_score: 0.3,
            max_edit_distance: 2,
            min_correction_len: 4,
            variant_cap: 5,
            dosage_adjacency_window: 40,
        }
    }
}

impl EngineConfig {
    /// Replace the active collection set.
    pub fn with_collections<I, S>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections = collections.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-leg search depth.
    pub fn with_k_per_query(mut self, k: usize) -> Self {
        self.k_per_query = k;
        self
    }

    /// Set the fan-out concurrency limit.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit;
        self
    }

    /// Set the retrieval deadline.
    pub fn with_retrieval_timeout(mut self, timeout: Duration) -> Self {
        self.retrieval_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.collections.is_empty() {
            return Err(EngineError::Config("no active collections".into()));
        }
        if self.k_per_query == 0 {
            return Err(EngineError::Config("k_per_query must be positive".into()));
        }
        if self.concurrency == 0 {
            return Err(EngineError::Config("concurrency must be positive".into()));
        }
        if self.variant_cap == 0 {
            return Err(EngineError::Config("variant_cap must be positive".into()));
        }
        for (name, factor) in [
            ("entity_boost", self.entity_boost),
            ("answer_type_boost", self.answer_type_boost),
            ("chunk_type_boost", self.chunk_type_boost),
        ] {
            if factor < 1.0 {
                return Err(EngineError::Config(format!(
                    "{name} is {factor}; boost factors must be >= 1.0"
                )));
            }
        }
        Ok(())
    }
}
