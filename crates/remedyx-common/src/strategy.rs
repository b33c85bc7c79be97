//! The executable search plan built once per query and consumed read-only
//! by the retriever and the boost engine.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::intent::Intent;

/// Section-boost parameters taken from the intent profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostParams {
    pub sections: HashSet<String>,
    /// Multiplicative section factor, > 1.0.
    pub weight: f64,
}

/// A concrete multi-query, multi-filter, multi-boost execution plan.
///
/// Ordered maps keep filter serialization deterministic for the
/// explainability report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStrategy {
    /// Alternate phrasings to search with. Never empty; the (expanded)
    /// original query is always variant 0.
    pub query_variants: Vec<String>,
    /// Metadata filter: field name → normalized entity values.
    pub entity_filters: BTreeMap<String, BTreeSet<String>>,
    pub boost_params: BoostParams,
    /// Soft boost category; a chunk lacking these answer types is still
    /// eligible, just unboosted.
    pub answer_type_filter: HashSet<String>,
    pub intent: Intent,
    pub confidence: f64,
    pub use_entity_filtering: bool,
}

impl SearchStrategy {
    /// Defensive invariant check at the retriever boundary. A violation is a
    /// programming error upstream, not a user-facing condition.
    pub fn validate(&self) -> Result<()> {
        if self.query_variants.is_empty() {
            return Err(EngineError::InvalidStrategy("empty variant list".into()));
        }
        if self.query_variants[0].trim().is_empty() {
            return Err(EngineError::InvalidStrategy("variant 0 is blank".into()));
        }
        if self.boost_params.weight < 1.0 {
            return Err(EngineError::InvalidStrategy(format!(
                "section boost weight {} below 1.0",
                self.boost_params.weight
            )));
        }
        Ok(())
    }
}
