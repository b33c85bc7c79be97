//! Multi-collection retrieval fan-out.
//!
//! Every (variant × collection) pair is one independent leg: embed the
//! variant with the collection's model, then top-k search. Legs run
//! concurrently behind a bounded stream and a single overall deadline; the
//! merge happens single-threaded after the join, so completion order never
//! leaks into the output. Per-collection failures are recorded and absorbed
//! here; only the everything-failed case propagates.

use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, warn};

use remedyx_common::{Candidate, EngineError, Result, SearchStrategy};

use crate::provider::{EmbeddingProvider, MetadataFilter, VectorSearchProvider};

/// Merged, deduplicated (still unranked) retrieval output.
#[derive(Debug)]
pub struct Retrieval {
    pub candidates: Vec<Candidate>,
    /// Collections that produced no successful leg this query.
    pub failed_collections: Vec<String>,
}

pub struct MultiCollectionRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    searcher: Arc<dyn VectorSearchProvider>,
    concurrency: usize,
    timeout: Duration,
}

struct LegResult {
    collection_idx: usize,
    variant_idx: usize,
    variant: String,
    outcome: Result<Vec<crate::provider::SearchHit>>,
}

impl MultiCollectionRetriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        searcher: Arc<dyn VectorSearchProvider>,
        concurrency: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            searcher,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    pub async fn retrieve(
        &self,
        strategy: &SearchStrategy,
        collections: &[String],
        k_per_query: usize,
    ) -> Result<Retrieval> {
        strategy.validate()?;
        if collections.is_empty() {
            return Err(EngineError::Config(
                "retrieval requires at least one active collection".into(),
            ));
        }

        let filter: Option<MetadataFilter> = strategy
            .use_entity_filtering
            .then(|| strategy.entity_filters.clone());

        let mut legs = Vec::with_capacity(collections.len() * strategy.query_variants.len());
        for (collection_idx, collection) in collections.iter().enumerate() {
            for (variant_idx, variant) in strategy.query_variants.iter().enumerate() {
                let embedder = Arc::clone(&self.embedder);
                let searcher = Arc::clone(&self.searcher);
                let collection = collection.clone();
                let variant = variant.clone();
                let filter = filter.clone();

                legs.push(async move {
                    let outcome = async {
                        let vector = embedder.embed(&collection, &variant).await?;
                        searcher
                            .search(&collection, &vector, k_per_query, filter.as_ref())
                            .await
                    }
                    .await;
                    LegResult {
                        collection_idx,
                        variant_idx,
                        variant,
                        outcome,
                    }
                });
            }
        }
        let total_legs = legs.len();

        // Bounded fan-out with one overall deadline. Whatever has completed
        // by the deadline is kept; unfinished legs count as failed for their
        // collection.
        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut in_flight = stream::iter(legs).buffer_unordered(self.concurrency);
        let mut completed: Vec<LegResult> = Vec::new();
        loop {
            match tokio::time::timeout_at(deadline, in_flight.next()).await {
                Ok(Some(leg)) => completed.push(leg),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        completed = completed.len(),
                        total = total_legs,
                        "retrieval deadline elapsed; continuing with partial results"
                    );
                    break;
                }
            }
        }

        self.merge(strategy, collections, completed)
    }

    /// Single-threaded merge after the join barrier.
    fn merge(
        &self,
        strategy: &SearchStrategy,
        collections: &[String],
        completed: Vec<LegResult>,
    ) -> Result<Retrieval> {
        let mut successes = vec![0usize; collections.len()];
        // (collection, chunk_id) → (variant_idx, candidate); the same chunk
        // retrieved by several variants of one collection keeps the highest
        // raw_score, ties resolved toward the earlier variant so the result
        // does not depend on completion order.
        let mut merged: AHashMap<(usize, String), (usize, Candidate)> = AHashMap::new();

        for leg in completed {
            let collection = &collections[leg.collection_idx];
            match leg.outcome {
                Ok(hits) => {
                    successes[leg.collection_idx] += 1;
                    for hit in hits {
                        let key = (leg.collection_idx, hit.chunk_id.clone());
                        let replace = match merged.get(&key) {
                            None => true,
                            Some((prev_variant, prev)) => {
                                hit.raw_score > prev.raw_score
                                    || (hit.raw_score == prev.raw_score
                                        && leg.variant_idx < *prev_variant)
                            }
                        };
                        if replace {
                            let candidate = Candidate::from_hit(
                                hit.chunk_id,
                                hit.raw_score,
                                collection.clone(),
                                hit.metadata,
                                leg.variant.clone(),
                            );
                            merged.insert(key, (leg.variant_idx, candidate));
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        collection = %collection,
                        variant = leg.variant_idx,
                        error = %err,
                        "retrieval leg failed"
                    );
                }
            }
        }

        let failed_collections: Vec<String> = collections
            .iter()
            .enumerate()
            .filter(|(idx, _)| successes[*idx] == 0)
            .map(|(_, name)| name.clone())
            .collect();

        if failed_collections.len() == collections.len() {
            return Err(EngineError::AllCollectionsFailed);
        }

        let mut candidates: Vec<Candidate> =
            merged.into_values().map(|(_, candidate)| candidate).collect();
        // Deterministic pre-ranking order regardless of hash iteration
        candidates.sort_by(|a, b| {
            a.source_collection
                .cmp(&b.source_collection)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });

        debug!(
            candidates = candidates.len(),
            failed = failed_collections.len(),
            intent = strategy.intent.as_str(),
            "retrieval merged"
        );

        Ok(Retrieval {
            candidates,
            failed_collections,
        })
    }
}
