//! Capability traits for the external embedding and vector-search backends.
//!
//! The engine never talks to a concrete model server or vector database;
//! it consumes these two abstractions. Implementations can wrap a local
//! model, a remote inference service, or, for tests, the in-memory mocks
//! below.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use ahash::AHashMap;
use async_trait::async_trait;

use remedyx_common::{ChunkMetadata, EngineError, Result};

/// Metadata predicate attached to a filtered search: field name → accepted
/// normalized values. Fields AND together; values within a field OR.
pub type MetadataFilter = BTreeMap<String, BTreeSet<String>>;

/// One raw hit from a collection's similarity search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk_id: String,
    /// The collection's native similarity score. Not comparable across
    /// collections.
    pub raw_score: f64,
    pub metadata: ChunkMetadata,
}

/// text → vector for one embedding model. Deterministic for a given
/// (model, text) pair.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, model_id: &str, text: &str) -> Result<Vec<f32>>;
}

/// Top-k similarity search in one collection, optionally metadata-filtered.
#[async_trait]
pub trait VectorSearchProvider: Send + Sync {
    async fn search(
        &self,
        collection_id: &str,
        vector: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchHit>>;
}

// ── Mock implementations for testing ────────────────────────────────────────

/// Deterministic hash-based embedder with per-model failure injection.
#[derive(Default)]
pub struct MockEmbeddingProvider {
    failing_models: Vec<String>,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a model report `EmbeddingUnavailable`.
    pub fn failing_model(mut self, model_id: &str) -> Self {
        self.failing_models.push(model_id.to_string());
        self
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, model_id: &str, text: &str) -> Result<Vec<f32>> {
        if self.failing_models.iter().any(|m| m == model_id) {
            return Err(EngineError::EmbeddingUnavailable {
                model: model_id.to_string(),
                reason: "mock backend down".to_string(),
            });
        }
        // FNV-1a over (model, text); deterministic per pair
        let mut hash: u64 = 14695981039346656037;
        for byte in model_id.bytes().chain([0u8]).chain(text.bytes()) {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(1099511628211);
        }
        let vector = (0..8)
            .map(|i| ((hash >> (i * 8)) & 0xff) as f32 / 255.0)
            .collect();
        Ok(vector)
    }
}

/// In-memory search backend preloaded with per-collection hits.
#[derive(Default)]
pub struct MockSearchProvider {
    hits: AHashMap<String, Vec<SearchHit>>,
    failing_collections: Vec<String>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hit returned by `collection` for any query vector.
    pub fn with_hit(
        mut self,
        collection: &str,
        chunk_id: &str,
        raw_score: f64,
        metadata: ChunkMetadata,
    ) -> Self {
        self.hits
            .entry(collection.to_string())
            .or_default()
            .push(SearchHit {
                chunk_id: chunk_id.to_string(),
                raw_score,
                metadata,
            });
        self
    }

    /// Make a collection report `IndexUnavailable`.
    pub fn failing_collection(mut self, collection: &str) -> Self {
        self.failing_collections.push(collection.to_string());
        self
    }

    pub fn into_shared(self) -> Arc<dyn VectorSearchProvider> {
        Arc::new(self)
    }

    fn passes(filter: &MetadataFilter, metadata: &ChunkMetadata) -> bool {
        filter
            .values()
            .all(|accepted| accepted.iter().any(|v| metadata.entities.contains(v)))
    }
}

#[async_trait]
impl VectorSearchProvider for MockSearchProvider {
    async fn search(
        &self,
        collection_id: &str,
        _vector: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchHit>> {
        if self.failing_collections.iter().any(|c| c == collection_id) {
            return Err(EngineError::IndexUnavailable {
                collection: collection_id.to_string(),
                reason: "mock index down".to_string(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .hits
            .get(collection_id)
            .map(|hits| {
                hits.iter()
                    .filter(|h| filter.map_or(true, |f| Self::passes(f, &h.metadata)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        hits.sort_by(|a, b| {
            b.raw_score
                .partial_cmp(&a.raw_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }
}
