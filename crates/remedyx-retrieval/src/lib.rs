//! remedyx-retrieval — Multi-collection retrieval fan-out and boost scoring.
//!
//! Executes a `SearchStrategy` against N embedding-specific collections
//! through abstract embed/search capabilities, merges the raw hits into one
//! deduplicated candidate list, then applies the deterministic multiplicative
//! boost pipeline and total ordering.

pub mod boost;
pub mod provider;
pub mod retriever;

pub use boost::BoostEngine;
pub use provider::{
    EmbeddingProvider, MetadataFilter, MockEmbeddingProvider, MockSearchProvider, SearchHit,
    VectorSearchProvider,
};
pub use retriever::{MultiCollectionRetriever, Retrieval};
