//! Engine error taxonomy.
//!
//! Degraded analysis (nothing corrected, no entities found) is not an
//! error: the pipeline proceeds with the raw text. Per-collection backend
//! failures are absorbed at the retriever boundary; only the
//! everything-failed case reaches the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Embedding backend unavailable for model '{model}': {reason}")]
    EmbeddingUnavailable { model: String, reason: String },

    #[error("Search index unavailable for collection '{collection}': {reason}")]
    IndexUnavailable { collection: String, reason: String },

    #[error("All collections failed during retrieval")]
    AllCollectionsFailed,

    #[error("Invalid search strategy: {0}")]
    InvalidStrategy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
