//! remedyx-engine — Query understanding & multi-collection retrieval fusion.
//!
//! Wires the full per-query pipeline: analyze → classify → variants →
//! strategy → retrieval fan-out → boost/rank, and produces the structured
//! analysis report alongside the ranked candidates. Downstream collaborators
//! (cross-encoder reranker, answer generator) consume the output; they are
//! not part of this crate.
//!
//! # Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use remedyx_common::{EngineConfig, IntentProfiles};
//! use remedyx_engine::QueryEngine;
//! use remedyx_lexicon::MedicalLexicon;
//! use remedyx_retrieval::{MockEmbeddingProvider, MockSearchProvider};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = QueryEngine::new(
//!     Arc::new(MedicalLexicon::builtin()),
//!     Arc::new(IntentProfiles::builtin()),
//!     EngineConfig::default(),
//!     Arc::new(MockEmbeddingProvider::new()),
//!     Arc::new(MockSearchProvider::new()),
//! )?;
//!
//! let response = engine.run("What is the dosage of metformin?").await?;
//! println!("{} candidates", response.candidates.len());
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod report;

pub use engine::{EngineResponse, QueryEngine};
pub use report::QueryReport;
