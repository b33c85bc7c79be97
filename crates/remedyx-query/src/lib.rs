//! remedyx-query — Query understanding: analysis, intent, variants, strategy.
//!
//! The four cheap, sequential stages that run before retrieval fan-out:
//! raw query → [`QueryAnalyzer`] → [`IntentClassifier`] →
//! [`VariantGenerator`] → [`StrategyBuilder`] → `SearchStrategy`.
//! Every stage is a pure function of its inputs plus the shared read-only
//! lexicon and profile tables.

pub mod analyzer;
pub mod intent;
pub mod strategy;
pub mod variants;

pub use analyzer::QueryAnalyzer;
pub use intent::{Classification, IntentClassifier};
pub use strategy::StrategyBuilder;
pub use variants::VariantGenerator;
