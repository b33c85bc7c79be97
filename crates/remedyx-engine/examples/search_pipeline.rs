//! Run the full pipeline against the in-memory mock backends.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example search_pipeline
//! ```

use std::sync::Arc;

use remedyx_common::{ChunkMetadata, ChunkType, EngineConfig, IntentProfiles};
use remedyx_engine::QueryEngine;
use remedyx_lexicon::MedicalLexicon;
use remedyx_retrieval::{MockEmbeddingProvider, MockSearchProvider};

fn chunk(
    section: &str,
    chunk_type: ChunkType,
    answer_types: &[&str],
    entities: &[&str],
) -> ChunkMetadata {
    ChunkMetadata {
        section: Some(section.to_string()),
        chunk_type,
        answer_types: answer_types.iter().map(|s| s.to_string()).collect(),
        entities: entities.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let searcher = MockSearchProvider::new()
        .with_hit(
            "pubmedbert",
            "pubmedbert::metformin-dosing",
            0.85,
            chunk(
                "dosage",
                ChunkType::Medication,
                &["dosage"],
                &["metformin"],
            ),
        )
        .with_hit(
            "pubmedbert",
            "pubmedbert::metformin-overview",
            0.90,
            chunk("overview", ChunkType::Text, &["definition"], &["metformin"]),
        )
        .with_hit(
            "biobert",
            "biobert::metformin-dosing",
            0.72,
            chunk(
                "dosage",
                ChunkType::Table,
                &["dosage"],
                &["metformin"],
            ),
        )
        .with_hit(
            "biobert",
            "biobert::metformin-warnings",
            0.80,
            chunk(
                "warnings",
                ChunkType::List,
                &["side_effects", "contraindications"],
                &["metformin"],
            ),
        );

    let engine = QueryEngine::new(
        Arc::new(MedicalLexicon::builtin()),
        Arc::new(IntentProfiles::builtin()),
        EngineConfig::default(),
        Arc::new(MockEmbeddingProvider::new()),
        Arc::new(searcher),
    )?;

    for query in [
        "What is the dosage of metformin for dm2?",
        "side effects of metaformin",
    ] {
        println!("\n=== {query}");
        let response = engine.run(query).await?;

        println!("{}", serde_json::to_string_pretty(&response.report)?);
        for (rank, candidate) in response.candidates.iter().take(5).enumerate() {
            println!(
                "#{} {} [{}] raw={:.3} boosted={:.3} boosts={:?}",
                rank + 1,
                candidate.chunk_id,
                candidate.source_collection,
                candidate.raw_score,
                candidate.boosted_score,
                candidate.applied_boosts,
            );
        }
    }

    Ok(())
}
