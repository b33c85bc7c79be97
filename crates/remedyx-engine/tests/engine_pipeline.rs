//! End-to-end pipeline tests against the in-memory mock backends.

use std::sync::Arc;

use remedyx_common::{ChunkMetadata, ChunkType, EngineConfig, Intent, IntentProfiles};
use remedyx_engine::{EngineResponse, QueryEngine};
use remedyx_lexicon::MedicalLexicon;
use remedyx_retrieval::{MockEmbeddingProvider, MockSearchProvider};

fn metadata(
    section: Option<&str>,
    chunk_type: ChunkType,
    answer_types: &[&str],
    entities: &[&str],
) -> ChunkMetadata {
    ChunkMetadata {
        section: section.map(|s| s.to_string()),
        chunk_type,
        answer_types: answer_types.iter().map(|s| s.to_string()).collect(),
        entities: entities.iter().map(|s| s.to_string()).collect(),
    }
}

fn engine(searcher: MockSearchProvider) -> QueryEngine {
    engine_with(MockEmbeddingProvider::new(), searcher)
}

fn engine_with(embedder: MockEmbeddingProvider, searcher: MockSearchProvider) -> QueryEngine {
    QueryEngine::new(
        Arc::new(MedicalLexicon::builtin()),
        Arc::new(IntentProfiles::builtin()),
        EngineConfig::default(),
        Arc::new(embedder),
        Arc::new(searcher),
    )
    .expect("engine builds")
}

fn seeded_searcher() -> MockSearchProvider {
    MockSearchProvider::new()
        .with_hit(
            "pubmedbert",
            "pubmedbert::dose-chunk",
            0.85,
            metadata(
                Some("dosage"),
                ChunkType::Medication,
                &["dosage"],
                &["metformin"],
            ),
        )
        .with_hit(
            "pubmedbert",
            "pubmedbert::plain-chunk",
            0.90,
            metadata(None, ChunkType::Text, &[], &["metformin"]),
        )
        .with_hit(
            "biobert",
            "biobert::dose-chunk",
            0.70,
            metadata(
                Some("dosage"),
                ChunkType::Medication,
                &["dosage"],
                &["metformin"],
            ),
        )
}

#[tokio::test]
async fn dosage_scenario_end_to_end() {
    let response = engine(seeded_searcher())
        .run("What is the dosage of metformin for diabetes?")
        .await
        .unwrap();

    let report = &response.report;
    assert_eq!(report.intent, Intent::DosageLookup);
    assert!(report.confidence >= 0.5);
    assert!(report.entity_filters["drugs"].contains("metformin"));
    assert!(report.boost_sections.contains(&"dosage".to_string()));
    assert!(report.use_entity_filtering);
    assert!(!report.retrieval_failed);

    // The fully-matching chunk outranks the higher-raw plain chunk after
    // boosting: 0.85 × 1.25 × 1.3 × 1.15 × 1.2 > 0.9 × 1.25
    assert_eq!(response.candidates[0].chunk_id, "pubmedbert::dose-chunk");
    for candidate in &response.candidates {
        assert!(candidate.boosted_score >= candidate.raw_score);
    }
}

#[tokio::test]
async fn cross_collection_duplicates_stay_distinct() {
    let response = engine(seeded_searcher())
        .run("What is the dosage of metformin for diabetes?")
        .await
        .unwrap();

    let dose_chunks: Vec<_> = response
        .candidates
        .iter()
        .filter(|c| c.chunk_id.ends_with("dose-chunk"))
        .collect();
    assert_eq!(dose_chunks.len(), 2);
    assert_ne!(
        dose_chunks[0].source_collection,
        dose_chunks[1].source_collection
    );
}

#[tokio::test]
async fn partial_collection_failure_is_invisible_except_narrower_recall() {
    let searcher = seeded_searcher().failing_collection("biobert");
    let response = engine(searcher)
        .run("What is the dosage of metformin for diabetes?")
        .await
        .unwrap();

    assert!(!response.candidates.is_empty());
    assert!(response
        .candidates
        .iter()
        .all(|c| c.source_collection == "pubmedbert"));
    assert_eq!(response.report.failed_collections, vec!["biobert".to_string()]);
    assert!(!response.report.retrieval_failed);
}

#[tokio::test]
async fn embedding_outage_for_one_model_degrades_gracefully() {
    let embedder = MockEmbeddingProvider::new().failing_model("biobert");
    let response = engine_with(embedder, seeded_searcher())
        .run("metformin dosage")
        .await
        .unwrap();

    assert!(response
        .candidates
        .iter()
        .all(|c| c.source_collection == "pubmedbert"));
    assert_eq!(response.report.failed_collections, vec!["biobert".to_string()]);
}

#[tokio::test]
async fn all_collections_down_reports_failure_without_error() {
    let searcher = MockSearchProvider::new()
        .failing_collection("pubmedbert")
        .failing_collection("biobert");

    let response = engine(searcher)
        .run("metformin dosage")
        .await
        .expect("total failure is reported, not raised");

    assert!(response.candidates.is_empty());
    assert!(response.report.retrieval_failed);
    assert_eq!(response.report.candidate_count, 0);
    assert_eq!(response.report.failed_collections.len(), 2);
}

#[tokio::test]
async fn empty_query_yields_empty_response() {
    let response = engine(seeded_searcher()).run("   ").await.unwrap();
    assert!(response.candidates.is_empty());
    assert!(!response.report.retrieval_failed);
    assert_eq!(response.report.expanded, "   ");
}

#[tokio::test]
async fn repeated_runs_are_deterministic() {
    fn ranked_ids(response: EngineResponse) -> Vec<(String, f64)> {
        response
            .candidates
            .into_iter()
            .map(|c| (c.chunk_id, c.boosted_score))
            .collect()
    }

    let engine = engine(seeded_searcher());
    let first = ranked_ids(engine.run("metformin dosage for diabetes").await.unwrap());
    let second = ranked_ids(engine.run("metformin dosage for diabetes").await.unwrap());
    assert_eq!(first, second);
}

#[tokio::test]
async fn variants_always_start_with_expanded_query() {
    let response = engine(seeded_searcher())
        .run("HTN treatment guidelines")
        .await
        .unwrap();

    let variants = &response.report.query_variants;
    assert!(!variants.is_empty());
    assert_eq!(variants[0], "hypertension treatment guidelines");
    assert!(!variants[0].is_empty());
}

#[tokio::test]
async fn report_serializes_for_api_use() {
    let response = engine(seeded_searcher())
        .run("side effects of metformin")
        .await
        .unwrap();

    let value = serde_json::to_value(&response.report).unwrap();
    assert_eq!(value["intent"], "side_effects_lookup");
    assert!(value["query_id"].is_string());
    assert!(value["entities"]["drug"]
        .as_array()
        .unwrap()
        .contains(&serde_json::Value::String("metformin".into())));
}
