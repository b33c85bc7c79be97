//! Pipeline orchestration.

use std::sync::Arc;

use tracing::{info, warn};

use remedyx_common::{
    Candidate, EngineConfig, EngineError, IntentProfiles, Result,
};
use remedyx_lexicon::MedicalLexicon;
use remedyx_query::{IntentClassifier, QueryAnalyzer, StrategyBuilder, VariantGenerator};
use remedyx_retrieval::{
    BoostEngine, EmbeddingProvider, MultiCollectionRetriever, VectorSearchProvider,
};

use crate::report::QueryReport;

/// Ranked candidates plus the analysis report for one query.
#[derive(Debug)]
pub struct EngineResponse {
    /// Full boosted, ranked candidate list. Truncation to top-N is the
    /// caller's responsibility.
    pub candidates: Vec<Candidate>,
    pub report: QueryReport,
}

/// The per-process engine. All fields are shared read-only tables or
/// stateless components; per-query state lives entirely on the `run` stack,
/// so one engine serves concurrent queries without locking.
pub struct QueryEngine {
    config: EngineConfig,
    analyzer: QueryAnalyzer,
    classifier: IntentClassifier,
    variants: VariantGenerator,
    strategy_builder: StrategyBuilder,
    retriever: MultiCollectionRetriever,
    boost: BoostEngine,
}

impl QueryEngine {
    pub fn new(
        lexicon: Arc<MedicalLexicon>,
        profiles: Arc<IntentProfiles>,
        config: EngineConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        searcher: Arc<dyn VectorSearchProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let analyzer = QueryAnalyzer::new(Arc::clone(&lexicon), &config);
        let classifier =
            IntentClassifier::new(Arc::clone(&profiles), config.intent_min_score);
        let variants = VariantGenerator::new(lexicon, config.variant_cap);
        let strategy_builder =
            StrategyBuilder::new(Arc::clone(&profiles), config.entity_filter_confidence);
        let retriever = MultiCollectionRetriever::new(
            embedder,
            searcher,
            config.concurrency,
            config.retrieval_timeout,
        );
        let boost = BoostEngine::new(profiles, &config);

        Ok(Self {
            config,
            analyzer,
            classifier,
            variants,
            strategy_builder,
            retriever,
            boost,
        })
    }

    /// Process one query end to end.
    ///
    /// Per-collection failures narrow recall silently (recorded in the
    /// report); only the everything-failed case empties the response, and
    /// even that is reported with `retrieval_failed` rather than an error.
    pub async fn run(&self, raw_query: &str) -> Result<EngineResponse> {
        let analysis = self.analyzer.analyze(raw_query);
        let classification = self.classifier.classify(&analysis);
        let variants = self
            .variants
            .generate(&analysis, classification.intent);
        let strategy = self.strategy_builder.build(
            &analysis,
            classification.intent,
            classification.confidence,
            variants,
        );

        // Nothing searchable; answer honestly with an empty response.
        if analysis.expanded.trim().is_empty() {
            let report = QueryReport::new(
                &analysis,
                &classification,
                &strategy,
                &self.config.collections,
                &[],
                false,
                0,
            );
            return Ok(EngineResponse {
                candidates: Vec::new(),
                report,
            });
        }

        let retrieval = match self
            .retriever
            .retrieve(&strategy, &self.config.collections, self.config.k_per_query)
            .await
        {
            Ok(retrieval) => retrieval,
            Err(EngineError::AllCollectionsFailed) => {
                warn!(
                    query = %analysis.original,
                    "all collections failed; returning empty result"
                );
                let report = QueryReport::new(
                    &analysis,
                    &classification,
                    &strategy,
                    &self.config.collections,
                    &self.config.collections,
                    true,
                    0,
                );
                return Ok(EngineResponse {
                    candidates: Vec::new(),
                    report,
                });
            }
            Err(other) => return Err(other),
        };

        let candidates = self.boost.score(retrieval.candidates, &strategy);

        info!(
            intent = strategy.intent.as_str(),
            candidates = candidates.len(),
            failed_collections = retrieval.failed_collections.len(),
            "query processed"
        );

        let report = QueryReport::new(
            &analysis,
            &classification,
            &strategy,
            &self.config.collections,
            &retrieval.failed_collections,
            false,
            candidates.len(),
        );

        Ok(EngineResponse { candidates, report })
    }
}
