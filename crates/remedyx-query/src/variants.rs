//! Query variant generation for recall.
//!
//! Variant 0 is always the (expanded) original. Synonym substitutions and
//! intent rephrasings follow, deduplicated, capped. When the cap bites,
//! synonym variants are dropped before rephrasings; the original is never
//! dropped.

use std::sync::Arc;

use remedyx_lexicon::MedicalLexicon;
use tracing::debug;

use remedyx_common::{EntityType, Intent, QueryAnalysis};

pub struct VariantGenerator {
    lexicon: Arc<MedicalLexicon>,
    cap: usize,
}

impl VariantGenerator {
    pub fn new(lexicon: Arc<MedicalLexicon>, cap: usize) -> Self {
        Self { lexicon, cap }
    }

    pub fn generate(&self, analysis: &QueryAnalysis, intent: Intent) -> Vec<String> {
        let original = analysis.expanded.clone();

        let mut synonym_variants = Vec::new();
        for entity in analysis.entities.iter().filter(|e| {
            matches!(e.entity_type, EntityType::Drug | EntityType::Disease)
        }) {
            for synonym in self.lexicon.synonyms_of(&entity.normalized) {
                let (start, end) = entity.span;
                let mut variant = String::with_capacity(analysis.expanded.len());
                variant.push_str(&analysis.expanded[..start]);
                variant.push_str(synonym);
                variant.push_str(&analysis.expanded[end..]);
                synonym_variants.push(variant);
            }
        }

        let mut rephrasings = Vec::new();
        if let Some(suffix) = match intent {
            Intent::DosageLookup => Some("dose"),
            Intent::TreatmentLookup => Some("treatment options"),
            _ => None,
        } {
            let mut focus: Vec<&str> = Vec::new();
            for entity in analysis.entities.iter().filter(|e| {
                matches!(
                    e.entity_type,
                    EntityType::Drug | EntityType::Disease | EntityType::Procedure
                )
            }) {
                if !focus.contains(&entity.normalized.as_str()) {
                    focus.push(&entity.normalized);
                }
            }
            if !focus.is_empty() {
                rephrasings.push(format!("{} {}", focus.join(" "), suffix));
            }
        }

        // Dedup by exact string against everything already kept
        let mut seen = vec![original.clone()];
        synonym_variants.retain(|v| {
            let fresh = !seen.contains(v);
            if fresh {
                seen.push(v.clone());
            }
            fresh
        });
        rephrasings.retain(|v| {
            let fresh = !seen.contains(v);
            if fresh {
                seen.push(v.clone());
            }
            fresh
        });

        // Cap: synonym variants go first, the original never does
        while 1 + synonym_variants.len() + rephrasings.len() > self.cap {
            if synonym_variants.pop().is_none() && rephrasings.pop().is_none() {
                break;
            }
        }

        let mut variants = Vec::with_capacity(1 + synonym_variants.len() + rephrasings.len());
        variants.push(original);
        variants.extend(synonym_variants);
        variants.extend(rephrasings);

        debug!(count = variants.len(), "variants generated");
        variants
    }
}
