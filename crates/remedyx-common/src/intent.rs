//! Query intents and their static retrieval profiles.
//!
//! Intent is a closed tagged enumeration; every downstream behavior
//! difference is a table lookup keyed by the tag, never virtual dispatch.
//! The profile table is configuration data built once at startup and shared
//! read-only across queries.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entities::{ChunkType, EntityType};

/// The classified purpose of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    DosageLookup,
    SideEffectsLookup,
    ContraindicationsLookup,
    DiseaseInfo,
    TreatmentLookup,
    DrugInteraction,
    ProcedureInfo,
    General,
}

impl Intent {
    /// All intents ordered most-specific first. Used to resolve exact score
    /// ties: the earlier intent wins, and `General` never beats a tie.
    pub const SPECIFICITY: [Intent; 8] = [
        Intent::DrugInteraction,
        Intent::ContraindicationsLookup,
        Intent::DosageLookup,
        Intent::SideEffectsLookup,
        Intent::TreatmentLookup,
        Intent::ProcedureInfo,
        Intent::DiseaseInfo,
        Intent::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::DosageLookup            => "dosage_lookup",
            Intent::SideEffectsLookup       => "side_effects_lookup",
            Intent::ContraindicationsLookup => "contraindications_lookup",
            Intent::DiseaseInfo             => "disease_info",
            Intent::TreatmentLookup         => "treatment_lookup",
            Intent::DrugInteraction         => "drug_interaction",
            Intent::ProcedureInfo           => "procedure_info",
            Intent::General                 => "general",
        }
    }
}

/// Static retrieval configuration attached to one intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentProfile {
    /// Chunk answer-type tags this intent expects. Used as a soft boost
    /// category, never a hard filter.
    pub answer_types: HashSet<String>,
    /// Document sections whose chunks get the section boost.
    pub boost_sections: HashSet<String>,
    /// Entity types that drive metadata filtering for this intent.
    pub entity_types_of_interest: HashSet<EntityType>,
    /// Section boost factor. Always > 1.0.
    pub boost_weight: f64,
    /// Structural chunk types favoured by the chunk-type boost.
    pub preferred_chunk_types: HashSet<ChunkType>,
    /// Whether answers to this intent demand high-precision sourcing.
    pub precision_required: bool,
}

/// Immutable profile table, one entry per intent. Construct once at startup
/// and share by reference; safe for concurrent reads.
#[derive(Debug, Clone)]
pub struct IntentProfiles {
    profiles: HashMap<Intent, IntentProfile>,
}

impl IntentProfiles {
    /// The built-in profile table.
    pub fn builtin() -> Self {
        let mut profiles = HashMap::new();

        profiles.insert(
            Intent::DosageLookup,
            profile(
                &["dosage"],
                &["dosage", "dosage_administration", "administration"],
                &[EntityType::Drug, EntityType::Dosage],
                1.3,
                &[ChunkType::Medication, ChunkType::Table],
                true,
            ),
        );
        profiles.insert(
            Intent::SideEffectsLookup,
            profile(
                &["side_effects"],
                &["side_effects", "adverse_reactions", "warnings"],
                &[EntityType::Drug],
                1.3,
                &[ChunkType::Text, ChunkType::List, ChunkType::Table],
                true,
            ),
        );
        profiles.insert(
            Intent::ContraindicationsLookup,
            profile(
                &["contraindications"],
                &["contraindications", "warnings", "precautions"],
                &[EntityType::Drug, EntityType::Disease],
                1.3,
                &[ChunkType::Text, ChunkType::List],
                true,
            ),
        );
        profiles.insert(
            Intent::DiseaseInfo,
            profile(
                &["definition", "diagnosis"],
                &["definition", "overview", "clinical_features", "symptoms"],
                &[EntityType::Disease],
                1.2,
                &[ChunkType::Heading, ChunkType::Text],
                false,
            ),
        );
        profiles.insert(
            Intent::TreatmentLookup,
            profile(
                &["treatment"],
                &["treatment", "management", "therapy", "guidelines"],
                &[EntityType::Disease, EntityType::Drug, EntityType::Procedure],
                1.2,
                &[ChunkType::Text, ChunkType::List, ChunkType::Medication],
                true,
            ),
        );
        profiles.insert(
            Intent::DrugInteraction,
            profile(
                &["drug_interactions", "contraindications"],
                &["drug_interactions", "contraindications", "warnings"],
                &[EntityType::Drug],
                1.3,
                &[ChunkType::Text, ChunkType::Table, ChunkType::List],
                true,
            ),
        );
        profiles.insert(
            Intent::ProcedureInfo,
            profile(
                &["procedure"],
                &["procedure", "technique", "method"],
                &[EntityType::Procedure],
                1.2,
                &[ChunkType::Text, ChunkType::List, ChunkType::Table],
                true,
            ),
        );
        profiles.insert(
            Intent::General,
            profile(&["general"], &[], &[], 1.1, &[], false),
        );

        Self { profiles }
    }

    pub fn get(&self, intent: Intent) -> &IntentProfile {
        // builtin() covers every variant of the closed enum
        &self.profiles[&intent]
    }
}

impl Default for IntentProfiles {
    fn default() -> Self {
        Self::builtin()
    }
}

fn profile(
    answer_types: &[&str],
    boost_sections: &[&str],
    entity_types: &[EntityType],
    boost_weight: f64,
    chunk_types: &[ChunkType],
    precision_required: bool,
) -> IntentProfile {
    IntentProfile {
        answer_types: answer_types.iter().map(|s| s.to_string()).collect(),
        boost_sections: boost_sections.iter().map(|s| s.to_string()).collect(),
        entity_types_of_interest: entity_types.iter().copied().collect(),
        boost_weight,
        preferred_chunk_types: chunk_types.iter().copied().collect(),
        precision_required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_intent_has_a_profile() {
        let profiles = IntentProfiles::builtin();
        for intent in Intent::SPECIFICITY {
            let p = profiles.get(intent);
            assert!(p.boost_weight > 1.0, "{} weight must exceed 1.0", intent.as_str());
        }
    }

    #[test]
    fn test_dosage_profile_boosts_dosage_section() {
        let profiles = IntentProfiles::builtin();
        let p = profiles.get(Intent::DosageLookup);
        assert!(p.boost_sections.contains("dosage"));
        assert!(p.entity_types_of_interest.contains(&EntityType::Drug));
        assert!(p.preferred_chunk_types.contains(&ChunkType::Medication));
    }

    #[test]
    fn test_general_never_section_boosts() {
        let profiles = IntentProfiles::builtin();
        assert!(profiles.get(Intent::General).boost_sections.is_empty());
    }

    #[test]
    fn test_specificity_puts_general_last() {
        assert_eq!(*Intent::SPECIFICITY.last().unwrap(), Intent::General);
    }
}
