/// Core data model for query understanding and retrieval fusion.
/// Per-query values are exclusively owned by that query's execution and
/// discarded after the response; nothing here is persisted.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Typed medical concept categories recognized in queries and chunk metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Drug,
    Disease,
    Procedure,
    Dosage,
    Anatomy,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Drug      => "drug",
            EntityType::Disease   => "disease",
            EntityType::Procedure => "procedure",
            EntityType::Dosage    => "dosage",
            EntityType::Anatomy   => "anatomy",
        }
    }

    /// Metadata filter field name this entity type maps to.
    /// Field names match the chunk payload schema written at ingestion time.
    pub fn filter_field(&self) -> &'static str {
        match self {
            EntityType::Drug      => "drugs",
            EntityType::Disease   => "diseases",
            EntityType::Procedure => "procedures",
            EntityType::Dosage    => "dosages",
            EntityType::Anatomy   => "anatomy",
        }
    }
}

/// A typed span of text recognized as a medical concept.
///
/// Spans index into the text the entity was extracted from (the expanded
/// query). Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub entity_type: EntityType,
    pub normalized: String,
    pub confidence: f64,
    pub span: (usize, usize),
}

impl Entity {
    pub fn new(
        text: impl Into<String>,
        entity_type: EntityType,
        normalized: impl Into<String>,
        confidence: f64,
        span: (usize, usize),
    ) -> Self {
        debug_assert!((0.0..=1.0).contains(&confidence));
        debug_assert!(span.1 > span.0);
        Self {
            text: text.into(),
            entity_type,
            normalized: normalized.into(),
            confidence,
            span,
        }
    }
}

// ---------------------------------------------------------------------------
// Query analysis
// ---------------------------------------------------------------------------

/// Complete analysis of one incoming query. Created once, read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub original: String,
    pub expanded: String,
    pub entities: Vec<Entity>,
    /// misspelled token → corrected token
    pub corrections: HashMap<String, String>,
    /// abbreviation → expansion applied
    pub expansions: HashMap<String, String>,
}

impl QueryAnalysis {
    /// Entities of a given type, in extraction order.
    pub fn entities_of_type(&self, entity_type: EntityType) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.entity_type == entity_type)
    }

    pub fn has_entity_of_type(&self, entity_type: EntityType) -> bool {
        self.entities_of_type(entity_type).next().is_some()
    }

    /// Normalized entity values grouped by type, for the explainability report.
    pub fn entities_by_type(&self) -> HashMap<&'static str, Vec<String>> {
        let mut grouped: HashMap<&'static str, Vec<String>> = HashMap::new();
        for entity in &self.entities {
            let bucket = grouped.entry(entity.entity_type.as_str()).or_default();
            if !bucket.contains(&entity.normalized) {
                bucket.push(entity.normalized.clone());
            }
        }
        grouped
    }
}

// ---------------------------------------------------------------------------
// Chunk metadata
// ---------------------------------------------------------------------------

/// Structural type of an indexed chunk, assigned by the ingestion chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Heading,
    Text,
    Medication,
    LabResult,
    VitalSigns,
    List,
    Table,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::Heading    => "heading",
            ChunkType::Text       => "text",
            ChunkType::Medication => "medication",
            ChunkType::LabResult  => "lab_result",
            ChunkType::VitalSigns => "vital_signs",
            ChunkType::List       => "list",
            ChunkType::Table      => "table",
        }
    }

    /// Parse from the string stored in the chunk payload.
    /// Unknown values fall back to `Text` rather than failing the hit.
    pub fn from_str(s: &str) -> Self {
        match s {
            "heading"     => ChunkType::Heading,
            "medication"  => ChunkType::Medication,
            "lab_result"  => ChunkType::LabResult,
            "vital_signs" => ChunkType::VitalSigns,
            "list"        => ChunkType::List,
            "table"       => ChunkType::Table,
            _             => ChunkType::Text,
        }
    }
}

impl Default for ChunkType {
    fn default() -> Self {
        ChunkType::Text
    }
}

/// Metadata carried by a retrieved chunk, as written at ingestion time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub section: Option<String>,
    #[serde(default)]
    pub chunk_type: ChunkType,
    pub answer_types: HashSet<String>,
    /// Normalized entity strings attached to the chunk.
    pub entities: HashSet<String>,
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// Which boost factors fired for a candidate, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostKind {
    EntityMatch,
    SectionMatch,
    AnswerTypeMatch,
    ChunkTypeMatch,
}

impl BoostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoostKind::EntityMatch    => "entity_match",
            BoostKind::SectionMatch   => "section_match",
            BoostKind::AnswerTypeMatch => "answer_type_match",
            BoostKind::ChunkTypeMatch => "chunk_type_match",
        }
    }
}

/// One retrieved chunk plus its scores and metadata, scoped to one query
/// execution. The same chunk_id retrieved from two collections stays two
/// candidates; each lives in its own vector space with its own raw_score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub chunk_id: String,
    /// Native similarity score of the source collection. Not comparable
    /// across collections.
    pub raw_score: f64,
    /// Embedding model name that produced this hit.
    pub source_collection: String,
    pub metadata: ChunkMetadata,
    /// raw_score after multiplicative boosts; always >= raw_score.
    pub boosted_score: f64,
    /// The query variant whose search produced this hit.
    pub matched_variant: String,
    pub applied_boosts: Vec<BoostKind>,
}

impl Candidate {
    /// A fresh, unboosted candidate from a raw search hit.
    pub fn from_hit(
        chunk_id: impl Into<String>,
        raw_score: f64,
        source_collection: impl Into<String>,
        metadata: ChunkMetadata,
        matched_variant: impl Into<String>,
    ) -> Self {
        let raw = raw_score;
        Self {
            chunk_id: chunk_id.into(),
            raw_score: raw,
            source_collection: source_collection.into(),
            metadata,
            boosted_score: raw,
            matched_variant: matched_variant.into(),
            applied_boosts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_field_names() {
        assert_eq!(EntityType::Drug.filter_field(), "drugs");
        assert_eq!(EntityType::Disease.filter_field(), "diseases");
        assert_eq!(EntityType::Anatomy.filter_field(), "anatomy");
    }

    #[test]
    fn test_chunk_type_roundtrip() {
        for ct in [
            ChunkType::Heading,
            ChunkType::Text,
            ChunkType::Medication,
            ChunkType::LabResult,
            ChunkType::VitalSigns,
            ChunkType::List,
            ChunkType::Table,
        ] {
            assert_eq!(ChunkType::from_str(ct.as_str()), ct);
        }
        // Unknown payload values degrade to Text
        assert_eq!(ChunkType::from_str("paragraph"), ChunkType::Text);
    }

    #[test]
    fn test_fresh_candidate_is_unboosted() {
        let c = Candidate::from_hit("pubmedbert::c1", 0.8, "pubmedbert", ChunkMetadata::default(), "q");
        assert_eq!(c.boosted_score, c.raw_score);
        assert!(c.applied_boosts.is_empty());
    }

    #[test]
    fn test_entities_by_type_dedups() {
        let analysis = QueryAnalysis {
            original: "metformin metformin".into(),
            expanded: "metformin metformin".into(),
            entities: vec![
                Entity::new("metformin", EntityType::Drug, "metformin", 0.95, (0, 9)),
                Entity::new("metformin", EntityType::Drug, "metformin", 0.95, (10, 19)),
            ],
            corrections: HashMap::new(),
            expansions: HashMap::new(),
        };
        let grouped = analysis.entities_by_type();
        assert_eq!(grouped["drug"], vec!["metformin".to_string()]);
    }
}
