//! Dictionary matcher for medical term recognition.
//!
//! Uses an Aho-Corasick automaton with `MatchKind::LeftmostLongest`, so a
//! scan yields non-overlapping matches that already satisfy
//! longest-span-wins with earliest-start tie-breaking. Matches are then
//! filtered to word boundaries so "heart" never fires inside "heartburn".

use aho_corasick::{AhoCorasick, MatchKind};
use remedyx_common::{EngineError, EntityType, Result};

use crate::lexicon::TermEntry;

/// One dictionary hit with byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatch {
    pub start: usize,
    pub end: usize,
    pub entity_type: EntityType,
    pub normalized: String,
}

/// Aho-Corasick automaton over every dictionary surface form, plus a side
/// table mapping pattern index back to (entity type, normalized form).
pub struct TermMatcher {
    automaton: AhoCorasick,
    pattern_info: Vec<(EntityType, String)>,
}

impl TermMatcher {
    pub fn new(terms: &[TermEntry]) -> Result<Self> {
        let patterns: Vec<&str> = terms.iter().map(|t| t.surface.as_str()).collect();
        let pattern_info = terms
            .iter()
            .map(|t| (t.entity_type, t.normalized.clone()))
            .collect();

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| EngineError::Config(format!("term automaton build failed: {e}")))?;

        Ok(Self { automaton, pattern_info })
    }

    /// Scan `text` and return word-bounded dictionary matches in order of
    /// appearance.
    pub fn find(&self, text: &str) -> Vec<TermMatch> {
        let bytes = text.as_bytes();
        let mut matches = Vec::new();

        for mat in self.automaton.find_iter(text) {
            if !on_word_boundary(bytes, mat.start(), mat.end()) {
                continue;
            }
            let (entity_type, normalized) = &self.pattern_info[mat.pattern().as_usize()];
            matches.push(TermMatch {
                start: mat.start(),
                end: mat.end(),
                entity_type: *entity_type,
                normalized: normalized.clone(),
            });
        }

        matches
    }
}

fn on_word_boundary(bytes: &[u8], start: usize, end: usize) -> bool {
    let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
    let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
    before_ok && after_ok
}
