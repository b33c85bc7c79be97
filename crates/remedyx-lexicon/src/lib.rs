//! remedyx-lexicon — Static medical lexicon and dictionary matcher.
//!
//! Holds the abbreviation, misspelling, term, and synonym tables the query
//! analyzer runs against, plus an Aho-Corasick automaton for O(n)
//! longest-match entity recognition. The lexicon is pure data: built once at
//! startup, shared by reference, never mutated, no I/O at query time.

mod builtin;
mod lexicon;
mod matcher;

pub use lexicon::{AbbreviationEntry, LexiconData, MedicalLexicon, TermEntry};
pub use matcher::{TermMatch, TermMatcher};
