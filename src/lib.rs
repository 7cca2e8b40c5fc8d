//! # brewmatch
//!
//! A profile matching engine: free-text bios and partner preferences go in,
//! ranked candidate matches come out, refined by accept/reject feedback.
//!
//! ## Quick Start
//!
//! ### As a Command
//!
//! ```bash
//! brewmatch --bio bio.csv --looking-for looking_for.csv --output final_matches.csv
//! brewmatch --simulate-feedback --feedback-log feedback.csv --top-n 3
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use brewmatch::prelude::*;
//!
//! let lexicons = LexiconSet::builtin();
//! let bios = vec![
//!     RawProfile::new("a", "I love jazz concerts and long hikes."),
//!     RawProfile::new("b", "Live music is my thing, and hiking."),
//!     RawProfile::new("c", "I cook and garden."),
//! ];
//! let wishes = vec![
//!     RawProfile::new("a", "Someone who shares my hobbies."),
//!     RawProfile::new("b", "Someone funny."),
//!     RawProfile::new("c", ""),
//! ];
//!
//! let table = ProfileFeatureBuilder::new(&lexicons).build(&bios, &wishes).unwrap();
//! let mut session = MatchSession::new(table, MatchConfig::default()).unwrap();
//! session.apply_feedback(&[FeedbackEvent::reject("a", "b")]).unwrap();
//!
//! for result in session.rank_all().unwrap() {
//!     assert!(result.matches.iter().all(|m| m.uid != result.uid));
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `brewmatch-core` - Lexicons, text parsing, sentiment and feature extraction
//! - `brewmatch-similarity` - Feature table, similarity, feedback and ranking
//! - `brewmatch-storage` - CSV input, atomic output and the feedback log

// Re-export core types
pub use brewmatch_core::{
    Error, FeatureExtractor, FeatureRecord, FeatureVector, LexiconSentiment, LexiconSet,
    PreferenceFlag, RawProfile, RuleBasedParser, Result, SentimentScorer, SyntaxParser,
};

// Re-export matching
pub use brewmatch_similarity::{
    simulation_rounds, FeatureTable, FeedbackAction, FeedbackEvent, FeedbackReport, MatchConfig,
    MatchError, MatchResult, MatchSession, ProfileFeatureBuilder, RankedMatch, SimilarityMatrix,
};

// Re-export storage
pub use brewmatch_storage::{read_profiles, write_feature_table, write_matches, FeedbackLog};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        FeatureExtractor, FeatureTable, FeedbackAction, FeedbackEvent, LexiconSet, MatchConfig,
        MatchError, MatchResult, MatchSession, PreferenceFlag, ProfileFeatureBuilder, RawProfile,
    };
}
