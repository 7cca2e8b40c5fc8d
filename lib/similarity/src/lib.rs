//! # brewmatch Similarity
//!
//! Turns extracted features into ranked, feedback-aware match lists.
//!
//! ## Features
//!
//! - **Feature Builder**: Extract, de-duplicate and join bios with looking-for text
//! - **Fixed Schema**: One column per lexicon category, so every table lines up
//! - **Similarity Engine**: Cosine over interests and traits, plus preference compatibility
//! - **Feedback Adjuster**: Accept/reject events scale pairs in place, clamped to [0, 1]
//! - **Ranker**: Stable top-N per user on the 0.7 / 0.3 combined score
//!
//! ## Example
//!
//! ```rust
//! use brewmatch_core::{LexiconSet, RawProfile};
//! use brewmatch_similarity::{FeedbackEvent, MatchConfig, MatchSession, ProfileFeatureBuilder};
//!
//! let lexicons = LexiconSet::builtin();
//! let bios = vec![
//!     RawProfile::new("1", "I love hiking and live music."),
//!     RawProfile::new("2", "Concerts every weekend, and I hike a lot."),
//!     RawProfile::new("3", "I paint and I cook."),
//! ];
//! let wishes = vec![
//!     RawProfile::new("1", "Someone funny."),
//!     RawProfile::new("2", "Shared hobbies matter."),
//!     RawProfile::new("3", "Someone kind."),
//! ];
//!
//! let table = ProfileFeatureBuilder::new(&lexicons).build(&bios, &wishes).unwrap();
//! let mut session = MatchSession::new(table, MatchConfig::default()).unwrap();
//!
//! session.apply_feedback(&[FeedbackEvent::accept("1", "3")]).unwrap();
//! let matches = session.rank("1").unwrap();
//! assert_eq!(matches.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Builder   │────>│   Schema    │────>│  Distance   │
//! │ (text→rows) │     │  (table)    │     │ (matrices)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Rerank    │<────│  Feedback   │
//!                     │  (top-N)    │     │ (adjust)    │
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod builder;
pub mod config;
pub mod distance;
pub mod error;
pub mod matrix;
pub mod rerank;
pub mod schema;
pub mod session;

pub use builder::ProfileFeatureBuilder;
pub use config::{MatchConfig, DEFAULT_TOP_N};
pub use distance::{
    combined_score, compute_preference_score, compute_similarity, PreferenceMatrix,
    NUMERIC_WEIGHT, PREFERENCE_WEIGHT, TRAIT_THRESHOLD,
};
pub use error::MatchError;
pub use matrix::{
    apply_shared, FeedbackAction, FeedbackEvent, FeedbackReport, SharedSimilarity,
    SimilarityMatrix, ACCEPT_FACTOR, REJECT_FACTOR,
};
pub use rerank::{rank, rank_all, rank_all_with, MatchResult, MatchRow, RankedMatch};
pub use schema::{FeatureRow, FeatureSchema, FeatureTable};
pub use session::{simulation_rounds, MatchSession};
