//! # brewmatch Core
//!
//! Core library for the brewmatch profile matching engine.
//!
//! This crate turns free text into bounded, structured features:
//!
//! - [`LexiconSet`] - Immutable keyword tables for interests, traits and preferences
//! - [`SyntaxParser`] - Sentence/token/dependent interface, with [`RuleBasedParser`]
//! - [`SentimentScorer`] - Sentence compound sentiment, with [`LexiconSentiment`]
//! - [`FeatureExtractor`] - Interest/trait scores and preference flags from text
//! - [`FeatureVector`] - Dense numeric vectors with cosine similarity
//!
//! ## Example
//!
//! ```rust
//! use brewmatch_core::{FeatureExtractor, LexiconSet, PreferenceFlag};
//!
//! let lexicons = LexiconSet::builtin();
//! let extractor = FeatureExtractor::with_defaults(&lexicons);
//!
//! let interests = extractor.extract_interests(Some("I love hiking and I read a lot."));
//! assert!(interests["sports"] > 5);
//!
//! let traits = extractor.extract_traits(Some("9/10 humor"));
//! assert_eq!(traits["humor"], 9);
//!
//! let prefs = extractor.extract_preferences(Some("someone who shares my faith"));
//! assert_eq!(prefs["religion"], Some(PreferenceFlag::Religious));
//! ```

pub mod error;
pub mod extract;
pub mod lexicon;
pub mod profile;
pub mod sentiment;
pub mod text;
pub mod vector;

pub use error::{Error, Result};
pub use extract::{bound_score, FeatureExtractor, BASE_SCORE, SENTIMENT_SCALE};
pub use lexicon::{Category, IntensityModifiers, Lexicon, LexiconSet, RELIGION, SHARED_INTERESTS};
pub use profile::{FeatureRecord, PreferenceFlag, PreferenceMap, RawProfile, ScoreMap, MAX_SCORE};
pub use sentiment::{LexiconSentiment, SentimentScorer};
pub use text::{Document, RuleBasedParser, Sentence, SyntaxParser, Token};
pub use vector::FeatureVector;
