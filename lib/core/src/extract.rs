//! Text feature extraction
//!
//! Turns one free-text field into bounded per-category scores (interests,
//! traits) or presence flags (preferences).
//!
//! For interests and traits, every token that matches a category keyword
//! scores `5 + 5 * sentiment` where `sentiment` is the compound score of its
//! sentence; each intensity modifier among the token's dependents multiplies
//! that score. Scores are rounded and clamped to `[0, 10]`, and a category
//! keeps the maximum over all of its mentions.

use crate::lexicon::{Lexicon, LexiconSet, RELIGION, SHARED_INTERESTS};
use crate::profile::{FeatureRecord, PreferenceFlag, PreferenceMap, ScoreMap, MAX_SCORE};
use crate::sentiment::{LexiconSentiment, SentimentScorer};
use crate::text::{Document, RuleBasedParser, SyntaxParser};
use ahash::AHashMap;
use lazy_static::lazy_static;
use regex::Regex;

/// Score of a keyword mention in a perfectly neutral sentence.
pub const BASE_SCORE: f32 = 5.0;

/// How far sentiment moves a mention away from [`BASE_SCORE`].
pub const SENTIMENT_SCALE: f32 = 5.0;

lazy_static! {
    /// `<1-2 digits>/<1-2 digits> <word>`, e.g. "9/10 humor"
    static ref RATING_PATTERN: Regex =
        Regex::new(r"(\d{1,2})/\d{1,2}\s*(\w+)").expect("rating pattern is valid");
}

/// Keyword → categories listing it
///
/// Matching is per token, so a keyword containing whitespace never matches.
#[derive(Debug, Clone, Default)]
struct KeywordIndex {
    by_token: AHashMap<String, Vec<usize>>,
}

impl KeywordIndex {
    fn build(lexicon: &Lexicon) -> Self {
        let mut by_token: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (category, entry) in lexicon.categories().iter().enumerate() {
            for keyword in &entry.keywords {
                let hits = by_token.entry(keyword.clone()).or_default();
                if !hits.contains(&category) {
                    hits.push(category);
                }
            }
        }
        Self { by_token }
    }

    fn categories(&self, token: &str) -> &[usize] {
        self.by_token.get(token).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Round, then clamp a raw score into `[0, MAX_SCORE]`
#[inline]
pub fn bound_score(raw: f32) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, f32::from(MAX_SCORE)) as u8
}

/// Extracts features from free text using an immutable [`LexiconSet`]
pub struct FeatureExtractor<'a> {
    lexicons: &'a LexiconSet,
    parser: Box<dyn SyntaxParser>,
    scorer: Box<dyn SentimentScorer>,
    interest_index: KeywordIndex,
    trait_index: KeywordIndex,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(
        lexicons: &'a LexiconSet,
        parser: Box<dyn SyntaxParser>,
        scorer: Box<dyn SentimentScorer>,
    ) -> Self {
        Self {
            interest_index: KeywordIndex::build(&lexicons.interests),
            trait_index: KeywordIndex::build(&lexicons.traits),
            lexicons,
            parser,
            scorer,
        }
    }

    /// Extractor backed by [`RuleBasedParser`] and [`LexiconSentiment`]
    pub fn with_defaults(lexicons: &'a LexiconSet) -> Self {
        Self::new(lexicons, Box::new(RuleBasedParser), Box::new(LexiconSentiment))
    }

    pub fn lexicons(&self) -> &LexiconSet {
        self.lexicons
    }

    /// Lower-case and parse; absent text parses to an empty document
    fn preprocess(&self, text: Option<&str>) -> (String, Document) {
        match text {
            Some(raw) if !raw.trim().is_empty() => {
                let lowered = raw.to_lowercase();
                let doc = self.parser.parse(&lowered);
                (lowered, doc)
            }
            _ => (String::new(), Document::default()),
        }
    }

    pub fn extract_interests(&self, text: Option<&str>) -> ScoreMap {
        let (_, doc) = self.preprocess(text);
        self.interests_from(&doc)
    }

    /// Trait scores; explicit "N/10 trait" ratings win over keyword evidence
    pub fn extract_traits(&self, text: Option<&str>) -> ScoreMap {
        let (_, doc) = self.preprocess(text);
        self.traits_from(text.unwrap_or_default(), &doc)
    }

    pub fn extract_preferences(&self, text: Option<&str>) -> PreferenceMap {
        let (lowered, doc) = self.preprocess(text);
        self.preferences_from(&lowered, &doc)
    }

    /// Full record from a bio and a looking-for text, parsing each once
    pub fn extract_record(
        &self,
        uid: &str,
        bio: Option<&str>,
        looking_for: Option<&str>,
    ) -> FeatureRecord {
        let (_, bio_doc) = self.preprocess(bio);
        let (lowered, wish_doc) = self.preprocess(looking_for);

        FeatureRecord {
            uid: uid.to_string(),
            interests: self.interests_from(&bio_doc),
            traits: self.traits_from(bio.unwrap_or_default(), &bio_doc),
            preferences: self.preferences_from(&lowered, &wish_doc),
        }
    }

    fn interests_from(&self, doc: &Document) -> ScoreMap {
        let mut scores = ScoreMap::new();
        self.scan(doc, &self.lexicons.interests, &self.interest_index, &mut scores, |_| false);
        scores
    }

    fn traits_from(&self, raw: &str, doc: &Document) -> ScoreMap {
        let explicit = self.explicit_ratings(raw);
        let mut scores = explicit.clone();
        self.scan(doc, &self.lexicons.traits, &self.trait_index, &mut scores, |name| {
            explicit.contains_key(name)
        });
        scores
    }

    /// Explicit ratings from the raw text, restricted to known traits
    fn explicit_ratings(&self, raw: &str) -> ScoreMap {
        let mut ratings = ScoreMap::new();
        for caps in RATING_PATTERN.captures_iter(raw) {
            let name = caps[2].to_lowercase();
            if !self.lexicons.traits.contains(&name) {
                continue;
            }
            if let Ok(value) = caps[1].parse::<u8>() {
                ratings.insert(name, value.min(MAX_SCORE));
            }
        }
        ratings
    }

    fn scan<F>(
        &self,
        doc: &Document,
        lexicon: &Lexicon,
        index: &KeywordIndex,
        scores: &mut ScoreMap,
        skip: F,
    ) where
        F: Fn(&str) -> bool,
    {
        let categories = lexicon.categories();

        for sentence in &doc.sentences {
            let sentiment = self.scorer.compound(&sentence.text);
            let base = BASE_SCORE + sentiment * SENTIMENT_SCALE;

            for (i, token) in sentence.tokens.iter().enumerate() {
                for &category in index.categories(&token.text) {
                    let name = categories[category].name.as_str();
                    if skip(name) {
                        continue;
                    }

                    let raw = sentence
                        .children_of(i)
                        .filter_map(|child| self.lexicons.modifiers.weight(&child.text))
                        .fold(base, |score, weight| score * weight);
                    let score = bound_score(raw);

                    scores
                        .entry(name.to_string())
                        .and_modify(|best| *best = (*best).max(score))
                        .or_insert(score);
                }
            }
        }
    }

    fn preferences_from(&self, lowered: &str, doc: &Document) -> PreferenceMap {
        let lexicon = &self.lexicons.preferences;
        let mut flags: PreferenceMap = lexicon.names().map(|n| (n.to_string(), None)).collect();

        fn mentions(keywords: &[String], text: &str) -> bool {
            keywords.iter().any(|k| text.contains(k.as_str()))
        }

        for category in lexicon.categories() {
            let flag = match category.name.as_str() {
                SHARED_INTERESTS => mentions(&category.keywords, lowered).then_some(PreferenceFlag::Yes),
                RELIGION => mentions(&category.keywords, lowered).then_some(PreferenceFlag::Religious),
                _ => doc
                    .sentences
                    .iter()
                    .any(|s| mentions(&category.keywords, &s.text))
                    .then_some(PreferenceFlag::Yes),
            };
            if flag.is_some() {
                flags.insert(category.name.clone(), flag);
            }
        }

        flags
    }
}
