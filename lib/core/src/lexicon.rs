//! Lexicon tables
//!
//! Static keyword tables for the three feature domains (interests, personality
//! traits, partner preferences) and the intensity modifier table. A
//! [`LexiconSet`] is built once at start-up and passed by reference into every
//! extractor; nothing here is mutated after construction.

use crate::{Error, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Preference category for "wants shared interests" phrasing.
pub const SHARED_INTERESTS: &str = "shared_interests";

/// Preference category for any religion mention.
pub const RELIGION: &str = "religion";

const PREFERENCE_SUFFIX: &str = "_pref";

/// A named dimension and the keywords that evidence it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered category → keyword table
///
/// Category order is preserved; it fixes the column order of feature tables.
/// Keywords are stored lower-cased so matching against lower-cased text is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    categories: Vec<Category>,
    index: AHashMap<String, usize>,
}

impl Lexicon {
    /// Build a lexicon, rejecting duplicate or empty category names
    pub fn new<I, S, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<K>)>,
        S: Into<String>,
        K: AsRef<str>,
    {
        let mut categories = Vec::new();
        let mut index = AHashMap::new();

        for (name, keywords) in entries {
            let name = name.into().trim().to_lowercase();
            if name.is_empty() {
                return Err(Error::InvalidLexicon("empty category name".to_string()));
            }
            if index.contains_key(&name) {
                return Err(Error::InvalidLexicon(format!("duplicate category '{}'", name)));
            }

            let keywords: Vec<String> = keywords
                .iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();

            index.insert(name.clone(), categories.len());
            categories.push(Category { name, keywords });
        }

        Ok(Self { categories, index })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in table order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.index.contains_key(category)
    }

    pub fn position(&self, category: &str) -> Option<usize> {
        self.index.get(category).copied()
    }

    pub fn keywords(&self, category: &str) -> Option<&[String]> {
        self.position(category)
            .map(|i| self.categories[i].keywords.as_slice())
    }
}

/// Word → multiplicative weight applied to a keyword's base score
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntensityModifiers {
    weights: AHashMap<String, f32>,
}

impl IntensityModifiers {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: AsRef<str>,
    {
        let weights = entries
            .into_iter()
            .map(|(word, weight)| (word.as_ref().trim().to_lowercase(), weight))
            .collect();
        Self { weights }
    }

    #[inline]
    pub fn weight(&self, word: &str) -> Option<f32> {
        self.weights.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    fn to_sorted(&self) -> BTreeMap<String, f32> {
        self.weights.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

/// The complete, immutable lexicon configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconSet {
    pub interests: Lexicon,
    pub traits: Lexicon,
    pub preferences: Lexicon,
    pub modifiers: IntensityModifiers,
}

/// On-disk form of a lexicon set
#[derive(Debug, Serialize, Deserialize)]
struct LexiconFile {
    interests: BTreeMap<String, Vec<String>>,
    traits: BTreeMap<String, Vec<String>>,
    preferences: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    modifiers: BTreeMap<String, f32>,
}

impl LexiconSet {
    /// Assemble and validate a lexicon set
    pub fn new(
        interests: Lexicon,
        traits: Lexicon,
        preferences: Lexicon,
        modifiers: IntensityModifiers,
    ) -> Result<Self> {
        let set = Self { interests, traits, preferences, modifiers };
        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> Result<()> {
        if self.interests.is_empty() {
            return Err(Error::InvalidLexicon("interest lexicon is empty".to_string()));
        }
        if self.traits.is_empty() {
            return Err(Error::InvalidLexicon("trait lexicon is empty".to_string()));
        }
        for required in [SHARED_INTERESTS, RELIGION] {
            if !self.preferences.contains(required) {
                return Err(Error::InvalidLexicon(format!(
                    "preference lexicon must define '{}'",
                    required
                )));
            }
        }
        Ok(())
    }

    /// Load a lexicon override from a JSON file
    ///
    /// Preference keys may carry a `_pref` suffix (`loyalty_pref`); it is
    /// stripped so the preference lines up with the trait of the same name.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::LexiconNotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: LexiconFile = serde_json::from_str(raw)?;

        let preferences = file.preferences.into_iter().map(|(name, keywords)| {
            let name = name
                .strip_suffix(PREFERENCE_SUFFIX)
                .map(str::to_string)
                .unwrap_or(name);
            (name, keywords)
        });

        Self::new(
            Lexicon::new(file.interests)?,
            Lexicon::new(file.traits)?,
            Lexicon::new(preferences)?,
            IntensityModifiers::new(file.modifiers),
        )
    }

    /// Serialize to the same JSON shape [`LexiconSet::from_json_str`] accepts
    pub fn to_json_string(&self) -> Result<String> {
        fn table(lexicon: &Lexicon) -> BTreeMap<String, Vec<String>> {
            lexicon
                .categories()
                .iter()
                .map(|c| (c.name.clone(), c.keywords.clone()))
                .collect()
        }

        let file = LexiconFile {
            interests: table(&self.interests),
            traits: table(&self.traits),
            preferences: table(&self.preferences),
            modifiers: self.modifiers.to_sorted(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// The built-in tables
    pub fn builtin() -> Self {
        // The tables below satisfy every validation rule.
        Self {
            interests: builtin_lexicon(INTERESTS),
            traits: builtin_lexicon(TRAITS),
            preferences: builtin_lexicon(PREFERENCES),
            modifiers: IntensityModifiers::new(MODIFIERS.iter().copied()),
        }
    }
}

impl Default for LexiconSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_lexicon(table: &[(&str, &[&str])]) -> Lexicon {
    let categories: Vec<Category> = table
        .iter()
        .map(|(name, keywords)| Category {
            name: (*name).to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        })
        .collect();
    let index = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name.clone(), i))
        .collect();
    Lexicon { categories, index }
}

const INTERESTS: &[(&str, &[&str])] = &[
    ("sports", &["sports", "hiking", "gym", "exercise", "yoga"]),
    ("dining", &["dining", "food", "restaurant", "meal"]),
    ("movies", &["movie", "tv", "film", "show"]),
    ("art", &["art", "museum", "theater", "concert"]),
    ("reading", &["book", "read", "literature", "novel", "poetry", "nonfiction"]),
    ("music", &["music", "concert", "symphony"]),
    ("clubbing", &["club", "dance", "nightlife"]),
    ("shopping", &["shopping", "retail"]),
    ("gaming", &["gaming", "game", "video game", "board game", "card game"]),
    ("fashion", &["fashion", "style", "clothing", "accessories", "trend"]),
    ("wellness", &["wellness", "meditation", "mindfulness", "mental health", "self-improvement"]),
    ("sustainability", &["sustainability", "environment", "eco-friendly", "green living", "climate"]),
    ("photography", &["photography", "videography", "content creation", "photo", "video"]),
    ("volunteering", &["volunteer", "community", "charity", "helping"]),
    ("finance", &["finance", "investing", "stocks", "crypto", "real estate", "money"]),
    ("science", &["science", "technology", "scientific", "tech", "discovery"]),
    ("pets", &["pet", "animal", "dog", "cat", "rescue"]),
    ("fitness", &["fitness", "exercise", "workout", "yoga", "gym"]),
    ("dance", &["dance", "performing arts", "theater", "performance"]),
    ("history", &["history", "culture", "historical", "tradition"]),
    ("languages", &["language", "linguistics", "grammar", "bilingual"]),
    ("podcasts", &["podcast", "audiobook"]),
    ("cars", &["car", "motorcycle", "vehicle", "riding", "restoration"]),
    ("diy", &["diy", "craft", "handmade", "home improvement", "upcycling"]),
    ("nutrition", &["nutrition", "health", "diet", "eating", "holistic"]),
];

const TRAITS: &[(&str, &[&str])] = &[
    ("attractiveness", &["attractive", "looks", "beauty", "charming"]),
    ("intelligence", &["smart", "intelligent", "brain", "wise"]),
    ("humor", &["funny", "humor", "wit", "laugh"]),
    ("sincerity", &["sincere", "honest", "genuine", "authentic"]),
    ("ambition", &["ambitious", "driven", "goals"]),
    ("loyalty", &["loyal", "dependable", "count on", "reliable"]),
    ("curiosity", &["curious", "open-minded", "learning", "exploring", "perspective"]),
    ("supportiveness", &["supportive", "encouraging", "motivate", "helps"]),
    ("playfulness", &["playful", "humorous", "fun", "laugh", "joke"]),
    ("passion", &["passionate", "driven", "enthusiasm", "determination"]),
    ("kindness", &["kind", "compassionate", "empathy", "caring"]),
    ("trustworthiness", &["trustworthy", "keeps word", "honest", "dependable"]),
    ("independence", &["independent", "self-sufficient", "self-reliant"]),
    ("empowerment", &["empowering", "inspiring", "motivates", "lifts up"]),
    ("practicality", &["practical", "down-to-earth", "realistic"]),
    ("energy", &["energetic", "enthusiastic", "excitement", "adventure"]),
    ("thoughtfulness", &["thoughtful", "considerate", "feelings", "needs"]),
    ("assertiveness", &["assertive", "confident", "go after"]),
    ("creativity", &["creative", "innovative", "outside the box", "fresh ideas"]),
    ("spontaneity", &["spontaneous", "carefree", "moment", "chance"]),
    ("balance", &["balanced", "calm", "stability", "peace"]),
];

const PREFERENCES: &[(&str, &[&str])] = &[
    (SHARED_INTERESTS, &["shared", "common", "similar", "hobby"]),
    (RELIGION, &["religion", "faith", "belief", "spiritual"]),
    ("humor", &[]),
    ("loyalty", &["loyal", "dependable", "count on"]),
    ("curiosity", &["curious", "open-minded", "learning"]),
    ("supportiveness", &["supportive", "encouraging", "motivate"]),
    ("playfulness", &["playful", "humorous", "fun"]),
    ("passion", &["passionate", "driven", "enthusiasm"]),
    ("kindness", &["kind", "compassionate", "caring"]),
    ("trustworthiness", &["trustworthy", "honest", "dependable"]),
    ("independence", &["independent", "self-sufficient"]),
    ("empowerment", &["empowering", "inspiring", "motivates"]),
    ("practicality", &["practical", "down-to-earth"]),
    ("energy", &["energetic", "enthusiastic", "excitement"]),
    ("thoughtfulness", &["thoughtful", "considerate"]),
    ("assertiveness", &["assertive", "confident"]),
    ("creativity", &["creative", "innovative"]),
    ("spontaneity", &["spontaneous", "carefree"]),
    ("balance", &["balanced", "calm", "stability"]),
];

const MODIFIERS: &[(&str, f32)] = &[
    ("love", 1.5),
    ("obsessed", 2.0),
    ("passionate", 1.5),
    ("enjoy", 1.2),
    ("like", 1.0),
    ("sometimes", 0.8),
    ("occasional", 0.7),
    ("not", -1.0),
    ("hate", -1.5),
    ("dislike", -1.2),
];
