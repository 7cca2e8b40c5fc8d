//! Feature schema and feature table
//!
//! The schema fixes the column universe up front from the lexicon keys, so
//! every table built from the same lexicons has the same columns no matter
//! which users mention which categories.

use brewmatch_core::{FeatureRecord, FeatureVector, LexiconSet, PreferenceFlag, MAX_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const INTEREST_PREFIX: &str = "interest_";
pub const TRAIT_PREFIX: &str = "trait_";
pub const PREFERENCE_PREFIX: &str = "pref_";

/// Fixed column universe of a feature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    interests: Vec<String>,
    traits: Vec<String>,
    preferences: Vec<String>,
    /// (trait index, preference index) for every trait that is also a preference
    trait_preferences: Vec<(usize, usize)>,
}

impl FeatureSchema {
    pub fn new(interests: Vec<String>, traits: Vec<String>, preferences: Vec<String>) -> Self {
        let trait_preferences = traits
            .iter()
            .enumerate()
            .filter_map(|(t, name)| {
                preferences.iter().position(|p| p == name).map(|p| (t, p))
            })
            .collect();

        Self {
            interests,
            traits,
            preferences,
            trait_preferences,
        }
    }

    pub fn from_lexicons(lexicons: &LexiconSet) -> Self {
        let names = |lexicon: &brewmatch_core::Lexicon| {
            lexicon.names().map(str::to_string).collect::<Vec<_>>()
        };
        Self::new(
            names(&lexicons.interests),
            names(&lexicons.traits),
            names(&lexicons.preferences),
        )
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    pub fn preferences(&self) -> &[String] {
        &self.preferences
    }

    /// Width of the numeric (interest ++ trait) vector
    pub fn numeric_width(&self) -> usize {
        self.interests.len() + self.traits.len()
    }

    pub fn interest_index(&self, name: &str) -> Option<usize> {
        self.interests.iter().position(|c| c == name)
    }

    pub fn trait_index(&self, name: &str) -> Option<usize> {
        self.traits.iter().position(|c| c == name)
    }

    pub fn preference_index(&self, name: &str) -> Option<usize> {
        self.preferences.iter().position(|c| c == name)
    }

    /// Does the schema carry both `pref_<name>` and `trait_<name>`?
    pub fn has_trait_preference(&self, name: &str) -> bool {
        self.trait_index(name)
            .is_some_and(|t| self.trait_preferences.iter().any(|&(tp, _)| tp == t))
    }

    /// Every (trait index, preference index) pair with both columns present
    pub fn trait_preferences(&self) -> &[(usize, usize)] {
        &self.trait_preferences
    }

    /// Column names in table order, without the leading `uid`
    pub fn column_names(&self) -> Vec<String> {
        let interests = self.interests.iter().map(|c| format!("{INTEREST_PREFIX}{c}"));
        let traits = self.traits.iter().map(|c| format!("{TRAIT_PREFIX}{c}"));
        let preferences = self.preferences.iter().map(|c| format!("{PREFERENCE_PREFIX}{c}"));
        interests.chain(traits).chain(preferences).collect()
    }
}

/// One user's features expanded into the schema's fixed columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub uid: String,
    pub interests: Vec<u8>,
    pub traits: Vec<u8>,
    pub preferences: Vec<Option<PreferenceFlag>>,
}

impl FeatureRow {
    /// Expand a record; missing scores fill to 0 and every score is capped at 10
    pub fn expand(schema: &FeatureSchema, record: &FeatureRecord) -> Self {
        let score = |map: &brewmatch_core::ScoreMap, name: &String| {
            map.get(name).copied().unwrap_or(0).min(MAX_SCORE)
        };

        Self {
            uid: record.uid.clone(),
            interests: schema.interests.iter().map(|c| score(&record.interests, c)).collect(),
            traits: schema.traits.iter().map(|c| score(&record.traits, c)).collect(),
            preferences: schema
                .preferences
                .iter()
                .map(|p| record.preference(p))
                .collect(),
        }
    }

    /// Interest scores followed by trait scores
    pub fn numeric_vector(&self) -> FeatureVector {
        let scores: Vec<u8> = self.interests.iter().chain(&self.traits).copied().collect();
        FeatureVector::from_scores(&scores)
    }

    #[inline]
    pub fn preference(&self, index: usize) -> Option<PreferenceFlag> {
        self.preferences.get(index).copied().flatten()
    }

    #[inline]
    pub fn trait_score(&self, index: usize) -> u8 {
        self.traits.get(index).copied().unwrap_or(0)
    }
}

/// The joined population: one row per uid, in population order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    schema: FeatureSchema,
    rows: Vec<FeatureRow>,
    index: HashMap<String, usize>,
}

impl FeatureTable {
    /// Expand records into rows; a repeated uid keeps its first record
    pub fn from_records<I>(schema: FeatureSchema, records: I) -> Self
    where
        I: IntoIterator<Item = FeatureRecord>,
    {
        let rows: Vec<FeatureRow> = records
            .into_iter()
            .map(|record| FeatureRow::expand(&schema, &record))
            .collect();
        Self::from_rows(schema, rows)
    }

    pub fn from_rows<I>(schema: FeatureSchema, rows: I) -> Self
    where
        I: IntoIterator<Item = FeatureRow>,
    {
        let mut table = Self {
            schema,
            rows: Vec::new(),
            index: HashMap::new(),
        };
        for row in rows {
            if table.index.contains_key(&row.uid) {
                debug!(uid = %row.uid, "duplicate row dropped, keeping first");
                continue;
            }
            table.index.insert(row.uid.clone(), table.rows.len());
            table.rows.push(row);
        }
        table
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&FeatureRow> {
        self.rows.get(index)
    }

    pub fn index_of(&self, uid: &str) -> Option<usize> {
        self.index.get(uid).copied()
    }

    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.uid.as_str())
    }
}
