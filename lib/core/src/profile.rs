use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Upper bound of every interest and trait score.
pub const MAX_SCORE: u8 = 10;

/// One raw input row: a user identifier and an optional free-text field
///
/// A missing or unreadable field is `None` and extracts to empty features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfile {
    pub uid: String,
    pub text: Option<String>,
}

impl RawProfile {
    pub fn new(uid: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            text: Some(text.into()),
        }
    }

    pub fn missing(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            text: None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// A set preference flag; an unset preference is `None` at the use site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferenceFlag {
    Yes,
    Religious,
}

impl PreferenceFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceFlag::Yes => "Yes",
            PreferenceFlag::Religious => "Religious",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Yes" => Some(PreferenceFlag::Yes),
            "Religious" => Some(PreferenceFlag::Religious),
            _ => None,
        }
    }
}

impl fmt::Display for PreferenceFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category scores; a category with no evidence is absent, not zero.
pub type ScoreMap = BTreeMap<String, u8>;

/// Every preference category, set or unset.
pub type PreferenceMap = BTreeMap<String, Option<PreferenceFlag>>;

/// Extracted features for one user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub uid: String,
    pub interests: ScoreMap,
    pub traits: ScoreMap,
    pub preferences: PreferenceMap,
}

impl FeatureRecord {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }

    pub fn with_interest(mut self, category: &str, score: u8) -> Self {
        self.interests.insert(category.to_string(), score.min(MAX_SCORE));
        self
    }

    pub fn with_trait(mut self, name: &str, score: u8) -> Self {
        self.traits.insert(name.to_string(), score.min(MAX_SCORE));
        self
    }

    pub fn with_preference(mut self, name: &str, flag: Option<PreferenceFlag>) -> Self {
        self.preferences.insert(name.to_string(), flag);
        self
    }

    pub fn preference(&self, name: &str) -> Option<PreferenceFlag> {
        self.preferences.get(name).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_parse() {
        assert_eq!(PreferenceFlag::parse("Yes"), Some(PreferenceFlag::Yes));
        assert_eq!(PreferenceFlag::parse(" Religious "), Some(PreferenceFlag::Religious));
        assert_eq!(PreferenceFlag::parse(""), None);
        assert_eq!(PreferenceFlag::parse("no"), None);
    }

    #[test]
    fn test_builder_caps_scores() {
        let record = FeatureRecord::new("u1")
            .with_interest("music", 14)
            .with_trait("humor", 9)
            .with_preference("religion", Some(PreferenceFlag::Religious));
        assert_eq!(record.interests["music"], MAX_SCORE);
        assert_eq!(record.traits["humor"], 9);
        assert_eq!(record.preference("religion"), Some(PreferenceFlag::Religious));
        assert_eq!(record.preference("humor"), None);
    }
}
