//! Sentence-level sentiment scoring
//!
//! [`LexiconSentiment`] is a rule-based scorer in the valence-lexicon family:
//! each known word carries a valence, boosters and negators adjust the word
//! that follows them, a contrastive "but" shifts weight to the second half of
//! the sentence, and the total is squashed into a compound score in [-1, 1].

use ahash::{AHashMap, AHashSet};
use lazy_static::lazy_static;

/// Scores one sentence; neutral or empty text scores 0.
pub trait SentimentScorer: Send + Sync {
    fn compound(&self, sentence: &str) -> f32;
}

/// Normalization constant for the compound squash `s / sqrt(s² + α)`.
const NORMALIZATION_ALPHA: f32 = 15.0;

const BOOSTER_INCREMENT: f32 = 0.293;
const NEGATION_FACTOR: f32 = -0.74;
const EXCLAMATION_INCREMENT: f32 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const LOOKBACK: usize = 3;

/// Decay applied to a booster or negator found 1, 2 or 3 tokens back.
const LOOKBACK_DECAY: [f32; LOOKBACK] = [1.0, 0.95, 0.9];

const VALENCES: &[(&str, f32)] = &[
    ("love", 3.2), ("loves", 2.7), ("loved", 2.9), ("loving", 2.9), ("lovely", 2.8),
    ("like", 1.5), ("likes", 1.8), ("liked", 1.8),
    ("enjoy", 2.2), ("enjoys", 2.2), ("enjoyed", 2.3), ("enjoying", 2.4),
    ("adore", 2.6), ("amazing", 2.8), ("awesome", 3.1), ("great", 3.1),
    ("good", 1.9), ("nice", 1.8), ("fun", 2.3), ("funny", 1.9), ("happy", 2.7),
    ("happiness", 2.6), ("excited", 1.4), ("exciting", 2.2), ("excitement", 2.2),
    ("passionate", 2.4), ("passion", 2.0), ("wonderful", 2.7), ("fantastic", 2.6),
    ("best", 3.2), ("better", 1.9), ("beautiful", 2.9), ("favorite", 2.0),
    ("favourite", 2.0), ("glad", 2.0), ("grateful", 2.0), ("hope", 1.9),
    ("kind", 2.4), ("caring", 2.2), ("honest", 2.3), ("loyal", 2.1),
    ("smart", 1.7), ("intelligent", 2.0), ("wise", 1.8), ("charming", 2.1),
    ("attractive", 1.9), ("creative", 1.9), ("inspiring", 2.2), ("supportive", 1.7),
    ("confident", 2.2), ("calm", 1.3), ("peace", 2.5), ("peaceful", 2.2),
    ("thoughtful", 1.6), ("trust", 2.3), ("trustworthy", 2.6), ("genuine", 1.9),
    ("compassionate", 2.2), ("playful", 1.9), ("laugh", 2.6), ("laughing", 2.2),
    ("smile", 1.5), ("relax", 1.9), ("relaxing", 2.2), ("free", 2.3),
    ("curious", 1.3), ("adventure", 1.3), ("adventurous", 1.4), ("joy", 2.8),
    ("thrilled", 1.9), ("obsessed", 0.5), ("interested", 1.7), ("interesting", 1.7),
    ("perfect", 2.7), ("cool", 1.3), ("care", 2.2), ("friendly", 2.2),
    ("hate", -2.7), ("hates", -1.9), ("hated", -3.2), ("hating", -2.3),
    ("dislike", -1.6), ("dislikes", -1.7), ("bad", -2.5), ("worst", -3.1),
    ("terrible", -2.1), ("awful", -2.0), ("horrible", -2.5), ("boring", -1.3),
    ("bored", -1.1), ("sad", -2.1), ("angry", -2.3), ("annoying", -1.7),
    ("annoyed", -1.6), ("tired", -1.9), ("lonely", -1.5), ("afraid", -2.0),
    ("scared", -1.9), ("stress", -1.8), ("stressful", -2.3), ("stressed", -1.4),
    ("anxious", -1.0), ("worried", -1.2), ("rude", -2.0), ("fake", -2.1),
    ("liar", -3.1), ("lying", -2.4), ("cheat", -2.0), ("cheating", -2.6),
    ("toxic", -2.4), ("drama", -1.5), ("selfish", -2.1), ("mean", -1.3),
    ("lazy", -1.4), ("arrogant", -2.2), ("jealous", -2.0), ("hurt", -2.4),
    ("pain", -2.3), ("problem", -1.7), ("wrong", -2.1), ("disappointed", -1.9),
    ("avoid", -1.2), ("never", -0.5), ("no", -1.2),
];

const BOOSTERS: &[&str] = &[
    "absolutely", "completely", "deeply", "especially", "extremely", "highly",
    "hugely", "incredibly", "really", "so", "super", "totally", "truly", "very",
    "most", "more", "totes",
];

const DAMPENERS: &[&str] = &[
    "barely", "hardly", "kinda", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat", "sort", "sometimes",
];

const NEGATORS: &[&str] = &[
    "not", "n't", "never", "no", "nothing", "nowhere", "nobody", "none",
    "neither", "nor", "without", "cannot", "dont", "doesnt", "didnt", "isnt",
    "wasnt", "wont", "cant",
];

lazy_static! {
    static ref VALENCE_TABLE: AHashMap<&'static str, f32> = VALENCES.iter().copied().collect();
    static ref BOOSTER_SET: AHashSet<&'static str> = BOOSTERS.iter().copied().collect();
    static ref DAMPENER_SET: AHashSet<&'static str> = DAMPENERS.iter().copied().collect();
    static ref NEGATOR_SET: AHashSet<&'static str> = NEGATORS.iter().copied().collect();
}

/// Valence-lexicon sentiment scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    fn words(sentence: &str) -> Vec<String> {
        let mut words = Vec::new();
        for raw in sentence.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’')) {
            let word = raw.replace('’', "'").to_lowercase();
            let word = word.trim_matches('\'');
            if word.is_empty() {
                continue;
            }
            match word.strip_suffix("n't").filter(|s| !s.is_empty()) {
                Some(stem) => {
                    words.push(stem.to_string());
                    words.push("n't".to_string());
                }
                None => words.push(word.to_string()),
            }
        }
        words
    }

    /// Valence of the word at `i`, adjusted by the words before it
    fn adjusted_valence(words: &[String], i: usize) -> Option<f32> {
        let mut valence = *VALENCE_TABLE.get(words[i].as_str())?;
        let sign = valence.signum();

        for (back, decay) in LOOKBACK_DECAY.iter().enumerate() {
            let Some(j) = i.checked_sub(back + 1) else { break };
            let prev = words[j].as_str();
            if BOOSTER_SET.contains(prev) {
                valence += sign * BOOSTER_INCREMENT * decay;
            } else if DAMPENER_SET.contains(prev) {
                valence -= sign * BOOSTER_INCREMENT * decay;
            }
        }

        let lookback_start = i.saturating_sub(LOOKBACK);
        if words[lookback_start..i]
            .iter()
            .any(|w| NEGATOR_SET.contains(w.as_str()))
        {
            valence *= NEGATION_FACTOR;
        }

        Some(valence)
    }
}

impl SentimentScorer for LexiconSentiment {
    fn compound(&self, sentence: &str) -> f32 {
        let words = Self::words(sentence);
        if words.is_empty() {
            return 0.0;
        }

        let but_at = words.iter().position(|w| w == "but");
        let mut total = 0.0f32;
        for i in 0..words.len() {
            let Some(mut valence) = Self::adjusted_valence(&words, i) else { continue };
            match but_at {
                Some(b) if i < b => valence *= 0.5,
                Some(b) if i > b => valence *= 1.5,
                _ => {}
            }
            total += valence;
        }

        if total != 0.0 {
            let exclamations = sentence.matches('!').count().min(MAX_EXCLAMATIONS);
            total += total.signum() * exclamations as f32 * EXCLAMATION_INCREMENT;
        }

        let compound = total / (total * total + NORMALIZATION_ALPHA).sqrt();
        compound.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_and_empty() {
        let scorer = LexiconSentiment;
        assert_eq!(scorer.compound(""), 0.0);
        assert_eq!(scorer.compound("the table is in the kitchen"), 0.0);
    }

    #[test]
    fn test_polarity() {
        let scorer = LexiconSentiment;
        assert!(scorer.compound("i love hiking") > 0.5);
        assert!(scorer.compound("i hate clubs") < -0.5);
    }

    #[test]
    fn test_negation_flips() {
        let scorer = LexiconSentiment;
        let plain = scorer.compound("i like movies");
        let negated = scorer.compound("i don't like movies");
        assert!(plain > 0.0);
        assert!(negated < 0.0);
    }

    #[test]
    fn test_booster_increases_magnitude() {
        let scorer = LexiconSentiment;
        assert!(scorer.compound("i really love art") > scorer.compound("i love art"));
    }

    #[test]
    fn test_exclamation_emphasis() {
        let scorer = LexiconSentiment;
        assert!(scorer.compound("great!!!") > scorer.compound("great"));
    }

    #[test]
    fn test_contrastive_but() {
        let scorer = LexiconSentiment;
        assert!(scorer.compound("the food was good but the service was awful") < 0.0);
    }

    #[test]
    fn test_bounded() {
        let scorer = LexiconSentiment;
        let text = "love love love amazing awesome best perfect wonderful!!!!!!!";
        let score = scorer.compound(text);
        assert!((-1.0..=1.0).contains(&score));
        let text = "hate hate worst awful terrible horrible!!!!";
        let score = scorer.compound(text);
        assert!((-1.0..=1.0).contains(&score));
    }
}
