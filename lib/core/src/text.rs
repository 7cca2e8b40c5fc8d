//! Sentence segmentation, tokenization and syntactic dependents
//!
//! The extractor only needs three things from a parser: sentences, the tokens
//! of each sentence, and for every token the tokens it governs. Any parser
//! that can answer "which tokens does this token govern" can stand behind
//! [`SyntaxParser`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A token and the in-sentence indices of the tokens it governs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub children: SmallVec<[usize; 4]>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// Iterate over the dependents of the token at `index`
    pub fn children_of(&self, index: usize) -> impl Iterator<Item = &Token> + '_ {
        self.tokens
            .get(index)
            .into_iter()
            .flat_map(move |t| t.children.iter().filter_map(move |&c| self.tokens.get(c)))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub sentences: Vec<Sentence>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Segments text into sentences of tokens with dependency links
///
/// Implementations must be deterministic: identical input yields an
/// identical [`Document`].
pub trait SyntaxParser: Send + Sync {
    fn parse(&self, text: &str) -> Document;
}

/// Maximum number of preceding tokens a head can govern.
const GOVERNING_WINDOW: usize = 3;

const CLAUSE_CONJUNCTIONS: &[&str] = &["and", "but", "or"];

/// Lightweight rule-based parser
///
/// Sentences end at runs of `.`, `!`, `?` or at line breaks. A token is a
/// maximal run of alphanumerics, apostrophes and inner hyphens, so
/// `open-minded` stays whole; the contraction `n't` is split off its verb.
/// Each token governs up to three immediately preceding tokens of its clause;
/// commas, semicolons, colons and the conjunctions `and`/`but`/`or` close a
/// clause.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedParser;

impl RuleBasedParser {
    pub fn new() -> Self {
        Self
    }

    fn split_sentences(text: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            let is_terminal = matches!(c, '.' | '!' | '?');
            if is_terminal || c == '\n' || c == '\r' {
                // Absorb the whole run of terminators ("?!", "...")
                let mut end = i + c.len_utf8();
                while let Some(&(j, next)) = chars.peek() {
                    if matches!(next, '.' | '!' | '?') {
                        end = j + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let sentence = text[start..end].trim();
                if has_word(sentence) {
                    sentences.push(sentence);
                }
                start = end;
            }
        }

        let tail = text[start..].trim();
        if has_word(tail) {
            sentences.push(tail);
        }
        sentences
    }

    /// Split a sentence into word tokens, recording clause boundaries
    fn tokenize(sentence: &str) -> Vec<(String, usize)> {
        let mut tokens = Vec::new();
        let mut clause = 0usize;
        let mut current = String::new();

        let flush = |current: &mut String, clause: usize, tokens: &mut Vec<(String, usize)>| {
            let word = current.trim_matches(|c: char| c == '-' || c == '\'');
            if !word.is_empty() {
                if let Some(stem) = word.strip_suffix("n't").filter(|s| !s.is_empty()) {
                    tokens.push((stem.to_string(), clause));
                    tokens.push(("n't".to_string(), clause));
                } else {
                    tokens.push((word.to_string(), clause));
                }
            }
            current.clear();
        };

        for c in sentence.chars() {
            if c.is_alphanumeric() || c == '\'' || c == '-' || c == '’' {
                current.push(if c == '’' { '\'' } else { c });
                continue;
            }
            flush(&mut current, clause, &mut tokens);
            if matches!(c, ',' | ';' | ':') {
                clause += 1;
            }
        }
        flush(&mut current, clause, &mut tokens);

        // Conjunctions start a new clause; they belong to neither side.
        let mut shift = 0usize;
        tokens
            .into_iter()
            .map(|(word, clause)| {
                if CLAUSE_CONJUNCTIONS.contains(&word.as_str()) {
                    shift += 1;
                    (word, usize::MAX)
                } else {
                    let clause = clause + shift;
                    (word, clause)
                }
            })
            .collect()
    }
}

fn has_word(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

impl SyntaxParser for RuleBasedParser {
    fn parse(&self, text: &str) -> Document {
        let sentences = Self::split_sentences(text)
            .into_iter()
            .map(|raw| {
                let words = Self::tokenize(raw);
                let tokens = words
                    .iter()
                    .enumerate()
                    .map(|(i, (word, clause))| {
                        let mut children = SmallVec::new();
                        if *clause != usize::MAX {
                            for j in (i.saturating_sub(GOVERNING_WINDOW)..i).rev() {
                                if words[j].1 != *clause {
                                    break;
                                }
                                children.push(j);
                            }
                        }
                        Token { text: word.clone(), children }
                    })
                    .collect();
                Sentence { text: raw.to_string(), tokens }
            })
            .collect();

        Document { sentences }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sentence: &Sentence) -> Vec<&str> {
        sentence.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_sentence_segmentation() {
        let doc = RuleBasedParser.parse("i love hiking. do you?! maybe\nnew line");
        let sentences: Vec<&str> = doc.sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(sentences, vec!["i love hiking.", "do you?!", "maybe", "new line"]);
    }

    #[test]
    fn test_empty_text_has_no_sentences() {
        assert!(RuleBasedParser.parse("").is_empty());
        assert!(RuleBasedParser.parse("  ... !!").is_empty());
    }

    #[test]
    fn test_hyphenated_words_stay_whole() {
        let doc = RuleBasedParser.parse("very open-minded person");
        assert_eq!(texts(&doc.sentences[0]), vec!["very", "open-minded", "person"]);
    }

    #[test]
    fn test_contraction_split() {
        let doc = RuleBasedParser.parse("i don't dance");
        assert_eq!(texts(&doc.sentences[0]), vec!["i", "do", "n't", "dance"]);
    }

    #[test]
    fn test_children_window() {
        let doc = RuleBasedParser.parse("i really love long hikes");
        let sentence = &doc.sentences[0];
        let children: Vec<&str> = sentence.children_of(4).map(|t| t.text.as_str()).collect();
        assert_eq!(children, vec!["long", "love", "really"]);
    }

    #[test]
    fn test_clause_boundaries_stop_children() {
        let doc = RuleBasedParser.parse("i hate gyms, love yoga and hate running");
        let sentence = &doc.sentences[0];
        let yoga = sentence.tokens.iter().position(|t| t.text == "yoga").unwrap();
        let children: Vec<&str> = sentence.children_of(yoga).map(|t| t.text.as_str()).collect();
        assert_eq!(children, vec!["love"]);

        let running = sentence.tokens.iter().position(|t| t.text == "running").unwrap();
        let children: Vec<&str> = sentence.children_of(running).map(|t| t.text.as_str()).collect();
        assert_eq!(children, vec!["hate"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "obsessed with board games! not into clubs, sometimes dance.";
        assert_eq!(RuleBasedParser.parse(text), RuleBasedParser.parse(text));
    }
}
