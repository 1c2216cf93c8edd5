//! Language handling - tokenization and keyword normalization.
//!
//! The tokenizer produces [`Token`]s carrying both the lowercased surface
//! form of a word and its *categorized* form after synonym folding. Index
//! stores and index lookups must run through the same normalization, so the
//! tokenizer is shared between ingestion and retrieval.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// A single token produced from written input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Lowercased surface form as it appeared in the input.
    pub original: String,

    /// Normalized form after synonym folding; used as an index key.
    pub categorized: String,
}

impl Token {
    /// Create a token from its surface and categorized forms.
    pub fn new(original: impl Into<String>, categorized: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            categorized: categorized.into(),
        }
    }

    /// Check whether normalization changed the surface form.
    pub fn is_categorized(&self) -> bool {
        self.original != self.categorized
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.categorized)
    }
}

/// Tokenizer with learnable synonym and filler tables.
///
/// Tables are behind `RwLock`s so one shared tokenizer can be taught during
/// a knowledge reload while queries tokenize concurrently.
#[derive(Debug, Default)]
pub struct Tokenizer {
    /// Variant form -> category form.
    synonyms: RwLock<HashMap<String, String>>,

    /// Words carrying no meaning for retrieval, skipped in sentences.
    fillers: RwLock<HashSet<String>>,
}

impl Tokenizer {
    /// Create a tokenizer with empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn synonym groups: each variant folds into its category form.
    pub fn learn_synonyms(&self, categories: &HashMap<String, Vec<String>>) {
        let mut synonyms = self.synonyms.write().expect("synonyms lock");
        for (category, variants) in categories {
            let category = category.trim().to_lowercase();
            for variant in variants {
                synonyms.insert(variant.trim().to_lowercase(), category.clone());
            }
        }
    }

    /// Learn filler words to be skipped during sentence tokenization.
    pub fn learn_fillers<S: AsRef<str>>(&self, fillers: &[S]) {
        let mut table = self.fillers.write().expect("fillers lock");
        for filler in fillers {
            table.insert(filler.as_ref().trim().to_lowercase());
        }
    }

    /// Tokenize a sentence into an ordered sequence of tokens.
    ///
    /// Words are split on non-alphanumeric boundaries and lowercased;
    /// fillers are dropped.
    pub fn tokenize_sentence(&self, sentence: &str) -> Vec<Token> {
        let fillers = self.fillers.read().expect("fillers lock");
        sentence
            .split(|c: char| !c.is_alphanumeric())
            .filter(|term| !term.is_empty())
            .map(|term| term.to_lowercase())
            .filter(|term| !fillers.contains(term))
            .map(|term| {
                let categorized = self.categorize(&term);
                Token::new(term, categorized)
            })
            .collect()
    }

    /// Tokenize a single term, e.g. a declared trigger key.
    ///
    /// The term is kept whole so reserved keys like `*` survive.
    pub fn tokenize_term(&self, term: &str) -> Token {
        let original = term.trim().to_lowercase();
        let categorized = self.categorize(&original);
        Token::new(original, categorized)
    }

    fn categorize(&self, term: &str) -> String {
        self.synonyms
            .read()
            .expect("synonyms lock")
            .get(term)
            .cloned()
            .unwrap_or_else(|| term.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_sentence() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize_sentence("Hello, World!");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].original, "hello");
        assert_eq!(tokens[1].original, "world");
    }

    #[test]
    fn test_fillers_are_skipped() {
        let tokenizer = Tokenizer::new();
        tokenizer.learn_fillers(&["the", "a"]);

        let tokens = tokenizer.tokenize_sentence("the cat sat on a mat");
        let originals: Vec<_> = tokens.iter().map(|t| t.original.as_str()).collect();

        assert_eq!(originals, vec!["cat", "sat", "on", "mat"]);
    }

    #[test]
    fn test_synonyms_fold_into_category() {
        let tokenizer = Tokenizer::new();
        let mut categories = HashMap::new();
        categories.insert("greeting".to_string(), vec!["hi".to_string(), "hello".to_string()]);
        tokenizer.learn_synonyms(&categories);

        let tokens = tokenizer.tokenize_sentence("hello friend");
        assert_eq!(tokens[0].original, "hello");
        assert_eq!(tokens[0].categorized, "greeting");
        assert!(tokens[0].is_categorized());
        assert!(!tokens[1].is_categorized());
    }

    #[test]
    fn test_tokenize_term_keeps_reserved_keys() {
        let tokenizer = Tokenizer::new();
        let token = tokenizer.tokenize_term("*");

        assert_eq!(token.original, "*");
        assert_eq!(token.categorized, "*");
    }

    #[test]
    fn test_term_and_sentence_normalize_identically() {
        let tokenizer = Tokenizer::new();
        let mut categories = HashMap::new();
        categories.insert("farewell".to_string(), vec!["bye".to_string()]);
        tokenizer.learn_synonyms(&categories);

        let term = tokenizer.tokenize_term("Bye");
        let sentence = tokenizer.tokenize_sentence("bye now");

        assert_eq!(term.categorized, sentence[0].categorized);
    }
}
