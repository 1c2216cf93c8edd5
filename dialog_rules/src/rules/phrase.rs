//! Phrase patterns - the syntactic trigger language of a rule.

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling rule specifications.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A phrase pattern could not be compiled to a matcher.
    #[error("invalid phrase pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A successful match of a phrase against a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseMatch {
    /// Text captured by each `*` wildcard, in pattern order.
    pub captures: Vec<String>,
}

/// A single trigger pattern of a rule.
///
/// The pattern language is plain text with `*` wildcards. A pattern matches
/// the whole query, case-insensitively; each wildcard captures the span of
/// text it consumed.
#[derive(Debug, Clone)]
pub struct Phrase {
    expression: String,
    matcher: Regex,
}

impl Phrase {
    /// Compile a pattern expression into a matcher.
    pub fn compile(expression: &str) -> Result<Self, RuleError> {
        let normalized = expression.trim().to_lowercase();
        let pattern = format!(
            "^{}$",
            normalized
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join("(.*)")
        );
        let matcher = Regex::new(&pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: expression.to_string(),
            source,
        })?;
        Ok(Self {
            expression: normalized,
            matcher,
        })
    }

    /// The normalized pattern expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Check whether the pattern is empty.
    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }

    /// Match the pattern against a query, returning wildcard captures.
    pub fn matches(&self, query: &str) -> Option<PhraseMatch> {
        let query = query.trim().to_lowercase();
        self.matcher.captures(&query).map(|captures| PhraseMatch {
            captures: captures
                .iter()
                .skip(1)
                .flatten()
                .map(|group| group.as_str().trim().to_string())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_phrase() {
        let phrase = Phrase::compile("hello").unwrap();

        assert!(phrase.matches("hello").is_some());
        assert!(phrase.matches("Hello ").is_some());
        assert!(phrase.matches("hello there").is_none());
    }

    #[test]
    fn test_wildcard_captures() {
        let phrase = Phrase::compile("I feel *").unwrap();

        let found = phrase.matches("I feel funny").unwrap();
        assert_eq!(found.captures, vec!["funny"]);

        assert!(phrase.matches("you feel funny").is_none());
    }

    #[test]
    fn test_catchall_phrase_matches_anything() {
        let phrase = Phrase::compile("*").unwrap();

        assert!(phrase.matches("literally anything").is_some());
        assert!(phrase.matches("").is_some());
    }

    #[test]
    fn test_infix_wildcard() {
        let phrase = Phrase::compile("* hello *").unwrap();

        let found = phrase.matches("well hello there friend").unwrap();
        assert_eq!(found.captures, vec!["well", "there friend"]);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let phrase = Phrase::compile("what is 2+2?").unwrap();

        assert!(phrase.matches("what is 2+2?").is_some());
        assert!(phrase.matches("what is 222?").is_none());
    }
}
