//! Idea ranking - retrieval and deterministic ordering of candidate rules.
//!
//! Ranking is the creative step of the system: matching a query against
//! problem-solving knowledge. It works as follows:
//! 1. **Tokenize**: split the query into an ordered token sequence
//! 2. **Retrieve**: fetch the bucket for each token's categorized form
//!    (and its original form when they differ), then the catch-all bucket
//! 3. **Order**: sort on the composite key `(score descending, encounter
//!    sequence)` so ties resolve by token order, catch-all last
//! 4. **Filter**: drop structurally malformed rules and candidates whose
//!    phrases reject the query
//! 5. **Accept**: collect in order until the requested count

use std::cmp::Reverse;
use std::sync::Arc;

use dialog_rules::{Argument, Rule, Token};

use crate::knowledge_base::KnowledgeBase;

/// A candidate rule paired with the token that retrieved it.
///
/// Transient: an idea lives for one ranking call. Catch-all ideas carry no
/// token.
#[derive(Debug, Clone)]
pub struct Idea {
    rule: Arc<Rule>,
    token: Option<Token>,
}

impl Idea {
    fn new(rule: Arc<Rule>, token: Option<Token>) -> Self {
        Self { rule, token }
    }

    /// The candidate rule.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The token that retrieved the rule, if any.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }
}

/// Retrieves and ranks candidate rules against a shared knowledge base.
pub struct IdeaRanker {
    base: Arc<KnowledgeBase>,
}

impl IdeaRanker {
    /// Create a ranker reading the given knowledge base.
    pub fn new(base: Arc<KnowledgeBase>) -> Self {
        Self { base }
    }

    /// Rank candidate ideas for a query, best first.
    ///
    /// `previous` is the client's conversational context. It is part of the
    /// ranking contract, but retrieval currently relies on the query tokens
    /// alone; only the later consideration step reads context. At most
    /// `maxcount` accepted ideas are returned; an empty result is a normal
    /// outcome, not an error.
    pub fn rank(&self, query: &str, _previous: &Argument, maxcount: usize) -> Vec<Idea> {
        let mut ideas = Vec::new();

        // encounter order: token order first, catch-all last
        for token in self.base.tokenizer().tokenize_sentence(query) {
            let mut bucket = self.base.bucket(&token.categorized);
            if token.is_categorized() {
                // union by rule identity with the surface-form bucket
                bucket.extend(self.base.bucket(&token.original));
            }
            for rule in bucket.into_values() {
                ideas.push(Idea::new(rule, Some(token.clone())));
            }
        }
        for rule in self.base.catchall_bucket().into_values() {
            ideas.push(Idea::new(rule, None));
        }

        // composite sort key instead of an arithmetic orderkey encoding:
        // no overflow, no collisions, ties keep encounter order
        let mut sequenced: Vec<(usize, Idea)> = ideas.into_iter().enumerate().collect();
        sequenced.sort_by_key(|(sequence, idea)| (Reverse(idea.rule().score()), *sequence));

        let mut accepted = Vec::with_capacity(maxcount.min(10));
        for (_, idea) in sequenced {
            let rule = idea.rule();
            // defensive filtering of malformed rules
            let Some(action) = rule.actions().first() else {
                continue;
            };
            let Some(phrase) = action.phrases.first() else {
                continue;
            };
            if phrase.is_empty() {
                continue;
            }
            if rule.matcher(query).is_empty() {
                continue;
            }
            accepted.push(idea);
            if accepted.len() >= maxcount {
                break;
            }
        }
        accepted
    }
}
