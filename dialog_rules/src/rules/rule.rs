//! Rule definitions - knowledge units mapping triggers to actions.

use serde::{Deserialize, Serialize};

use crate::argument::{Argument, Thought};
use crate::language::Token;

use super::{Action, Phrase, PhraseMatch, RuleError};

/// Reserved trigger key matched independent of query tokens.
pub const CATCHALL_KEY: &str = "*";

/// Unique identifier for rules, stable across reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub u64);

impl RuleId {
    /// Derive the stable identity of a rule from its trigger surface.
    ///
    /// Keys and phrases identify a rule; score and actions are its payload
    /// and may be patched in place by re-learning. FNV-1a keeps the hash
    /// stable across processes, unlike the default hasher.
    pub fn derive(keys: &[String], phrases: &[String]) -> Self {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        fn eat(mut hash: u64, bytes: &[u8]) -> u64 {
            for byte in bytes {
                hash ^= u64::from(*byte);
                hash = hash.wrapping_mul(PRIME);
            }
            hash
        }

        let mut hash = OFFSET;
        for key in keys {
            hash = eat(hash, key.as_bytes());
            hash = eat(hash, &[0xff]);
        }
        hash = eat(hash, &[0xfe]);
        for phrase in phrases {
            hash = eat(hash, phrase.as_bytes());
            hash = eat(hash, &[0xff]);
        }
        Self(hash)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Declarative form of a rule as found in knowledge documents.
///
/// All sections are optional: a rule without keys is a catch-all rule, a
/// rule without a score ranks at zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default)]
    pub keys: Vec<String>,

    #[serde(default)]
    pub score: i64,

    /// Trigger patterns in the wildcard phrase language.
    #[serde(default)]
    pub phrases: Vec<String>,

    #[serde(default)]
    pub actions: Vec<Action>,
}

/// A compiled conversation rule.
#[derive(Debug, Clone)]
pub struct Rule {
    id: RuleId,
    keys: Vec<String>,
    score: i64,
    phrases: Vec<Phrase>,
    actions: Vec<Action>,
}

impl Rule {
    /// Compile a declarative rule specification.
    ///
    /// An empty key set declares a catch-all rule.
    pub fn compile(spec: RuleSpec) -> Result<Self, RuleError> {
        let RuleSpec {
            keys,
            score,
            phrases,
            actions,
        } = spec;

        let keys = if keys.is_empty() {
            vec![CATCHALL_KEY.to_string()]
        } else {
            keys
        };
        let id = RuleId::derive(&keys, &phrases);
        let phrases = phrases
            .iter()
            .map(|phrase| Phrase::compile(phrase))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id,
            keys,
            score,
            phrases,
            actions,
        })
    }

    /// The stable identifier of this rule.
    pub fn id(&self) -> RuleId {
        self.id
    }

    /// Declared trigger keys, catch-all included.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Ranking score; higher ranks earlier.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Compiled trigger phrases.
    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    /// Ordered actions produced when the rule fires.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Syntactic match test: every phrase whose pattern accepts the query.
    pub fn matcher(&self, query: &str) -> Vec<PhraseMatch> {
        self.phrases
            .iter()
            .filter_map(|phrase| phrase.matches(query))
            .collect()
    }

    /// Contextual consideration of the rule for a query.
    ///
    /// A syntactic match is required but not sufficient: the wildcard
    /// captures and the query are bound into a fresh argument on top of the
    /// recalled context, and the first action must render a non-empty
    /// expression against those bindings. Declining (`None`) is ordinary
    /// control flow at evaluation time.
    pub fn consider(
        &self,
        query: &str,
        recall: &Argument,
        token: Option<&Token>,
    ) -> Option<Argument> {
        let found = self.matcher(query).into_iter().next()?;

        let mut argument = Argument::new();
        argument.merge(recall);

        let mut thought = Thought::new();
        for (position, capture) in found.captures.iter().enumerate() {
            thought.bind((position + 1).to_string(), capture.clone());
        }
        thought.bind("query", query.trim().to_lowercase());
        if let Some(token) = token {
            thought.bind("token", token.categorized.clone());
        }
        argument.think(thought);

        self.actions.first()?.apply(&argument)?;
        for action in &self.actions {
            argument.add_action(action.clone());
        }
        Some(argument)
    }
}
