//! Interaction records, client identities, and conversation logs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::SystemTime;
use uuid::Uuid;

use crate::argument::{Argument, Thought};

/// Unique identifier for interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionId(pub Uuid);

impl InteractionId {
    /// Create a new random interaction ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InteractionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InteractionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of client identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityKind {
    /// Identified by the connecting host.
    Host,
    /// Identified by a verified email address.
    Email,
    /// No identification; shares one anonymous log.
    Anonymous,
}

impl IdentityKind {
    /// String form used inside client keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityKind::Host => "host",
            IdentityKind::Email => "email",
            IdentityKind::Anonymous => "anonymous",
        }
    }
}

/// A resolved client identity; its key partitions conversation logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub kind: IdentityKind,
    pub name: String,
}

impl ClientIdentity {
    /// Create an identity from its kind and name.
    pub fn new(kind: IdentityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Create a host identity.
    pub fn host(name: impl Into<String>) -> Self {
        Self::new(IdentityKind::Host, name)
    }

    /// Create an email identity.
    pub fn email(name: impl Into<String>) -> Self {
        Self::new(IdentityKind::Email, name)
    }

    /// The log partition key for this identity.
    pub fn client_key(&self) -> String {
        format!("{}_{}", self.kind.as_str(), self.name)
    }
}

/// One complete query/response record for a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,

    /// Partition key of the client that asked.
    pub client: String,

    pub query: String,

    /// Number of answers that were requested.
    pub count: usize,

    /// Rendered response expressions, best first.
    pub expressions: Vec<String>,

    /// The arguments behind each expression, best first.
    pub arguments: Vec<Argument>,

    pub timestamp: SystemTime,
}

impl Interaction {
    /// Record a completed reaction.
    pub fn new(
        client: impl Into<String>,
        query: impl Into<String>,
        count: usize,
        expressions: Vec<String>,
        arguments: Vec<Argument>,
    ) -> Self {
        Self {
            id: InteractionId::new(),
            client: client.into(),
            query: query.into(),
            count,
            expressions,
            arguments,
            timestamp: SystemTime::now(),
        }
    }

    /// Re-bind this interaction as a context thought for later turns.
    pub fn recall(&self) -> Thought {
        let mut thought = Thought::new();
        thought.bind("query", self.query.trim().to_lowercase());
        if let Some(answer) = self.expressions.first() {
            thought.bind("answer", answer.clone());
        }
        thought
    }
}

/// External contract of the conversation log.
pub trait InteractionLog: Send + Sync {
    /// All interactions for a client, most recent first.
    fn interactions(&self, client: &str) -> Vec<Interaction>;

    /// Append an interaction to a client's log.
    fn add_interaction(&self, client: &str, interaction: Interaction);
}

/// In-memory log keeping the most recent rounds per client.
#[derive(Debug)]
pub struct MemoryLog {
    limit: usize,
    entries: RwLock<HashMap<String, Vec<Interaction>>>,
}

impl MemoryLog {
    /// Create a log with the default retention of three rounds.
    pub fn new() -> Self {
        Self::with_limit(3)
    }

    /// Create a log keeping the most recent `limit` interactions per client.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionLog for MemoryLog {
    fn interactions(&self, client: &str) -> Vec<Interaction> {
        self.entries
            .read()
            .expect("log lock")
            .get(client)
            .map(|log| log.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    fn add_interaction(&self, client: &str, interaction: Interaction) {
        let mut entries = self.entries.write().expect("log lock");
        let log = entries.entry(client.to_string()).or_default();
        log.push(interaction);
        while log.len() > self.limit {
            log.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(client: &str, query: &str, answer: &str) -> Interaction {
        Interaction::new(client, query, 1, vec![answer.to_string()], Vec::new())
    }

    #[test]
    fn test_client_key() {
        let identity = ClientIdentity::host("localhost");
        assert_eq!(identity.client_key(), "host_localhost");

        let identity = ClientIdentity::email("ada@example.org");
        assert_eq!(identity.client_key(), "email_ada@example.org");
    }

    #[test]
    fn test_recall_binds_query_and_answer() {
        let thought = interaction("host_x", "Hello there", "Hi!").recall();
        assert_eq!(thought.get("query"), Some("hello there"));
        assert_eq!(thought.get("answer"), Some("Hi!"));
    }

    #[test]
    fn test_log_returns_most_recent_first() {
        let log = MemoryLog::new();
        log.add_interaction("c", interaction("c", "first", "a1"));
        log.add_interaction("c", interaction("c", "second", "a2"));

        let history = log.interactions("c");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].query, "second");
        assert_eq!(history[1].query, "first");
    }

    #[test]
    fn test_log_respects_retention_limit() {
        let log = MemoryLog::with_limit(2);
        for round in 0..5 {
            log.add_interaction("c", interaction("c", &format!("q{round}"), "a"));
        }

        let history = log.interactions("c");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].query, "q4");
        assert_eq!(history[1].query, "q3");
    }

    #[test]
    fn test_log_partitions_by_client() {
        let log = MemoryLog::new();
        log.add_interaction("host_a", interaction("host_a", "from a", "x"));

        assert_eq!(log.interactions("host_a").len(), 1);
        assert!(log.interactions("host_b").is_empty());
    }
}
