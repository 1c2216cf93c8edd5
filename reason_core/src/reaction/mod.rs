//! Reaction engine - threads conversation context into ranked responses.

use std::sync::Arc;

use dialog_rules::{Argument, ClientIdentity, Interaction, InteractionLog, MemoryLog};

use crate::knowledge_base::KnowledgeBase;
use crate::ranker::IdeaRanker;
use crate::ReasonError;

/// Configuration for the reaction engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Internal ranking cap, materially larger than any per-call maxcount
    /// so consideration has a rich candidate pool to fall through.
    pub candidate_pool: usize,

    /// Client key used by the single-answer entry point.
    pub default_client: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            candidate_pool: 100,
            default_client: "host_localhost".to_string(),
        }
    }
}

/// Produces responses by considering ranked ideas under conversational
/// context, and records completed interactions.
pub struct ReactionEngine {
    ranker: IdeaRanker,
    log: Arc<dyn InteractionLog>,
    config: EngineConfig,
}

impl ReactionEngine {
    /// Create an engine over a knowledge base with an in-memory log.
    pub fn new(base: Arc<KnowledgeBase>) -> Self {
        Self::with_config(base, Arc::new(MemoryLog::new()), EngineConfig::default())
    }

    /// Create an engine with an explicit log collaborator and configuration.
    pub fn with_config(
        base: Arc<KnowledgeBase>,
        log: Arc<dyn InteractionLog>,
        config: EngineConfig,
    ) -> Self {
        Self {
            ranker: IdeaRanker::new(base),
            log,
            config,
        }
    }

    /// The conversation log collaborator.
    pub fn log(&self) -> &dyn InteractionLog {
        self.log.as_ref()
    }

    /// React to a query under a client's conversational context.
    ///
    /// The client's prior interactions are replayed oldest first into a
    /// fresh argument, candidates are considered in rank order, and
    /// successful considerations are collected until `maxcount` or the
    /// pool is exhausted. A declined consideration is ordinary control
    /// flow, not a failure; so is an empty result.
    pub fn react(&self, query: &str, maxcount: usize, client: &str) -> Vec<Argument> {
        let previous = self.log.interactions(client);
        let mut recall = Argument::new();
        for interaction in previous.iter().rev() {
            recall.think(interaction.recall());
        }

        let ideas = self.ranker.rank(query, &recall, self.config.candidate_pool);
        tracing::debug!(client, candidates = ideas.len(), "considering ranked ideas");

        let mut answers = Vec::new();
        for idea in &ideas {
            if let Some(argument) = idea.rule().consider(query, &recall, idea.token()) {
                answers.push(argument);
                if answers.len() >= maxcount {
                    break;
                }
            }
        }
        answers
    }

    /// Single best response for the default client.
    ///
    /// This convenience entry point requires a response to exist: absence
    /// of any argument is a precondition violation answered with
    /// [`ReasonError::NoReaction`] rather than a silent fallback. Callers
    /// that can live with empty results should use [`ReactionEngine::react`].
    pub fn answer(&self, query: &str) -> Result<String, ReasonError> {
        let no_reaction = || ReasonError::NoReaction {
            query: query.to_string(),
        };

        let arguments = self.react(query, 1, &self.config.default_client);
        let best = arguments.into_iter().next().ok_or_else(no_reaction)?;
        let action = best.actions().first().ok_or_else(no_reaction)?;
        action.apply(&best).ok_or_else(no_reaction)
    }

    /// Run a fully recorded interaction for an identity.
    ///
    /// Derives the client key, reacts, renders each argument's first
    /// action, appends the record to the client's log, and returns it.
    pub fn interaction(
        &self,
        query: &str,
        maxcount: usize,
        identity: &ClientIdentity,
    ) -> Interaction {
        let client = identity.client_key();
        let arguments = self.react(query, maxcount, &client);
        let expressions = arguments
            .iter()
            .filter_map(|argument| {
                argument
                    .actions()
                    .first()
                    .and_then(|action| action.apply(argument))
            })
            .collect();

        let interaction = Interaction::new(client.clone(), query, maxcount, expressions, arguments);
        self.log.add_interaction(&client, interaction.clone());
        interaction
    }
}
