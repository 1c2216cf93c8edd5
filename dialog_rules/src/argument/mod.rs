//! Conversational arguments - accumulated context threaded across turns.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::rules::Action;

/// One set of bindings produced by a single conversational step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    bindings: HashMap<String, String>,
}

impl Thought {
    /// Create an empty thought.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name to a value.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Builder form of [`Thought::bind`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bind(name, value);
        self
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// Check whether the thought carries any bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Accumulated conversational context plus produced actions.
///
/// Thoughts are ordered oldest first; binding lookups resolve newest first.
/// An argument is owned by one reactive call and then handed to the caller,
/// so it carries no synchronization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    thoughts: Vec<Thought>,
    actions: Vec<Action>,
}

impl Argument {
    /// Create an empty argument.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a thought as the newest context entry.
    pub fn think(&mut self, thought: Thought) {
        self.thoughts.push(thought);
    }

    /// Replay another argument's context into this one, oldest first.
    pub fn merge(&mut self, other: &Argument) {
        for thought in &other.thoughts {
            self.thoughts.push(thought.clone());
        }
    }

    /// Resolve a binding, newest thought first.
    pub fn latest(&self, name: &str) -> Option<&str> {
        self.thoughts.iter().rev().find_map(|thought| thought.get(name))
    }

    /// Record an action produced by a fired rule.
    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Actions produced so far, in rule order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Context entries, oldest first.
    pub fn thoughts(&self) -> &[Thought] {
        &self.thoughts
    }

    /// Substitute `$name$` references in a template from the context.
    ///
    /// Returns `None` when any referenced binding is missing; a lone `$` is
    /// kept literally.
    pub fn unify(&self, template: &str) -> Option<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find('$') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('$') {
                Some(end) => {
                    let name = &after[..end];
                    out.push_str(self.latest(name)?);
                    rest = &after[end + 1..];
                }
                None => {
                    out.push('$');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        Some(out)
    }
}
