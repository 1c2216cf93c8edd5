//! Action definitions - what a rule produces when it fires.

use serde::{Deserialize, Serialize};

use crate::argument::Argument;

/// A rule action: an ordered list of candidate answer phrases.
///
/// Answer phrases may reference context bindings as `$name$`; wildcard
/// captures of the matched trigger phrase are bound as `$1$`, `$2$`, ...
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub phrases: Vec<String>,
}

impl Action {
    /// Create an action from its answer phrases.
    pub fn new(phrases: Vec<String>) -> Self {
        Self { phrases }
    }

    /// Create a single-phrase answer action.
    pub fn answer(phrase: impl Into<String>) -> Self {
        Self {
            phrases: vec![phrase.into()],
        }
    }

    /// Apply the action against an argument, producing the response text.
    ///
    /// The first phrase is rendered; `$name$` references resolve from the
    /// argument's context. An unresolved reference or an empty rendering
    /// declines with `None`.
    pub fn apply(&self, argument: &Argument) -> Option<String> {
        let phrase = self.phrases.first()?;
        let expression = argument.unify(phrase)?;
        if expression.is_empty() {
            None
        } else {
            Some(expression)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Thought;

    #[test]
    fn test_apply_plain_phrase() {
        let action = Action::answer("Good to see you");
        let argument = Argument::new();

        assert_eq!(action.apply(&argument), Some("Good to see you".to_string()));
    }

    #[test]
    fn test_apply_substitutes_bindings() {
        let action = Action::answer("Why do you feel $1$?");
        let mut argument = Argument::new();
        argument.think(Thought::new().with("1", "funny"));

        assert_eq!(action.apply(&argument), Some("Why do you feel funny?".to_string()));
    }

    #[test]
    fn test_apply_declines_on_unbound_reference() {
        let action = Action::answer("You said $answer$ before");
        let argument = Argument::new();

        assert_eq!(action.apply(&argument), None);
    }

    #[test]
    fn test_apply_declines_without_phrases() {
        let action = Action::new(Vec::new());
        let argument = Argument::new();

        assert_eq!(action.apply(&argument), None);
    }

    #[test]
    fn test_apply_declines_on_empty_rendering() {
        let action = Action::answer("$1$");
        let mut argument = Argument::new();
        argument.think(Thought::new().with("1", ""));

        assert_eq!(action.apply(&argument), None);
    }
}
