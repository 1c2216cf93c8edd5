//! Typed decoding of knowledge documents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use dialog_rules::RuleSpec;

use super::ConsoleDescriptor;

/// A decoded knowledge document.
///
/// Every section is optional; a missing section defaults to empty rather
/// than being an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    /// Console service descriptors by name.
    #[serde(default)]
    pub console: HashMap<String, ConsoleDescriptor>,

    /// Conversation rules in declaration order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,

    /// Synonym tables: category form to its variant forms.
    #[serde(default)]
    pub synonyms: HashMap<String, Vec<String>>,

    /// Words carrying no meaning for retrieval.
    #[serde(default)]
    pub filler: Vec<String>,
}

impl KnowledgeDocument {
    /// Decode a document from raw JSON.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
