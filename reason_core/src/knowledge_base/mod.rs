//! Knowledge Base - trigger-indexed rule storage with hot reload.
//!
//! The index maps a normalized trigger key to a bucket of rules keyed by
//! stable rule ID:
//! - buckets are `BTreeMap`s, so retrieval iterates them in a reproducible
//!   order and re-learning a rule replaces its entry in place
//! - the outer map sits behind an `RwLock`: queries read concurrently while
//!   reload passes serialize through the single writer role
//! - readers receive cloned buckets of `Arc`ed rules, never a handle into
//!   the raw structure

mod console;
mod document;

pub use console::*;
pub use document::*;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::SystemTime;

use dialog_rules::{Rule, RuleId, Tokenizer, CATCHALL_KEY};

use crate::ReasonError;

/// File extension recognized as a knowledge file.
const KNOWLEDGE_EXTENSION: &str = "json";

/// One trigger-key bucket: rules carrying the key, by stable ID.
pub type Bucket = BTreeMap<RuleId, Arc<Rule>>;

/// Ingests knowledge documents and serves the inverted trigger index.
pub struct KnowledgeBase {
    /// Static initial knowledge set.
    init_path: PathBuf,

    /// Dynamically appended watch set.
    watch_path: PathBuf,

    /// Normalized trigger key -> rules carrying it.
    index: RwLock<HashMap<String, Bucket>>,

    /// Knowledge file -> modification time at the last observation.
    observations: Mutex<HashMap<PathBuf, SystemTime>>,

    tokenizer: Tokenizer,
    consoles: ConsoleRegistry,
}

impl KnowledgeBase {
    /// Create a knowledge base over an initial and a watched root.
    pub fn new(init_path: impl Into<PathBuf>, watch_path: impl Into<PathBuf>) -> Self {
        Self {
            init_path: init_path.into(),
            watch_path: watch_path.into(),
            index: RwLock::new(HashMap::new()),
            observations: Mutex::new(HashMap::new()),
            tokenizer: Tokenizer::new(),
            consoles: ConsoleRegistry::new(),
        }
    }

    /// The shared tokenizer; lookups and stores normalize through it.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Console services registered by knowledge documents.
    pub fn consoles(&self) -> &ConsoleRegistry {
        &self.consoles
    }

    /// Scan both knowledge roots for new or changed files.
    ///
    /// Slow filesystem work: drive it from a timer or an external trigger,
    /// never inline with request handling. A file is reparsed only when it
    /// is unseen or its modification time moved past the recorded
    /// observation; a file that fails to parse is logged and skipped, the
    /// rest of the pass continues.
    pub fn observe(&self) -> Result<(), ReasonError> {
        self.observe_path(&self.init_path)?;
        self.observe_path(&self.watch_path)?;
        Ok(())
    }

    fn observe_path(&self, path: &Path) -> Result<(), ReasonError> {
        fs::create_dir_all(path)?;
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let file = entry.path();
            if !file.is_file()
                || file.extension().and_then(|e| e.to_str()) != Some(KNOWLEDGE_EXTENSION)
            {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            {
                let mut observations = self.observations.lock().expect("observations lock");
                if observations.get(&file).is_some_and(|seen| modified <= *seen) {
                    continue;
                }
                observations.insert(file.clone(), modified);
            }
            if let Err(error) = self.learn_file(&file) {
                tracing::warn!(
                    file = %file.display(),
                    error = %error,
                    "bad knowledge file, skipping"
                );
            }
        }
        Ok(())
    }

    fn learn_file(&self, file: &Path) -> Result<(), ReasonError> {
        let raw = fs::read_to_string(file)?;
        let document = KnowledgeDocument::from_json(&raw)?;
        self.learn(&document)
    }

    /// Ingest one knowledge document.
    ///
    /// The tokenizer is taught first so the key normalization below already
    /// sees the document's synonyms. Rules are indexed under the
    /// categorized form of every declared key; the catch-all key is stored
    /// verbatim. Re-learning a rule with an existing ID replaces the bucket
    /// entry in place.
    pub fn learn(&self, document: &KnowledgeDocument) -> Result<(), ReasonError> {
        self.tokenizer.learn_synonyms(&document.synonyms);
        self.tokenizer.learn_fillers(&document.filler);

        for (name, descriptor) in &document.console {
            self.consoles.register(name, descriptor);
        }

        let rules = document
            .rules
            .iter()
            .map(|spec| Rule::compile(spec.clone()).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        let mut index = self.index.write().expect("index lock");
        for rule in rules {
            for key in rule.keys() {
                let key = if key == CATCHALL_KEY {
                    CATCHALL_KEY.to_string()
                } else {
                    self.tokenizer.tokenize_term(key).categorized
                };
                index.entry(key).or_default().insert(rule.id(), Arc::clone(&rule));
            }
        }
        Ok(())
    }

    /// All rules indexed under a trigger key.
    ///
    /// Returns a cloned bucket: a consistent snapshot that stays valid
    /// while a reload rewrites the index behind it.
    pub fn bucket(&self, key: &str) -> Bucket {
        self.index
            .read()
            .expect("index lock")
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// The catch-all bucket, matched independent of query tokens.
    pub fn catchall_bucket(&self) -> Bucket {
        self.bucket(CATCHALL_KEY)
    }

    /// Number of distinct rules across all buckets.
    pub fn rule_count(&self) -> usize {
        let index = self.index.read().expect("index lock");
        let mut seen: HashSet<&RuleId> = HashSet::new();
        for bucket in index.values() {
            seen.extend(bucket.keys());
        }
        seen.len()
    }

    /// Number of distinct trigger keys.
    pub fn key_count(&self) -> usize {
        self.index.read().expect("index lock").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn base() -> (tempfile::TempDir, tempfile::TempDir, KnowledgeBase) {
        let init = tempfile::tempdir().unwrap();
        let watch = tempfile::tempdir().unwrap();
        let base = KnowledgeBase::new(init.path(), watch.path());
        (init, watch, base)
    }

    fn document(raw: &str) -> KnowledgeDocument {
        KnowledgeDocument::from_json(raw).unwrap()
    }

    fn write_file(dir: &Path, name: &str, raw: &str) -> PathBuf {
        let file = dir.join(name);
        let mut handle = File::create(&file).unwrap();
        handle.write_all(raw.as_bytes()).unwrap();
        file
    }

    const GREETING: &str = r#"{
        "rules": [
            {"keys": ["hello"], "score": 10, "phrases": ["*hello*"], "actions": [{"phrases": ["Hi!"]}]}
        ]
    }"#;

    #[test]
    fn test_learn_indexes_under_every_key() {
        let (_i, _w, base) = base();
        base.learn(&document(
            r#"{"rules": [{"keys": ["hello", "hi"], "phrases": ["*"], "actions": [{"phrases": ["x"]}]}]}"#,
        ))
        .unwrap();

        assert_eq!(base.bucket("hello").len(), 1);
        assert_eq!(base.bucket("hi").len(), 1);
        assert_eq!(base.rule_count(), 1);
    }

    #[test]
    fn test_relearning_is_idempotent() {
        let (_i, _w, base) = base();
        let doc = document(GREETING);
        base.learn(&doc).unwrap();
        base.learn(&doc).unwrap();

        assert_eq!(base.bucket("hello").len(), 1);
        assert_eq!(base.rule_count(), 1);
    }

    #[test]
    fn test_keyless_rule_lands_in_catchall() {
        let (_i, _w, base) = base();
        base.learn(&document(
            r#"{"rules": [{"phrases": ["*"], "actions": [{"phrases": ["hm"]}]}]}"#,
        ))
        .unwrap();

        assert_eq!(base.catchall_bucket().len(), 1);
    }

    #[test]
    fn test_keys_are_normalized_like_lookups() {
        let (_i, _w, base) = base();
        base.learn(&document(
            r#"{
                "synonyms": {"greeting": ["hello", "hi"]},
                "rules": [{"keys": ["Hello"], "phrases": ["*"], "actions": [{"phrases": ["x"]}]}]
            }"#,
        ))
        .unwrap();

        // the declared key folded into its category form
        let token = base.tokenizer().tokenize_term("hi");
        assert_eq!(base.bucket(&token.categorized).len(), 1);
        assert!(base.bucket("hello").is_empty());
    }

    #[test]
    fn test_learn_registers_consoles() {
        let (_i, _w, base) = base();
        base.learn(&document(
            r#"{"console": {"weather": {"url": "u", "data": "d", "parser": "json"}}}"#,
        ))
        .unwrap();

        assert!(base.consoles().service("weather").is_some());
    }

    #[test]
    fn test_observe_learns_knowledge_files() {
        let (init, _w, base) = base();
        write_file(init.path(), "greeting.json", GREETING);
        write_file(init.path(), "notes.txt", "not knowledge");

        base.observe().unwrap();

        assert_eq!(base.bucket("hello").len(), 1);
        assert_eq!(base.rule_count(), 1);
    }

    #[test]
    fn test_observe_skips_unchanged_files() {
        let (init, _w, base) = base();
        write_file(init.path(), "greeting.json", GREETING);

        base.observe().unwrap();
        base.observe().unwrap();

        assert_eq!(base.rule_count(), 1);
    }

    #[test]
    fn test_bad_file_does_not_abort_the_pass() {
        let (init, _w, base) = base();
        write_file(init.path(), "a_broken.json", "{this is not json");
        write_file(init.path(), "b_greeting.json", GREETING);

        base.observe().unwrap();

        // the valid sibling is indexed and retrievable
        assert_eq!(base.bucket("hello").len(), 1);
    }

    #[test]
    fn test_watch_root_is_scanned_too() {
        let (_i, watch, base) = base();
        write_file(watch.path(), "greeting.json", GREETING);

        base.observe().unwrap();

        assert_eq!(base.bucket("hello").len(), 1);
    }
}
