//! # Dialog Rules (The Rule Book)
//!
//! The "contract" crate - contains the conversation rule language, the
//! tokenizer, conversational arguments, and interaction records. This crate
//! is the single source of truth for what a rule *is* and does not contain
//! any retrieval or ranking logic.

pub mod argument;
pub mod interaction;
pub mod language;
pub mod rules;

pub use argument::*;
pub use interaction::*;
pub use language::*;
pub use rules::*;
