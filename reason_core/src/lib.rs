//! # Reason Core (The Reasoner)
//!
//! The "brain" of the conversational reasoning system. This crate interfaces
//! with `dialog_rules`, maintains a hot-reloadable inverted index over
//! normalized trigger keywords, and for each query retrieves, ranks, and
//! validates candidate rules under multi-turn conversational context.
//!
//! ## Core Components
//!
//! - **knowledge_base**: trigger-indexed rule storage with idempotent reload
//! - **ranker**: retrieval and deterministic score ranking of ideas
//! - **reaction**: context threading, consideration, and recorded responses
//!
//! ## Design Philosophy
//!
//! - **Snapshot reads**: queries read the index concurrently; a reload never
//!   exposes a partially built bucket
//! - **Deterministic ranking**: equal scores resolve by encounter order,
//!   catch-all rules last
//! - **Non-fatal ingestion**: one bad knowledge file never aborts a reload

mod error;

pub mod knowledge_base;
pub mod ranker;
pub mod reaction;

pub use error::*;
pub use knowledge_base::*;
pub use ranker::*;
pub use reaction::*;
