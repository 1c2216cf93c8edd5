//! Rule definitions - the conversation rule language.
//!
//! A rule maps trigger conditions to candidate actions:
//! - **Phrases**: wildcard patterns that syntactically match a query
//! - **Actions**: ordered answer phrases rendered against an argument
//! - **Keys**: trigger keywords the rule is indexed under

mod action;
mod phrase;
mod rule;

pub use action::*;
pub use phrase::*;
pub use rule::*;
