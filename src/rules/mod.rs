//! # Rules
//!
//! Access statements and the per-role books that hold them.
//!
//! - **Rule**: one `(scope, resource, action) -> outcome` statement with a
//!   canonical key and a specificity score
//! - **RuleBook**: keyed, insertion-ordered rule set that rejects duplicates
//!   and conflicts and answers queries by precedence
//!
//! ## Precedence
//!
//! ```text
//! score = scope_explicit * 100 + resource_explicit * 10 + deny * 1
//! ```
//!
//! Matching rules are ordered by descending score, ties by ascending key; the
//! first one decides. No matching rule means deny.

mod book;
mod rule;

pub use book::RuleBook;
pub use rule::Rule;
