//! Kinship Rules
//!
//! Turns a walked path into a kinship label.
//!
//! # Overview
//!
//! A [`RuleTable`] is an ordered list of [`Rule`]s, each a pattern of
//! traversal types, a [`Condition`] and a label. The [`KinshipRuleEngine`]
//! derives the pattern of a path, looks up the rules with that pattern and
//! returns the label of the first one whose condition holds.
//!
//! Tables are loaded from TOML ([`RuleTable::from_toml`],
//! [`RuleTable::from_file`]) or taken from the built-in locales
//! ([`RuleTable::builtin`]). They are immutable once built and are shared
//! through `Arc`.
//!
//! When no rule matches, [`describe_path`] produces a generic description
//! such as "mother's brother's wife".

#![warn(missing_docs)]

mod condition;
mod describe;
mod engine;
mod error;
mod loader;
mod rule;

pub use condition::{Condition, Position};
pub use describe::describe_path;
pub use engine::{resolve, KinshipRuleEngine};
pub use error::RuleError;
pub use loader::BUILTIN_LOCALES;
pub use rule::{Rule, RuleTable};
