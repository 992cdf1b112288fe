//! Command implementations.

pub mod check;
pub mod label;
pub mod members;
pub mod path;
pub mod remove;
pub mod rules;
pub mod set;

pub use self::check::execute_check;
pub use self::label::execute_label;
pub use self::members::execute_members;
pub use self::path::execute_path;
pub use self::remove::{execute_remove_member, execute_remove_relationship};
pub use self::rules::execute_rules;
pub use self::set::execute_set;
