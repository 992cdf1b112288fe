//! Kinship Domain Layer
//!
//! This crate contains the value types of the family relationship graph. It has
//! no dependencies beyond `uuid` and defines the fundamental concepts and trait
//! interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Edge**: `(source, target, kind)`, "source is the kind of target"
//! - **Path**: members and traversed edges connecting a subject to a target
//! - **Pattern**: the type-only shape of a path, used to look up kinship rules
//! - **Relationship**: a persisted edge row with an id and a family
//!
//! ## Architecture
//!
//! - Pure value types only, no I/O
//! - Graph storage and traversal live in `kinship-graph`
//! - Trait definitions for the persistence collaborator

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod id;
pub mod member;
pub mod path;
pub mod relationship;
pub mod traits;

// Re-exports for convenience
pub use id::{FamilyId, MemberId, RelationshipId};
pub use member::{Gender, Member, MemberDirectory};
pub use path::{Path, Pattern, TraversedEdge};
pub use relationship::{Edge, EdgeChanges, Relationship, RelationshipType};
pub use traits::{FamilyRepository, MemberLookup};
