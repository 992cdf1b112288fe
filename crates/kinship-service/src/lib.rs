//! Kinship Service
//!
//! The operations callers use: computing kinship labels between two members
//! and maintaining a member's parents and spouses.
//!
//! # Overview
//!
//! - [`MemberRelationshipService`] applies multi-slot relationship updates to a
//!   loaded [`RelationshipStore`](kinship_graph::RelationshipStore), all or
//!   nothing.
//! - [`KinshipService`] loads a family from a
//!   [`FamilyRepository`](kinship_domain::FamilyRepository), finds the path
//!   between two members and resolves it against the configured rule table.
//! - [`KinshipConfig`] selects the depth bound, the rule table and the
//!   validation policy.
//!
//! Nothing in this crate persists data. Mutations return
//! [`EdgeChanges`](kinship_domain::EdgeChanges) for the caller to store.

#![warn(missing_docs)]

mod config;
mod error;
mod kinship;
mod relationships;

pub use config::{KinshipConfig, RelationshipPolicy, MAX_DEPTH_LIMIT};
pub use error::{KinshipError, ValidationError};
pub use kinship::{Kinship, KinshipService, Resolution};
pub use relationships::{MemberRelationshipService, RelationshipUpdate};
