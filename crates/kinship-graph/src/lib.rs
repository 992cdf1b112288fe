//! Kinship Graph
//!
//! In-memory relationship graph for one family and the bounded path search
//! over it.
//!
//! # Overview
//!
//! - [`RelationshipStore`] holds a family's edges in an arena with per-member
//!   incident lists and rejects mutations that would break the graph
//!   invariants (one father, one mother, no self-loops, no duplicates).
//! - [`PathFinder`] walks the graph as undirected and returns the shortest,
//!   deterministically tie-broken path between two members.
//!
//! Everything here is synchronous and performs no I/O. Callers load rows from
//! storage, build a store, and persist whatever changed afterwards.
//!
//! # Example
//!
//! ```
//! use kinship_domain::{Edge, FamilyId, MemberId, RelationshipType};
//! use kinship_graph::{PathFinder, RelationshipStore};
//!
//! let family = FamilyId::from_value(1);
//! let (grandpa, dad, kid) = (MemberId::from_value(1), MemberId::from_value(2), MemberId::from_value(3));
//!
//! let mut store = RelationshipStore::new(family);
//! store.add_edge(Edge::new(grandpa, dad, RelationshipType::Father)).unwrap();
//! store.add_edge(Edge::new(dad, kid, RelationshipType::Father)).unwrap();
//!
//! let path = PathFinder::default().find_path(&store, kid, grandpa).unwrap();
//! assert_eq!(path.len(), 2);
//! ```

#![warn(missing_docs)]

mod error;
mod path_finder;
mod store;

pub use error::{InvariantViolation, NotFound, Unreachable};
pub use path_finder::{find_path, PathFinder, DEFAULT_MAX_DEPTH};
pub use store::RelationshipStore;
