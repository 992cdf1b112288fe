//! Error types for graph operations

use kinship_domain::{Edge, FamilyId, MemberId, RelationshipId, RelationshipType};
use thiserror::Error;

/// A mutation that would break a structural guarantee of the family graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Edge from a member to themself
    #[error("A member cannot be related to themself ({member})")]
    SelfLoop {
        /// The member on both ends
        member: MemberId,
    },

    /// Second parent of the same kind
    #[error("This member already has a registered {}", parent_word(.kind))]
    DuplicateParent {
        /// Member receiving the parent
        member: MemberId,
        /// `Father` or `Mother`
        kind: RelationshipType,
        /// The parent already on record
        existing: MemberId,
    },

    /// Exact same edge already stored
    #[error("Relationship already exists: {0}")]
    DuplicateEdge(Edge),

    /// Traversal-only type offered for storage
    #[error("{0} is a derived relationship type and cannot be stored")]
    NotStorable(RelationshipType),

    /// Row id already present
    #[error("Relationship id already present: {0}")]
    DuplicateId(RelationshipId),

    /// Row belongs to a different family than the store
    #[error("Relationship {id} belongs to family {found}, expected {expected}")]
    ForeignFamily {
        /// Row id
        id: RelationshipId,
        /// Family of the store
        expected: FamilyId,
        /// Family of the row
        found: FamilyId,
    },
}

fn parent_word(kind: &RelationshipType) -> &'static str {
    match kind {
        RelationshipType::Mother => "mother",
        _ => "father",
    }
}

/// A referenced edge, relationship or member is absent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    /// No such edge
    #[error("Relationship not found: {0}")]
    Edge(Edge),

    /// No such relationship row
    #[error("Relationship not found: {0}")]
    Relationship(RelationshipId),

    /// No such member
    #[error("Member not found: {0}")]
    Member(MemberId),
}

/// No path connects two members within the depth bound
///
/// This is an expected outcome, not a failure of the graph.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No relationship found between {subject} and {target} within {max_depth} steps")]
pub struct Unreachable {
    /// Member the search started from
    pub subject: MemberId,
    /// Member that was searched for
    pub target: MemberId,
    /// Depth bound in effect
    pub max_depth: usize,
}
