//! Error types for relationship and kinship operations

use kinship_domain::{FamilyId, Gender, MemberId, RelationshipType};
use kinship_graph::{InvariantViolation, NotFound, Unreachable};
use kinship_rules::RuleError;
use thiserror::Error;

/// A requested relationship change is not acceptable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A member named as their own relative
    #[error("A member cannot be their own {0}")]
    SelfReference(RelationshipType),

    /// Members from different families
    #[error("Member {member} belongs to family {found}, expected {expected}")]
    CrossFamily {
        /// Offending member
        member: MemberId,
        /// Family of the operation
        expected: FamilyId,
        /// Family the member belongs to
        found: FamilyId,
    },

    /// Member unknown to the lookup
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    /// Parent assignment that would make a member their own ancestor
    #[error("{parent} cannot be the {kind} of {child}: {child} is already their ancestor")]
    AncestryCycle {
        /// Proposed parent
        parent: MemberId,
        /// Member receiving the parent
        child: MemberId,
        /// `Father` or `Mother`
        kind: RelationshipType,
    },

    /// Relative's recorded gender contradicts the relationship type
    #[error("{member} is recorded as {gender} and cannot be a {kind}")]
    GenderMismatch {
        /// Relative being assigned
        member: MemberId,
        /// Slot being filled
        kind: RelationshipType,
        /// Recorded gender
        gender: Gender,
    },
}

/// Errors surfaced by [`KinshipService`](crate::KinshipService)
#[derive(Error, Debug)]
pub enum KinshipError {
    /// Rejected change request
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Mutation or stored data breaking a graph invariant
    #[error("Invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    /// Referenced member or relationship absent
    #[error(transparent)]
    NotFound(#[from] NotFound),

    /// Members not connected within the depth bound
    #[error(transparent)]
    Unreachable(#[from] Unreachable),

    /// Rule table could not be loaded
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Persistence collaborator failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
