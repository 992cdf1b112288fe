//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the kinship core and
//! infrastructure. Implementations live in other crates.

use crate::{FamilyId, Gender, Member, MemberId, Relationship, RelationshipId};
use std::collections::HashMap;

/// Read-only access to member records
///
/// Rule conditions and relationship validation consult members through this
/// trait so callers can pass whatever member index they already hold.
pub trait MemberLookup {
    /// Get a member by id
    fn member(&self, id: MemberId) -> Option<&Member>;

    /// Get a member's gender
    fn gender(&self, id: MemberId) -> Option<Gender> {
        self.member(id).map(|m| m.gender)
    }
}

impl MemberLookup for HashMap<MemberId, Member> {
    fn member(&self, id: MemberId) -> Option<&Member> {
        self.get(&id)
    }
}

/// Persistence collaborator that owns members and relationship rows
///
/// Implemented by the infrastructure layer (kinship-store)
pub trait FamilyRepository {
    /// Error type for repository operations
    type Error;

    /// Get a member by id
    fn member(&self, id: MemberId) -> Result<Option<Member>, Self::Error>;

    /// Get all members of a family
    fn members_of_family(&self, family: FamilyId) -> Result<Vec<Member>, Self::Error>;

    /// Get all relationship rows of a family
    fn relationships_of_family(&self, family: FamilyId) -> Result<Vec<Relationship>, Self::Error>;

    /// Get a relationship row by id
    fn relationship(&self, id: RelationshipId) -> Result<Option<Relationship>, Self::Error>;
}

impl<T: FamilyRepository + ?Sized> FamilyRepository for &T {
    type Error = T::Error;

    fn member(&self, id: MemberId) -> Result<Option<Member>, Self::Error> {
        (**self).member(id)
    }

    fn members_of_family(&self, family: FamilyId) -> Result<Vec<Member>, Self::Error> {
        (**self).members_of_family(family)
    }

    fn relationships_of_family(&self, family: FamilyId) -> Result<Vec<Relationship>, Self::Error> {
        (**self).relationships_of_family(family)
    }

    fn relationship(&self, id: RelationshipId) -> Result<Option<Relationship>, Self::Error> {
        (**self).relationship(id)
    }
}
