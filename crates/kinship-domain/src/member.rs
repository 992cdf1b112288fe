//! Member module - the people in a family graph
//!
//! Members are owned by the persistence layer; this crate only reads them.

use crate::traits::MemberLookup;
use crate::{FamilyId, MemberId};
use std::collections::HashMap;

/// Gender of a member as recorded by the family tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    /// Male
    Male,

    /// Female
    Female,

    /// Not recorded
    #[default]
    Unknown,
}

impl Gender {
    /// Get the gender name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
    }

    /// Parse a gender from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "unknown" | "other" | "" => Some(Gender::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid gender: {}", s))
    }
}

/// A member of a family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,

    /// Family this member belongs to
    pub family_id: FamilyId,

    /// Recorded gender
    pub gender: Gender,

    /// Optional human-readable name
    pub display_name: Option<String>,
}

impl Member {
    /// Create a new member without a display name
    pub fn new(id: MemberId, family_id: FamilyId, gender: Gender) -> Self {
        Self {
            id,
            family_id,
            gender,
            display_name: None,
        }
    }

    /// Attach a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name for output, falling back to the id
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}

/// Members of one family indexed by id
///
/// This is the read-only member view handed to the relationship service and
/// the rule engine for one unit of work.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    members: HashMap<MemberId, Member>,
}

impl MemberDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from an iterator of members
    pub fn from_members(members: impl IntoIterator<Item = Member>) -> Self {
        Self {
            members: members.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    /// Insert or replace a member
    pub fn insert(&mut self, member: Member) {
        self.members.insert(member.id, member);
    }

    /// Remove a member
    pub fn remove(&mut self, id: MemberId) -> Option<Member> {
        self.members.remove(&id)
    }

    /// Whether the directory knows this member
    pub fn contains(&self, id: MemberId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over all members in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Find a member by exact display name
    pub fn find_by_name(&self, name: &str) -> Option<&Member> {
        self.members
            .values()
            .find(|m| m.display_name.as_deref() == Some(name))
    }
}

impl MemberLookup for MemberDirectory {
    fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }
}
