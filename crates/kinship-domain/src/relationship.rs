//! Relationship module - typed directed edges between members
//!
//! An edge `(source, target, kind)` reads "source is the `kind` of target":
//! `(A, B, Father)` means A is B's father.

use crate::path::TraversedEdge;
use crate::{FamilyId, MemberId, RelationshipId};
use std::fmt;

/// Type of relationship between two members
///
/// The names returned by [`RelationshipType::as_str`] are a wire contract with
/// the admin frontend and the mobile app. Do not rename them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationshipType {
    /// Source is the father of target
    Father,

    /// Source is the mother of target
    Mother,

    /// Source is the husband of target
    Husband,

    /// Source is the wife of target
    Wife,

    /// Source is a child of target
    ///
    /// Traversal-only: produced by walking a parent edge backward, never stored.
    Child,
}

impl RelationshipType {
    /// All stored relationship types in wire order
    pub const STORED: [RelationshipType; 4] = [
        RelationshipType::Father,
        RelationshipType::Mother,
        RelationshipType::Husband,
        RelationshipType::Wife,
    ];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Father => "Father",
            RelationshipType::Mother => "Mother",
            RelationshipType::Husband => "Husband",
            RelationshipType::Wife => "Wife",
            RelationshipType::Child => "Child",
        }
    }

    /// Parse a relationship type from its wire name (lowercase is accepted too)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Father" | "father" => Some(RelationshipType::Father),
            "Mother" | "mother" => Some(RelationshipType::Mother),
            "Husband" | "husband" => Some(RelationshipType::Husband),
            "Wife" | "wife" => Some(RelationshipType::Wife),
            "Child" | "child" => Some(RelationshipType::Child),
            _ => None,
        }
    }

    /// Whether this type may appear in storage
    pub fn is_stored(&self) -> bool {
        !matches!(self, RelationshipType::Child)
    }

    /// Whether this is a parent type (`Father` or `Mother`)
    pub fn is_parent(&self) -> bool {
        matches!(self, RelationshipType::Father | RelationshipType::Mother)
    }

    /// Whether this is a spouse type (`Husband` or `Wife`)
    pub fn is_spouse(&self) -> bool {
        matches!(self, RelationshipType::Husband | RelationshipType::Wife)
    }

    /// Semantic inverse, as seen when the edge is walked from target to source
    ///
    /// `Child` has no single inverse (it could be `Father` or `Mother`).
    ///
    /// # Examples
    ///
    /// ```
    /// use kinship_domain::RelationshipType;
    ///
    /// assert_eq!(RelationshipType::Father.inverse(), Some(RelationshipType::Child));
    /// assert_eq!(RelationshipType::Wife.inverse(), Some(RelationshipType::Husband));
    /// assert_eq!(RelationshipType::Child.inverse(), None);
    /// ```
    pub fn inverse(&self) -> Option<Self> {
        match self {
            RelationshipType::Father | RelationshipType::Mother => Some(RelationshipType::Child),
            RelationshipType::Husband => Some(RelationshipType::Wife),
            RelationshipType::Wife => Some(RelationshipType::Husband),
            RelationshipType::Child => None,
        }
    }

    /// Rank used to break ties between equally short paths
    ///
    /// Blood relations rank before marriage.
    pub fn traversal_priority(&self) -> u8 {
        match self {
            RelationshipType::Father => 0,
            RelationshipType::Mother => 1,
            RelationshipType::Child => 2,
            RelationshipType::Husband => 3,
            RelationshipType::Wife => 4,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid relationship type: {}", s))
    }
}

/// A directed typed edge: `source` is the `kind` of `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Member the relationship is asserted about
    pub source: MemberId,

    /// Member the relationship is relative to
    pub target: MemberId,

    /// Type of relationship
    pub kind: RelationshipType,
}

impl Edge {
    /// Create a new edge
    pub fn new(source: MemberId, target: MemberId, kind: RelationshipType) -> Self {
        Self { source, target, kind }
    }

    /// Whether the member is either end of this edge
    pub fn involves(&self, member: MemberId) -> bool {
        self.source == member || self.target == member
    }

    /// The end of the edge opposite to `member`
    pub fn other_end(&self, member: MemberId) -> Option<MemberId> {
        if self.source == member {
            Some(self.target)
        } else if self.target == member {
            Some(self.source)
        } else {
            None
        }
    }

    /// The edge as seen when walking away from `from`
    ///
    /// Walking from the source keeps the stored type; walking from the target
    /// yields the inverse. Returns `None` when `from` is not an end of the edge
    /// or the type has no inverse.
    pub fn traverse_from(&self, from: MemberId) -> Option<TraversedEdge> {
        if from == self.source {
            Some(TraversedEdge {
                from,
                to: self.target,
                kind: self.kind,
                stored: *self,
            })
        } else if from == self.target {
            Some(TraversedEdge {
                from,
                to: self.source,
                kind: self.kind.inverse()?,
                stored: *self,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {} of {}", self.source, self.kind, self.target)
    }
}

/// A persisted relationship row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relationship {
    /// Row identifier
    pub id: RelationshipId,

    /// Family the row belongs to
    pub family_id: FamilyId,

    /// The asserted edge
    pub edge: Edge,
}

impl Relationship {
    /// Create a new relationship row
    pub fn new(id: RelationshipId, family_id: FamilyId, edge: Edge) -> Self {
        Self { id, family_id, edge }
    }
}

/// Rows to delete and rows to insert after a graph mutation
///
/// The core never persists anything; callers hand this to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeChanges {
    /// Rows created by the mutation
    pub added: Vec<Relationship>,

    /// Rows deleted by the mutation
    pub removed: Vec<Relationship>,
}

impl EdgeChanges {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the mutation changed nothing
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Append another change set
    pub fn extend(&mut self, other: EdgeChanges) {
        self.added.extend(other.added);
        self.removed.extend(other.removed);
    }
}
