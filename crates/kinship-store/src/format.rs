//! On-disk JSON format
//!
//! Ids are hyphenated UUID strings. Relationship types use the wire names
//! `Father`, `Mother`, `Husband` and `Wife`.
//!
//! ```json
//! {
//!   "families": [
//!     {
//!       "id": "…",
//!       "name": "Nguyen",
//!       "members": [ { "id": "…", "name": "An", "gender": "Male" } ],
//!       "relationships": [ { "id": "…", "source": "…", "target": "…", "type": "Father" } ]
//!     }
//!   ]
//! }
//! ```

use crate::StoreError;
use kinship_domain::{
    Edge, FamilyId, Gender, Member, MemberId, Relationship, RelationshipId, RelationshipType,
};
use serde::{Deserialize, Serialize};

/// Root of a family file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyFile {
    /// Families in the file
    #[serde(default)]
    pub families: Vec<FamilyRecord>,
}

/// One family with its members and relationship rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRecord {
    /// Family id
    pub id: String,

    /// Family name
    #[serde(default)]
    pub name: String,

    /// Members of the family
    #[serde(default)]
    pub members: Vec<MemberRecord>,

    /// Relationship rows of the family
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
}

/// A member row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Member id
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `Male`, `Female` or `Unknown`
    #[serde(default = "default_gender")]
    pub gender: String,
}

fn default_gender() -> String {
    Gender::Unknown.as_str().to_string()
}

/// A relationship row: `source` is the `type` of `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    /// Relationship id
    pub id: String,

    /// Member the relationship is asserted for
    pub source: String,

    /// Member the source is related to
    pub target: String,

    /// Stored relationship type
    #[serde(rename = "type")]
    pub kind: String,
}

impl MemberRecord {
    /// Convert to a domain member of `family`
    pub fn to_member(&self, family: FamilyId) -> Result<Member, StoreError> {
        let id = MemberId::from_string(&self.id).map_err(StoreError::InvalidData)?;
        let gender = self.gender.parse::<Gender>().map_err(StoreError::InvalidData)?;
        let mut member = Member::new(id, family, gender);
        member.display_name = self.name.clone();
        Ok(member)
    }

    /// Build a row from a domain member
    pub fn from_member(member: &Member) -> Self {
        Self {
            id: member.id.to_string(),
            name: member.display_name.clone(),
            gender: member.gender.as_str().to_string(),
        }
    }
}

impl RelationshipRecord {
    /// Convert to a domain relationship of `family`
    pub fn to_relationship(&self, family: FamilyId) -> Result<Relationship, StoreError> {
        let id = RelationshipId::from_string(&self.id).map_err(StoreError::InvalidData)?;
        let source = MemberId::from_string(&self.source).map_err(StoreError::InvalidData)?;
        let target = MemberId::from_string(&self.target).map_err(StoreError::InvalidData)?;
        let kind = self
            .kind
            .parse::<RelationshipType>()
            .map_err(StoreError::InvalidData)?;
        if !kind.is_stored() {
            return Err(StoreError::InvalidData(format!(
                "Relationship {} has derived type {}",
                self.id, kind
            )));
        }
        Ok(Relationship::new(id, family, Edge::new(source, target, kind)))
    }

    /// Build a row from a domain relationship
    pub fn from_relationship(row: &Relationship) -> Self {
        Self {
            id: row.id.to_string(),
            source: row.edge.source.to_string(),
            target: row.edge.target.to_string(),
            kind: row.edge.kind.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_record_defaults() {
        let record: MemberRecord =
            serde_json::from_str(r#"{ "id": "0192f3a0-0000-7000-8000-000000000001" }"#).unwrap();
        let member = record.to_member(FamilyId::from_value(1)).unwrap();
        assert_eq!(member.gender, Gender::Unknown);
        assert!(member.display_name.is_none());
    }

    #[test]
    fn test_relationship_record_uses_wire_names() {
        let row = Relationship::new(
            RelationshipId::from_value(3),
            FamilyId::from_value(1),
            Edge::new(MemberId::from_value(1), MemberId::from_value(2), RelationshipType::Wife),
        );
        let json = serde_json::to_value(RelationshipRecord::from_relationship(&row)).unwrap();
        assert_eq!(json["type"], "Wife");

        let record: RelationshipRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.to_relationship(FamilyId::from_value(1)).unwrap(), row);
    }

    #[test]
    fn test_rejects_bad_rows() {
        let bad_type = RelationshipRecord {
            id: RelationshipId::from_value(1).to_string(),
            source: MemberId::from_value(1).to_string(),
            target: MemberId::from_value(2).to_string(),
            kind: "Child".to_string(),
        };
        assert!(matches!(
            bad_type.to_relationship(FamilyId::from_value(1)),
            Err(StoreError::InvalidData(_))
        ));

        let bad_id = MemberRecord {
            id: "not-a-uuid".to_string(),
            name: None,
            gender: "Male".to_string(),
        };
        assert!(bad_id.to_member(FamilyId::from_value(1)).is_err());
    }
}
