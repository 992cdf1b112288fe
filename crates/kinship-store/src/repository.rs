//! In-memory `FamilyRepository` backed by a JSON family file

use crate::format::{FamilyFile, FamilyRecord, MemberRecord, RelationshipRecord};
use crate::StoreError;
use kinship_domain::{
    EdgeChanges, FamilyId, FamilyRepository, Member, MemberId, Relationship, RelationshipId,
};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Families, members and relationship rows held in memory
///
/// Loaded from and saved to a [`FamilyFile`]. Families and rows keep a
/// stable order by id, so saving an unchanged repository reproduces the
/// same file.
///
/// # Thread Safety
///
/// Reads take `&self`; writes take `&mut self`. Wrap the repository in a lock
/// to share it between threads.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFamilyRepository {
    path: Option<PathBuf>,
    families: BTreeMap<FamilyId, String>,
    members: HashMap<MemberId, Member>,
    relationships: BTreeMap<RelationshipId, Relationship>,
}

impl InMemoryFamilyRepository {
    /// Create an empty repository not tied to a file
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a family file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut repo = Self::from_json(&contents)?;
        repo.path = Some(path.to_path_buf());
        tracing::debug!(
            path = %path.display(),
            families = repo.families.len(),
            members = repo.members.len(),
            relationships = repo.relationships.len(),
            "Loaded family file"
        );
        Ok(repo)
    }

    /// Parse a family file from JSON text
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let file: FamilyFile = serde_json::from_str(json)?;
        Self::from_file_format(file)
    }

    /// Build a repository from the file format, validating every id
    pub fn from_file_format(file: FamilyFile) -> Result<Self, StoreError> {
        let mut repo = Self::new();
        for record in file.families {
            let family = FamilyId::from_string(&record.id).map_err(StoreError::InvalidData)?;
            repo.add_family(family, record.name)?;
            for member in &record.members {
                repo.add_member(member.to_member(family)?)?;
            }
            for row in &record.relationships {
                repo.add_relationship(row.to_relationship(family)?)?;
            }
        }
        Ok(repo)
    }

    /// Convert back to the file format
    pub fn to_file_format(&self) -> FamilyFile {
        let families = self
            .families
            .iter()
            .map(|(&family, name)| {
                let mut members: Vec<&Member> = self
                    .members
                    .values()
                    .filter(|m| m.family_id == family)
                    .collect();
                members.sort_by_key(|m| m.id);

                FamilyRecord {
                    id: family.to_string(),
                    name: name.clone(),
                    members: members.into_iter().map(MemberRecord::from_member).collect(),
                    relationships: self
                        .relationships
                        .values()
                        .filter(|r| r.family_id == family)
                        .map(RelationshipRecord::from_relationship)
                        .collect(),
                }
            })
            .collect();
        FamilyFile { families }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.to_file_format())?)
    }

    /// Write back to the file this repository was loaded from
    pub fn save(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Err(StoreError::InvalidData(
                "Repository was not loaded from a file".to_string(),
            )),
        }
    }

    /// Write to a specific file
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), "Saved family file");
        Ok(())
    }

    /// File this repository reads from and saves to, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Register a family
    pub fn add_family(&mut self, family: FamilyId, name: impl Into<String>) -> Result<(), StoreError> {
        if self.families.contains_key(&family) {
            return Err(StoreError::InvalidData(format!("Duplicate family id: {}", family)));
        }
        self.families.insert(family, name.into());
        Ok(())
    }

    /// Add a member to a registered family
    pub fn add_member(&mut self, member: Member) -> Result<(), StoreError> {
        self.check_family(member.family_id)?;
        if self.members.contains_key(&member.id) {
            return Err(StoreError::InvalidData(format!("Duplicate member id: {}", member.id)));
        }
        self.members.insert(member.id, member);
        Ok(())
    }

    /// Add a relationship row whose members belong to its family
    ///
    /// Graph invariants are not checked here; corrupt rows surface when the
    /// family is loaded into a relationship store.
    pub fn add_relationship(&mut self, row: Relationship) -> Result<(), StoreError> {
        self.check_family(row.family_id)?;
        if self.relationships.contains_key(&row.id) {
            return Err(StoreError::InvalidData(format!("Duplicate relationship id: {}", row.id)));
        }
        for end in [row.edge.source, row.edge.target] {
            match self.members.get(&end) {
                Some(member) if member.family_id == row.family_id => {}
                Some(_) => {
                    return Err(StoreError::InvalidData(format!(
                        "Relationship {} links member {} from another family",
                        row.id, end
                    )))
                }
                None => {
                    return Err(StoreError::InvalidData(format!(
                        "Relationship {} references unknown member {}",
                        row.id, end
                    )))
                }
            }
        }
        self.relationships.insert(row.id, row);
        Ok(())
    }

    /// Persist a change set: delete removed rows, then insert added rows
    ///
    /// If an added row is rejected, the repository is left as it was.
    pub fn apply_changes(&mut self, changes: &EdgeChanges) -> Result<(), StoreError> {
        let mut removed = Vec::with_capacity(changes.removed.len());
        for row in &changes.removed {
            match self.relationships.remove(&row.id) {
                Some(stored) => removed.push(stored),
                None => {
                    tracing::warn!(relationship = %row.id, "Removed relationship was not stored")
                }
            }
        }

        for (i, row) in changes.added.iter().enumerate() {
            if let Err(err) = self.add_relationship(*row) {
                for added in &changes.added[..i] {
                    self.relationships.remove(&added.id);
                }
                for stored in removed {
                    self.relationships.insert(stored.id, stored);
                }
                tracing::debug!(relationship = %row.id, error = %err, "Rejected edge changes");
                return Err(err);
            }
        }

        tracing::debug!(
            added = changes.added.len(),
            removed = changes.removed.len(),
            "Applied edge changes"
        );
        Ok(())
    }

    /// Registered families as `(id, name)`
    pub fn families(&self) -> impl Iterator<Item = (FamilyId, &str)> {
        self.families.iter().map(|(&id, name)| (id, name.as_str()))
    }

    /// Find a family by exact name
    pub fn family_by_name(&self, name: &str) -> Option<(FamilyId, &str)> {
        self.families().find(|(_, n)| *n == name)
    }

    /// Number of stored relationship rows across all families
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    fn check_family(&self, family: FamilyId) -> Result<(), StoreError> {
        if self.families.contains_key(&family) {
            Ok(())
        } else {
            Err(StoreError::InvalidData(format!("Unknown family: {}", family)))
        }
    }
}

impl FamilyRepository for InMemoryFamilyRepository {
    type Error = StoreError;

    fn member(&self, id: MemberId) -> Result<Option<Member>, Self::Error> {
        Ok(self.members.get(&id).cloned())
    }

    fn members_of_family(&self, family: FamilyId) -> Result<Vec<Member>, Self::Error> {
        self.check_family(family)?;
        let mut members: Vec<Member> = self
            .members
            .values()
            .filter(|m| m.family_id == family)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.id);
        Ok(members)
    }

    fn relationships_of_family(&self, family: FamilyId) -> Result<Vec<Relationship>, Self::Error> {
        self.check_family(family)?;
        Ok(self
            .relationships
            .values()
            .filter(|r| r.family_id == family)
            .copied()
            .collect())
    }

    fn relationship(&self, id: RelationshipId) -> Result<Option<Relationship>, Self::Error> {
        Ok(self.relationships.get(&id).copied())
    }
}
