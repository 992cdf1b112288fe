//! An opened family file and the family being worked on.

use crate::error::{CliError, Result};
use kinship_domain::{
    EdgeChanges, FamilyId, FamilyRepository, Member, MemberDirectory, MemberId,
};
use kinship_service::{KinshipConfig, KinshipService};
use kinship_store::InMemoryFamilyRepository;
use std::path::Path;

/// Kinship service over a loaded family file, scoped to one family.
pub struct Session {
    service: KinshipService<InMemoryFamilyRepository>,
    family: FamilyId,
}

impl Session {
    /// Load `file` and select a family by name or id.
    ///
    /// Without a selector the file must contain exactly one family.
    pub fn open(file: &Path, family: Option<&str>, config: KinshipConfig) -> Result<Self> {
        let repo = InMemoryFamilyRepository::load(file)?;
        let family = select_family(&repo, family)?;
        let service = KinshipService::new(repo, config)?;
        Ok(Self { service, family })
    }

    /// The kinship service.
    pub fn service(&self) -> &KinshipService<InMemoryFamilyRepository> {
        &self.service
    }

    /// The selected family.
    pub fn family(&self) -> FamilyId {
        self.family
    }

    /// Members of the selected family.
    pub fn members(&self) -> Result<MemberDirectory> {
        let members = self.service.repository().members_of_family(self.family)?;
        Ok(MemberDirectory::from_members(members))
    }

    /// Find a member of the selected family by id or exact display name.
    pub fn resolve_member(&self, reference: &str) -> Result<Member> {
        let members = self.service.repository().members_of_family(self.family)?;

        if let Ok(id) = reference.parse::<MemberId>() {
            return members
                .into_iter()
                .find(|m| m.id == id)
                .ok_or_else(|| CliError::InvalidInput(format!("No member {} in this family", id)));
        }

        let mut matches = members
            .into_iter()
            .filter(|m| m.display_name.as_deref() == Some(reference));
        match (matches.next(), matches.next()) {
            (Some(member), None) => Ok(member),
            (Some(_), Some(_)) => Err(CliError::InvalidInput(format!(
                "Several members are named '{}'; use an id",
                reference
            ))),
            (None, _) => Err(CliError::InvalidInput(format!(
                "No member named '{}'",
                reference
            ))),
        }
    }

    /// Write a change set to the repository and save the file.
    pub fn persist(&mut self, changes: &EdgeChanges) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let repo = self.service.repository_mut();
        repo.apply_changes(changes)?;
        repo.save()?;
        Ok(())
    }
}

fn select_family(repo: &InMemoryFamilyRepository, selector: Option<&str>) -> Result<FamilyId> {
    match selector {
        Some(selector) => {
            if let Ok(id) = selector.parse::<FamilyId>() {
                if repo.families().any(|(family, _)| family == id) {
                    return Ok(id);
                }
            }
            repo.family_by_name(selector)
                .map(|(id, _)| id)
                .ok_or_else(|| CliError::InvalidInput(format!("No family '{}' in the file", selector)))
        }
        None => {
            let families: Vec<FamilyId> = repo.families().map(|(id, _)| id).collect();
            match families.as_slice() {
                [only] => Ok(*only),
                [] => Err(CliError::InvalidInput("The file has no families".to_string())),
                _ => Err(CliError::InvalidInput(format!(
                    "The file has {} families; choose one with --family",
                    families.len()
                ))),
            }
        }
    }
}
