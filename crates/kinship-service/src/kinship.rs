//! Caller-facing kinship operations over a family repository

use crate::{
    KinshipConfig, KinshipError, MemberRelationshipService, RelationshipUpdate, ValidationError,
};
use kinship_domain::{
    EdgeChanges, FamilyId, FamilyRepository, MemberDirectory, MemberId, Path, Pattern,
    RelationshipId,
};
use kinship_graph::{NotFound, PathFinder, RelationshipStore};
use kinship_rules::{describe_path, KinshipRuleEngine, RuleTable};
use std::fmt::Display;
use std::sync::Arc;

/// How a kinship label was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A rule in the table matched
    Rule,

    /// No rule matched; the label is a generic step-by-step description
    Fallback,
}

/// Result of a kinship computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kinship {
    /// What the target is to the subject
    pub label: String,

    /// Rule match or fallback description
    pub resolution: Resolution,

    /// Shape of the path the label was derived from
    pub pattern: Pattern,

    /// Path from subject to target
    pub path: Path,
}

/// Kinship labels and relationship maintenance over a [`FamilyRepository`]
///
/// Every operation loads a fresh snapshot of the family, works on it, and
/// returns the result. Nothing is written back: mutations return the
/// [`EdgeChanges`] the caller must persist.
///
/// # Examples
///
/// ```ignore
/// let service = KinshipService::new(repository, KinshipConfig::default())?;
/// let kinship = service.compute_kinship_label(family, grandson, grandfather)?;
/// assert_eq!(kinship.label, "paternal grandfather");
/// ```
pub struct KinshipService<R> {
    repo: R,
    config: KinshipConfig,
    finder: PathFinder,
    engine: KinshipRuleEngine,
}

impl<R> KinshipService<R>
where
    R: FamilyRepository,
    R::Error: Display,
{
    /// Create a service, loading the rule table the configuration names
    pub fn new(repo: R, config: KinshipConfig) -> Result<Self, KinshipError> {
        config.validate().map_err(KinshipError::Config)?;
        let table = match &config.rules_path {
            Some(path) => RuleTable::from_file(path)?,
            None => RuleTable::builtin(&config.rules_locale)?,
        };
        Ok(Self::with_rules(repo, config, Arc::new(table)))
    }

    /// Create a service with an already loaded rule table
    pub fn with_rules(repo: R, config: KinshipConfig, table: Arc<RuleTable>) -> Self {
        Self {
            finder: PathFinder::new(config.max_depth),
            engine: KinshipRuleEngine::new(table),
            repo,
            config,
        }
    }

    /// Underlying repository
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Underlying repository, mutably (to persist returned changes)
    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    /// Active configuration
    pub fn config(&self) -> &KinshipConfig {
        &self.config
    }

    /// Rule engine in use
    pub fn engine(&self) -> &KinshipRuleEngine {
        &self.engine
    }

    /// Load a family's members and build its relationship store
    pub fn load_family(
        &self,
        family: FamilyId,
    ) -> Result<(MemberDirectory, RelationshipStore), KinshipError> {
        let members = self.repo.members_of_family(family).map_err(storage)?;
        let rows = self.repo.relationships_of_family(family).map_err(storage)?;
        let store = RelationshipStore::from_relationships(family, rows).map_err(|err| {
            tracing::warn!(family = %family, error = %err, "Stored relationships are corrupt");
            err
        })?;
        Ok((MemberDirectory::from_members(members), store))
    }

    /// Path from `subject` to `target` within the family
    pub fn find_path(
        &self,
        family: FamilyId,
        subject: MemberId,
        target: MemberId,
    ) -> Result<Path, KinshipError> {
        let (members, store) = self.load_family(family)?;
        self.check_in_family(&members, family, subject)?;
        self.check_in_family(&members, family, target)?;
        Ok(self.finder.find_path(&store, subject, target)?)
    }

    /// What `target` is to `subject`, e.g. "paternal grandfather"
    ///
    /// Falls back to a generic description when no rule matches.
    pub fn compute_kinship_label(
        &self,
        family: FamilyId,
        subject: MemberId,
        target: MemberId,
    ) -> Result<Kinship, KinshipError> {
        let (members, store) = self.load_family(family)?;
        self.check_in_family(&members, family, subject)?;
        self.check_in_family(&members, family, target)?;

        let path = self.finder.find_path(&store, subject, target)?;
        let pattern = path.pattern();

        let (label, resolution) = match self.engine.resolve(&path, &members) {
            Some(label) => (label.to_string(), Resolution::Rule),
            None => {
                let label = describe_path(&path, &members);
                tracing::warn!(pattern = %pattern, fallback = %label, "No kinship rule matched");
                (label, Resolution::Fallback)
            }
        };

        tracing::debug!(subject = %subject, target = %target, label = %label, "Computed kinship");
        Ok(Kinship {
            label,
            resolution,
            pattern,
            path,
        })
    }

    /// Set a member's father, mother, husband and wife
    pub fn update_member_relationships(
        &self,
        member: MemberId,
        update: &RelationshipUpdate,
    ) -> Result<EdgeChanges, KinshipError> {
        let family = self.family_of(member)?;
        let (members, mut store) = self.load_family(family)?;
        MemberRelationshipService::with_policy(&mut store, &members, self.config.policy)
            .update_relationships(member, update)
    }

    /// Remove every relationship the member takes part in
    pub fn remove_member(&self, member: MemberId) -> Result<EdgeChanges, KinshipError> {
        let family = self.family_of(member)?;
        let (members, mut store) = self.load_family(family)?;
        Ok(MemberRelationshipService::with_policy(&mut store, &members, self.config.policy)
            .remove_member(member))
    }

    /// Remove one relationship row
    pub fn remove_relationship(&self, id: RelationshipId) -> Result<EdgeChanges, KinshipError> {
        let row = self
            .repo
            .relationship(id)
            .map_err(storage)?
            .ok_or(NotFound::Relationship(id))?;
        let (members, mut store) = self.load_family(row.family_id)?;
        Ok(MemberRelationshipService::with_policy(&mut store, &members, self.config.policy)
            .remove_relationship(id)?)
    }

    fn family_of(&self, member: MemberId) -> Result<FamilyId, KinshipError> {
        let record = self
            .repo
            .member(member)
            .map_err(storage)?
            .ok_or(NotFound::Member(member))?;
        Ok(record.family_id)
    }

    fn check_in_family(
        &self,
        members: &MemberDirectory,
        family: FamilyId,
        member: MemberId,
    ) -> Result<(), KinshipError> {
        if members.contains(member) {
            return Ok(());
        }
        match self.repo.member(member).map_err(storage)? {
            Some(record) => Err(ValidationError::CrossFamily {
                member,
                expected: family,
                found: record.family_id,
            }
            .into()),
            None => Err(NotFound::Member(member).into()),
        }
    }
}

fn storage<E: Display>(err: E) -> KinshipError {
    KinshipError::Storage(err.to_string())
}
