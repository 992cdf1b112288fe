//! Integration tests for kinship-service
//!
//! A small in-memory repository stands in for persistence; changes returned
//! by the service are written back to it between calls, the way a caller
//! would persist them.

use kinship_domain::{
    Edge, EdgeChanges, FamilyId, FamilyRepository, Gender, Member, MemberId, Pattern,
    Relationship, RelationshipId, RelationshipType,
};
use kinship_rules::{Condition, Rule, RuleTable};
use kinship_service::{
    KinshipConfig, KinshipError, KinshipService, RelationshipUpdate, Resolution, ValidationError,
};
use std::collections::HashMap;
use std::sync::Arc;

use RelationshipType::{Child, Father, Husband, Mother};

fn id(n: u128) -> MemberId {
    MemberId::from_value(n)
}

fn family() -> FamilyId {
    FamilyId::from_value(7)
}

#[derive(Default)]
struct MemoryRepo {
    members: HashMap<MemberId, Member>,
    rows: Vec<Relationship>,
    offline: bool,
}

impl MemoryRepo {
    fn add_member(&mut self, n: u128, gender: Gender) {
        self.members.insert(id(n), Member::new(id(n), family(), gender));
    }

    fn add_edge(&mut self, source: u128, target: u128, kind: RelationshipType) {
        self.rows.push(Relationship::new(
            RelationshipId::new(),
            family(),
            Edge::new(id(source), id(target), kind),
        ));
    }

    fn apply(&mut self, changes: &EdgeChanges) {
        self.rows.retain(|row| !changes.removed.iter().any(|r| r.id == row.id));
        self.rows.extend(changes.added.iter().copied());
    }

    fn edges(&self) -> Vec<Edge> {
        self.rows.iter().map(|r| r.edge).collect()
    }
}

impl FamilyRepository for MemoryRepo {
    type Error = String;

    fn member(&self, member: MemberId) -> Result<Option<Member>, String> {
        if self.offline {
            return Err("repository offline".to_string());
        }
        Ok(self.members.get(&member).cloned())
    }

    fn members_of_family(&self, family: FamilyId) -> Result<Vec<Member>, String> {
        if self.offline {
            return Err("repository offline".to_string());
        }
        Ok(self
            .members
            .values()
            .filter(|m| m.family_id == family)
            .cloned()
            .collect())
    }

    fn relationships_of_family(&self, family: FamilyId) -> Result<Vec<Relationship>, String> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.family_id == family)
            .copied()
            .collect())
    }

    fn relationship(&self, rid: RelationshipId) -> Result<Option<Relationship>, String> {
        Ok(self.rows.iter().find(|r| r.id == rid).copied())
    }
}

/// 1 (M) father of 2 (M) father of 3 (M); 4 (F) wife of 2; 5 (M) unconnected
fn three_generations() -> MemoryRepo {
    let mut repo = MemoryRepo::default();
    repo.add_member(1, Gender::Male);
    repo.add_member(2, Gender::Male);
    repo.add_member(3, Gender::Male);
    repo.add_member(4, Gender::Female);
    repo.add_member(5, Gender::Male);
    repo.add_edge(1, 2, Father);
    repo.add_edge(2, 3, Father);
    repo.add_edge(2, 4, Husband);
    repo.add_edge(4, 3, Mother);
    repo
}

fn service(repo: MemoryRepo) -> KinshipService<MemoryRepo> {
    KinshipService::new(repo, KinshipConfig::default()).unwrap()
}

#[test]
fn test_grandfather_label() {
    let service = service(three_generations());
    let kinship = service.compute_kinship_label(family(), id(3), id(1)).unwrap();

    assert_eq!(kinship.label, "paternal grandfather");
    assert_eq!(kinship.resolution, Resolution::Rule);
    assert_eq!(kinship.pattern, Pattern::new(vec![Child, Child]));
    assert_eq!(kinship.path.nodes(), &[id(3), id(2), id(1)]);
}

#[test]
fn test_gender_drives_label_with_custom_table() {
    let pattern = Pattern::new(vec![Child, Child]);
    let table = RuleTable::new(vec![
        Rule::new(pattern.clone(), Condition::target_gender(Gender::Male), "paternal grandfather"),
        Rule::new(pattern, Condition::target_gender(Gender::Female), "paternal grandmother"),
    ])
    .unwrap();

    let mut repo = three_generations();
    repo.add_member(1, Gender::Female);
    let service = KinshipService::with_rules(repo, KinshipConfig::default(), Arc::new(table));

    let kinship = service.compute_kinship_label(family(), id(3), id(1)).unwrap();
    assert_eq!(kinship.label, "paternal grandmother");
}

#[test]
fn test_label_is_deterministic() {
    let service = service(three_generations());
    let first = service.compute_kinship_label(family(), id(1), id(4)).unwrap();
    for _ in 0..5 {
        service.compute_kinship_label(family(), id(4), id(1)).unwrap();
        assert_eq!(service.compute_kinship_label(family(), id(1), id(4)).unwrap(), first);
    }
    assert_eq!(first.label, "daughter-in-law");
}

#[test]
fn test_fallback_description() {
    let table = RuleTable::new(Vec::new()).unwrap();
    let service =
        KinshipService::with_rules(three_generations(), KinshipConfig::default(), Arc::new(table));

    let kinship = service.compute_kinship_label(family(), id(3), id(1)).unwrap();
    assert_eq!(kinship.resolution, Resolution::Fallback);
    assert_eq!(kinship.label, "father's father");
}

#[test]
fn test_unreachable_member() {
    let service = service(three_generations());
    let err = service.compute_kinship_label(family(), id(3), id(5)).unwrap_err();
    assert!(matches!(err, KinshipError::Unreachable(u) if u.max_depth == 6));
}

#[test]
fn test_depth_bound_from_config() {
    let config = KinshipConfig {
        max_depth: 1,
        ..KinshipConfig::default()
    };
    let service = KinshipService::new(three_generations(), config).unwrap();
    assert!(service.find_path(family(), id(3), id(2)).is_ok());
    assert!(matches!(
        service.find_path(family(), id(3), id(1)),
        Err(KinshipError::Unreachable(_))
    ));
}

#[test]
fn test_unknown_and_foreign_members() {
    let mut repo = three_generations();
    repo.members.insert(
        id(50),
        Member::new(id(50), FamilyId::from_value(8), Gender::Male),
    );
    let service = service(repo);

    assert!(matches!(
        service.compute_kinship_label(family(), id(3), id(99)),
        Err(KinshipError::NotFound(_))
    ));
    assert!(matches!(
        service.compute_kinship_label(family(), id(3), id(50)),
        Err(KinshipError::Validation(ValidationError::CrossFamily { .. }))
    ));
}

#[test]
fn test_father_replacement() {
    let mut service = service(three_generations());
    service.repository_mut().add_member(6, Gender::Male);
    service.repository_mut().add_member(7, Gender::Male);

    let changes = service
        .update_member_relationships(id(5), &RelationshipUpdate::new().father(id(6)))
        .unwrap();
    service.repository_mut().apply(&changes);

    let changes = service
        .update_member_relationships(id(5), &RelationshipUpdate::new().father(id(7)))
        .unwrap();
    assert_eq!(changes.removed.len(), 1);
    service.repository_mut().apply(&changes);

    let fathers: Vec<Edge> = service
        .repository()
        .edges()
        .into_iter()
        .filter(|e| e.target == id(5) && e.kind == Father)
        .collect();
    assert_eq!(fathers, vec![Edge::new(id(7), id(5), Father)]);
}

#[test]
fn test_update_is_idempotent() {
    let mut service = service(three_generations());
    let update = RelationshipUpdate::new().father(id(1)).wife(id(4));

    let changes = service.update_member_relationships(id(5), &update).unwrap();
    assert_eq!(changes.added.len(), 2);
    service.repository_mut().apply(&changes);
    let before = service.repository().edges();

    let changes = service.update_member_relationships(id(5), &update).unwrap();
    assert!(changes.is_empty());
    service.repository_mut().apply(&changes);
    assert_eq!(service.repository().edges(), before);
}

#[test]
fn test_duplicate_parent_replaced_not_added() {
    let service = service(three_generations());
    // 3 already has father 2; asking for 1 replaces rather than failing
    let changes = service
        .update_member_relationships(id(3), &RelationshipUpdate::new().father(id(1)))
        .unwrap();
    assert_eq!(changes.removed[0].edge, Edge::new(id(2), id(3), Father));
    assert_eq!(changes.added[0].edge, Edge::new(id(1), id(3), Father));
}

#[test]
fn test_ancestry_cycle_is_rejected() {
    let service = service(three_generations());
    let err = service
        .update_member_relationships(id(1), &RelationshipUpdate::new().father(id(3)))
        .unwrap_err();
    assert!(matches!(
        err,
        KinshipError::Validation(ValidationError::AncestryCycle { .. })
    ));
}

#[test]
fn test_remove_member_cascades() {
    let mut service = service(three_generations());
    let changes = service.remove_member(id(2)).unwrap();
    assert_eq!(changes.removed.len(), 3);
    service.repository_mut().apply(&changes);

    let remaining = service.repository().edges();
    assert_eq!(remaining, vec![Edge::new(id(4), id(3), Mother)]);
    assert!(remaining.iter().all(|e| !e.involves(id(2))));
}

#[test]
fn test_remove_relationship() {
    let service = service(three_generations());
    let row = service.repository().rows[0];

    let changes = service.remove_relationship(row.id).unwrap();
    assert_eq!(changes.removed, vec![row]);

    assert!(matches!(
        service.remove_relationship(RelationshipId::from_value(1)),
        Err(KinshipError::NotFound(_))
    ));
}

#[test]
fn test_corrupt_rows_surface_as_invariant_violation() {
    let mut repo = three_generations();
    repo.add_edge(5, 3, Father);
    let service = service(repo);
    assert!(matches!(
        service.compute_kinship_label(family(), id(3), id(1)),
        Err(KinshipError::Invariant(_))
    ));
}

#[test]
fn test_repository_failure_is_storage_error() {
    let mut repo = three_generations();
    repo.offline = true;
    let service = service(repo);

    let err = service.compute_kinship_label(family(), id(3), id(1)).unwrap_err();
    assert_eq!(err.to_string(), "Storage error: repository offline");
}

#[test]
fn test_invalid_config_rejected() {
    let config = KinshipConfig {
        rules_locale: "xx".to_string(),
        ..KinshipConfig::default()
    };
    assert!(matches!(
        KinshipService::new(MemoryRepo::default(), config),
        Err(KinshipError::Config(_))
    ));
}

#[test]
fn test_rules_path_overrides_locale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    std::fs::write(
        &path,
        "[[rule]]\npattern = [\"Child\", \"Child\"]\nlabel = \"grandparent\"\n",
    )
    .unwrap();

    let config = KinshipConfig {
        rules_path: Some(path),
        ..KinshipConfig::default()
    };
    let service = KinshipService::new(three_generations(), config).unwrap();
    let kinship = service.compute_kinship_label(family(), id(3), id(1)).unwrap();
    assert_eq!(kinship.label, "grandparent");
}
