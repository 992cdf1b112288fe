//! Multi-edge relationship updates over a loaded family graph

use crate::{KinshipError, RelationshipPolicy, ValidationError};
use kinship_domain::{
    Edge, EdgeChanges, Gender, MemberId, MemberLookup, Relationship, RelationshipId,
    RelationshipType,
};
use kinship_graph::{NotFound, RelationshipStore};
use std::collections::{HashSet, VecDeque};

/// Requested relatives for one member; `None` leaves a slot untouched
///
/// # Examples
///
/// ```
/// use kinship_domain::{MemberId, RelationshipType};
/// use kinship_service::RelationshipUpdate;
///
/// let update = RelationshipUpdate::new()
///     .father(MemberId::from_value(1))
///     .wife(MemberId::from_value(2));
/// let slots: Vec<_> = update.slots().collect();
/// assert_eq!(slots[0].0, RelationshipType::Father);
/// assert_eq!(slots.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationshipUpdate {
    /// Member's father
    pub father: Option<MemberId>,
    /// Member's mother
    pub mother: Option<MemberId>,
    /// Member's husband
    pub husband: Option<MemberId>,
    /// Member's wife
    pub wife: Option<MemberId>,
}

impl RelationshipUpdate {
    /// An update that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the father slot
    pub fn father(mut self, id: MemberId) -> Self {
        self.father = Some(id);
        self
    }

    /// Set the mother slot
    pub fn mother(mut self, id: MemberId) -> Self {
        self.mother = Some(id);
        self
    }

    /// Set the husband slot
    pub fn husband(mut self, id: MemberId) -> Self {
        self.husband = Some(id);
        self
    }

    /// Set the wife slot
    pub fn wife(mut self, id: MemberId) -> Self {
        self.wife = Some(id);
        self
    }

    /// Filled slots as `(type, relative)`, in father, mother, husband, wife order
    pub fn slots(&self) -> impl Iterator<Item = (RelationshipType, MemberId)> {
        [
            (RelationshipType::Father, self.father),
            (RelationshipType::Mother, self.mother),
            (RelationshipType::Husband, self.husband),
            (RelationshipType::Wife, self.wife),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, id)))
    }

    /// Whether no slot is filled
    pub fn is_empty(&self) -> bool {
        self.slots().next().is_none()
    }
}

/// Edge removals and additions for one slot
struct SlotPlan {
    remove: Vec<Edge>,
    add: Edge,
}

/// Applies relationship changes for members of one loaded family
///
/// Every slot of an update is validated before the store is touched. If an
/// edge still fails to apply, the edges already changed are restored, so the
/// store is unchanged whenever an error is returned.
pub struct MemberRelationshipService<'a, L: MemberLookup + ?Sized> {
    store: &'a mut RelationshipStore,
    members: &'a L,
    policy: RelationshipPolicy,
}

impl<'a, L: MemberLookup + ?Sized> MemberRelationshipService<'a, L> {
    /// Create a service over a store and the members of its family
    pub fn new(store: &'a mut RelationshipStore, members: &'a L) -> Self {
        Self::with_policy(store, members, RelationshipPolicy::default())
    }

    /// Create a service with a specific validation policy
    pub fn with_policy(
        store: &'a mut RelationshipStore,
        members: &'a L,
        policy: RelationshipPolicy,
    ) -> Self {
        Self {
            store,
            members,
            policy,
        }
    }

    /// Set the father, mother, husband and wife of `member`
    ///
    /// A slot already held by the requested relative is left alone. A slot
    /// held by someone else has its edges removed before the new edge is
    /// added. Father `F` is stored as `(F, member, Father)`, mother `M` as
    /// `(M, member, Mother)`, husband `H` as `(H, member, Husband)` and wife
    /// `W` as `(W, member, Wife)`.
    pub fn update_relationships(
        &mut self,
        member: MemberId,
        update: &RelationshipUpdate,
    ) -> Result<EdgeChanges, KinshipError> {
        self.check_member(member)?;

        let mut plans = Vec::new();
        for (kind, relative) in update.slots() {
            self.validate_slot(member, kind, relative)?;
            if let Some(plan) = self.plan_slot(member, kind, relative) {
                plans.push(plan);
            }
        }

        let mut changes = EdgeChanges::new();
        for plan in plans {
            if let Err(err) = self.apply(plan, &mut changes) {
                self.rollback(&changes);
                tracing::debug!(member = %member, error = %err, "Relationship update rolled back");
                return Err(err.into());
            }
        }

        tracing::debug!(
            member = %member,
            added = changes.added.len(),
            removed = changes.removed.len(),
            "Updated member relationships"
        );
        Ok(changes)
    }

    /// Remove a member's edges in both directions
    pub fn remove_member(&mut self, member: MemberId) -> EdgeChanges {
        let removed = self.store.remove_member(member);
        tracing::debug!(member = %member, removed = removed.len(), "Removed member relationships");
        EdgeChanges {
            added: Vec::new(),
            removed,
        }
    }

    /// Remove a single relationship row
    pub fn remove_relationship(&mut self, id: RelationshipId) -> Result<EdgeChanges, NotFound> {
        let row = self.store.remove_relationship(id)?;
        tracing::debug!(relationship = %id, edge = %row.edge, "Removed relationship");
        Ok(EdgeChanges {
            added: Vec::new(),
            removed: vec![row],
        })
    }

    fn check_member(&self, member: MemberId) -> Result<(), ValidationError> {
        let record = self
            .members
            .member(member)
            .ok_or(ValidationError::MemberNotFound(member))?;
        if record.family_id != self.store.family_id() {
            return Err(ValidationError::CrossFamily {
                member,
                expected: self.store.family_id(),
                found: record.family_id,
            });
        }
        Ok(())
    }

    fn validate_slot(
        &self,
        member: MemberId,
        kind: RelationshipType,
        relative: MemberId,
    ) -> Result<(), ValidationError> {
        if relative == member {
            return Err(ValidationError::SelfReference(kind));
        }
        self.check_member(relative)?;

        if self.policy.require_parent_gender {
            let gender = self.members.gender(relative).unwrap_or_default();
            let expected = match kind {
                RelationshipType::Father | RelationshipType::Husband => Gender::Male,
                _ => Gender::Female,
            };
            if gender != Gender::Unknown && gender != expected {
                return Err(ValidationError::GenderMismatch {
                    member: relative,
                    kind,
                    gender,
                });
            }
        }

        if self.policy.forbid_ancestry_cycles
            && kind.is_parent()
            && self.is_descendant(relative, member)
        {
            return Err(ValidationError::AncestryCycle {
                parent: relative,
                child: member,
                kind,
            });
        }

        Ok(())
    }

    /// Work out what a slot needs; `None` when it already holds `relative`
    fn plan_slot(
        &self,
        member: MemberId,
        kind: RelationshipType,
        relative: MemberId,
    ) -> Option<SlotPlan> {
        let current: Vec<Edge> = if kind.is_parent() {
            self.store
                .parent_of(member, kind)
                .map(|parent| Edge::new(parent, member, kind))
                .into_iter()
                .collect()
        } else {
            self.spouse_edges(member, kind)
        };

        if current.iter().any(|edge| edge.other_end(member) == Some(relative)) {
            return None;
        }

        Some(SlotPlan {
            remove: current,
            add: Edge::new(relative, member, kind),
        })
    }

    /// Edges recording a spouse of `member` in the given slot, in either direction
    fn spouse_edges(&self, member: MemberId, slot: RelationshipType) -> Vec<Edge> {
        let Some(reverse) = slot.inverse() else {
            return Vec::new();
        };
        self.store
            .edges_of(member)
            .map(|row| row.edge)
            .filter(|edge| {
                (edge.kind == slot && edge.target == member)
                    || (edge.kind == reverse && edge.source == member)
            })
            .collect()
    }

    /// Whether `candidate` is reachable from `ancestor` through child links
    fn is_descendant(&self, candidate: MemberId, ancestor: MemberId) -> bool {
        let mut seen = HashSet::from([ancestor]);
        let mut queue = VecDeque::from([ancestor]);

        while let Some(current) = queue.pop_front() {
            for child in self.store.children_of(current) {
                if child == candidate {
                    return true;
                }
                if seen.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        false
    }

    fn apply(
        &mut self,
        plan: SlotPlan,
        changes: &mut EdgeChanges,
    ) -> Result<(), kinship_graph::InvariantViolation> {
        for edge in &plan.remove {
            if let Ok(row) = self.store.remove_edge(edge) {
                changes.removed.push(row);
            }
        }
        let id = self.store.add_edge(plan.add)?;
        changes
            .added
            .push(Relationship::new(id, self.store.family_id(), plan.add));
        Ok(())
    }

    fn rollback(&mut self, changes: &EdgeChanges) {
        for row in &changes.added {
            if let Err(err) = self.store.remove_relationship(row.id) {
                tracing::error!(relationship = %row.id, error = %err, "Failed to undo added relationship during rollback");
            }
        }
        for row in &changes.removed {
            if let Err(err) = self.store.insert(*row) {
                tracing::error!(relationship = %row.id, error = %err, "Failed to restore relationship during rollback");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_domain::{FamilyId, Member, MemberDirectory};
    use kinship_graph::InvariantViolation;

    use RelationshipType::{Father, Husband, Mother, Wife};

    fn id(n: u128) -> MemberId {
        MemberId::from_value(n)
    }

    fn family() -> FamilyId {
        FamilyId::from_value(1)
    }

    /// Members 1-8; odd ids male, even ids female. Member 99 is in another family.
    fn members() -> MemberDirectory {
        let mut members = MemberDirectory::from_members((1..=8).map(|n| {
            let gender = if n % 2 == 1 { Gender::Male } else { Gender::Female };
            Member::new(id(n), family(), gender)
        }));
        members.insert(Member::new(id(99), FamilyId::from_value(2), Gender::Male));
        members
    }

    fn edges(store: &RelationshipStore) -> Vec<Edge> {
        let mut edges: Vec<Edge> = store.edges_of_family().map(|r| r.edge).collect();
        edges.sort_by_key(|e| (e.source, e.target, e.kind.traversal_priority()));
        edges
    }

    #[test]
    fn test_set_all_slots() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        let mut service = MemberRelationshipService::new(&mut store, &members);

        let update = RelationshipUpdate::new()
            .father(id(1))
            .mother(id(2))
            .wife(id(4));
        let changes = service.update_relationships(id(3), &update).unwrap();

        assert_eq!(changes.added.len(), 3);
        assert!(changes.removed.is_empty());
        assert!(store.contains(&Edge::new(id(1), id(3), Father)));
        assert!(store.contains(&Edge::new(id(2), id(3), Mother)));
        assert!(store.contains(&Edge::new(id(4), id(3), Wife)));
    }

    #[test]
    fn test_replace_father() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        store.add_edge(Edge::new(id(1), id(3), Father)).unwrap();

        let mut service = MemberRelationshipService::new(&mut store, &members);
        let changes = service
            .update_relationships(id(3), &RelationshipUpdate::new().father(id(5)))
            .unwrap();

        assert_eq!(changes.removed.len(), 1);
        assert_eq!(changes.removed[0].edge, Edge::new(id(1), id(3), Father));
        assert_eq!(changes.added.len(), 1);
        assert_eq!(store.father_of(id(3)), Some(id(5)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_same_relative_is_noop() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        store.add_edge(Edge::new(id(1), id(3), Father)).unwrap();
        let before = edges(&store);

        let mut service = MemberRelationshipService::new(&mut store, &members);
        let changes = service
            .update_relationships(id(3), &RelationshipUpdate::new().father(id(1)))
            .unwrap();

        assert!(changes.is_empty());
        assert_eq!(edges(&store), before);
    }

    #[test]
    fn test_spouse_recorded_from_other_side_counts() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        // 3 is husband of 4, stored from 3's side
        store.add_edge(Edge::new(id(3), id(4), Husband)).unwrap();

        let mut service = MemberRelationshipService::new(&mut store, &members);
        let changes = service
            .update_relationships(id(3), &RelationshipUpdate::new().wife(id(4)))
            .unwrap();
        assert!(changes.is_empty());

        // replacing the wife removes the edge stored from the other side
        let changes = service
            .update_relationships(id(3), &RelationshipUpdate::new().wife(id(6)))
            .unwrap();
        assert_eq!(changes.removed[0].edge, Edge::new(id(3), id(4), Husband));
        assert_eq!(changes.added[0].edge, Edge::new(id(6), id(3), Wife));
        assert_eq!(store.spouses_of(id(3)), vec![id(6)]);
    }

    #[test]
    fn test_validation_errors() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        let mut service = MemberRelationshipService::new(&mut store, &members);

        let err = service
            .update_relationships(id(3), &RelationshipUpdate::new().father(id(3)))
            .unwrap_err();
        assert!(matches!(
            err,
            KinshipError::Validation(ValidationError::SelfReference(Father))
        ));

        let err = service
            .update_relationships(id(3), &RelationshipUpdate::new().father(id(50)))
            .unwrap_err();
        assert!(matches!(
            err,
            KinshipError::Validation(ValidationError::MemberNotFound(_))
        ));

        let err = service
            .update_relationships(id(3), &RelationshipUpdate::new().father(id(99)))
            .unwrap_err();
        assert!(matches!(
            err,
            KinshipError::Validation(ValidationError::CrossFamily { .. })
        ));

        let err = service
            .update_relationships(id(50), &RelationshipUpdate::new().father(id(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            KinshipError::Validation(ValidationError::MemberNotFound(_))
        ));
    }

    #[test]
    fn test_failed_slot_leaves_store_unchanged() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        store.add_edge(Edge::new(id(1), id(3), Father)).unwrap();
        let before = edges(&store);

        let mut service = MemberRelationshipService::new(&mut store, &members);
        // father is valid, husband is the member themself
        let update = RelationshipUpdate::new().father(id(5)).husband(id(3));
        assert!(service.update_relationships(id(3), &update).is_err());

        assert_eq!(edges(&store), before);
    }

    #[test]
    fn test_apply_failure_rolls_back() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        store.add_edge(Edge::new(id(1), id(3), Father)).unwrap();
        store.add_edge(Edge::new(id(4), id(3), Wife)).unwrap();
        let before = edges(&store);

        let mut service = MemberRelationshipService::new(&mut store, &members);
        let mut changes = EdgeChanges::new();
        service
            .apply(
                SlotPlan {
                    remove: vec![Edge::new(id(4), id(3), Wife)],
                    add: Edge::new(id(6), id(3), Wife),
                },
                &mut changes,
            )
            .unwrap();

        // the second slot removes the father, then fails to add
        let plan = SlotPlan {
            remove: vec![Edge::new(id(1), id(3), Father)],
            add: Edge::new(id(3), id(3), Father),
        };
        let err = service.apply(plan, &mut changes).unwrap_err();
        assert!(matches!(err, InvariantViolation::SelfLoop { .. }));
        service.rollback(&changes);

        assert_eq!(edges(&store), before);
    }

    #[test]
    fn test_rollback_skips_rows_already_gone() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        store.add_edge(Edge::new(id(1), id(3), Father)).unwrap();
        let before = edges(&store);

        let removed = store.remove_edge(&Edge::new(id(1), id(3), Father)).unwrap();
        let changes = EdgeChanges {
            added: vec![Relationship::new(
                RelationshipId::from_value(99),
                family(),
                Edge::new(id(2), id(3), Mother),
            )],
            removed: vec![removed],
        };

        let mut service = MemberRelationshipService::new(&mut store, &members);
        service.rollback(&changes);

        assert_eq!(edges(&store), before);
    }

    #[test]
    fn test_ancestry_cycle_rejected_by_default() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        store.add_edge(Edge::new(id(1), id(3), Father)).unwrap();
        store.add_edge(Edge::new(id(3), id(5), Father)).unwrap();

        let mut service = MemberRelationshipService::new(&mut store, &members);
        let err = service
            .update_relationships(id(1), &RelationshipUpdate::new().father(id(5)))
            .unwrap_err();
        assert!(matches!(
            err,
            KinshipError::Validation(ValidationError::AncestryCycle { .. })
        ));

        let policy = RelationshipPolicy {
            forbid_ancestry_cycles: false,
            require_parent_gender: false,
        };
        let mut lenient = MemberRelationshipService::with_policy(&mut store, &members, policy);
        assert!(lenient
            .update_relationships(id(1), &RelationshipUpdate::new().father(id(5)))
            .is_ok());
    }

    #[test]
    fn test_gender_policy() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        let policy = RelationshipPolicy {
            forbid_ancestry_cycles: true,
            require_parent_gender: true,
        };
        let mut service = MemberRelationshipService::with_policy(&mut store, &members, policy);

        let err = service
            .update_relationships(id(3), &RelationshipUpdate::new().father(id(2)))
            .unwrap_err();
        assert!(matches!(
            err,
            KinshipError::Validation(ValidationError::GenderMismatch { .. })
        ));
        assert!(service
            .update_relationships(id(3), &RelationshipUpdate::new().mother(id(2)))
            .is_ok());
    }

    #[test]
    fn test_remove_member_and_relationship() {
        let members = members();
        let mut store = RelationshipStore::new(family());
        store.add_edge(Edge::new(id(1), id(3), Father)).unwrap();
        store.add_edge(Edge::new(id(2), id(3), Mother)).unwrap();
        let husband = store.add_edge(Edge::new(id(1), id(2), Husband)).unwrap();

        let mut service = MemberRelationshipService::new(&mut store, &members);
        let changes = service.remove_relationship(husband).unwrap();
        assert_eq!(changes.removed.len(), 1);
        assert!(service.remove_relationship(husband).is_err());

        let changes = service.remove_member(id(3));
        assert_eq!(changes.removed.len(), 2);
        assert!(store.is_empty());
    }
}
