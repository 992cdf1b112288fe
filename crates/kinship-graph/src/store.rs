//! In-memory adjacency store for one family's relationships

use crate::{InvariantViolation, NotFound};
use kinship_domain::{Edge, FamilyId, MemberId, Relationship, RelationshipId, RelationshipType};
use std::collections::HashMap;

/// All relationship edges of one family, with invariant-checked mutation
///
/// Edges live in an arena of slots. Each member maps to the slot indices of
/// its incident edges, so lookups never chase references and removing an edge
/// only touches the two incident lists.
///
/// Invariants held at all times:
/// - at most one incoming `Father` and one incoming `Mother` edge per member
/// - no self-loops
/// - no duplicate `(source, target, kind)` edges
/// - only stored relationship types (never `Child`)
///
/// A store belongs to one unit of work. It is rebuilt from storage for every
/// operation and is never shared across concurrent mutations.
///
/// # Examples
///
/// ```
/// use kinship_domain::{Edge, FamilyId, MemberId, RelationshipType};
/// use kinship_graph::RelationshipStore;
///
/// let mut store = RelationshipStore::new(FamilyId::from_value(1));
/// let father = MemberId::from_value(1);
/// let child = MemberId::from_value(2);
///
/// store.add_edge(Edge::new(father, child, RelationshipType::Father)).unwrap();
/// assert_eq!(store.father_of(child), Some(father));
/// ```
#[derive(Debug, Clone)]
pub struct RelationshipStore {
    family_id: FamilyId,
    slots: Vec<Option<Relationship>>,
    free: Vec<usize>,
    by_id: HashMap<RelationshipId, usize>,
    by_edge: HashMap<Edge, usize>,
    incident: HashMap<MemberId, Vec<usize>>,
}

impl RelationshipStore {
    /// Create an empty store for a family
    pub fn new(family_id: FamilyId) -> Self {
        Self {
            family_id,
            slots: Vec::new(),
            free: Vec::new(),
            by_id: HashMap::new(),
            by_edge: HashMap::new(),
            incident: HashMap::new(),
        }
    }

    /// Build a store from persisted rows
    ///
    /// Fails on the first row that violates an invariant; stored data that
    /// does so is corrupt.
    pub fn from_relationships(
        family_id: FamilyId,
        rows: impl IntoIterator<Item = Relationship>,
    ) -> Result<Self, InvariantViolation> {
        let mut store = Self::new(family_id);
        for row in rows {
            store.insert(row)?;
        }
        tracing::debug!(family = %family_id, edges = store.len(), "Loaded relationship store");
        Ok(store)
    }

    /// Family this store holds
    pub fn family_id(&self) -> FamilyId {
        self.family_id
    }

    /// Number of stored edges
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the store has no edges
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Check whether an edge could be added without breaking an invariant
    pub fn check_edge(&self, edge: &Edge) -> Result<(), InvariantViolation> {
        if !edge.kind.is_stored() {
            return Err(InvariantViolation::NotStorable(edge.kind));
        }
        if edge.source == edge.target {
            return Err(InvariantViolation::SelfLoop { member: edge.source });
        }
        if self.by_edge.contains_key(edge) {
            return Err(InvariantViolation::DuplicateEdge(*edge));
        }
        if edge.kind.is_parent() {
            if let Some(existing) = self.parent_of(edge.target, edge.kind) {
                return Err(InvariantViolation::DuplicateParent {
                    member: edge.target,
                    kind: edge.kind,
                    existing,
                });
            }
        }
        Ok(())
    }

    /// Add a new edge, assigning it a fresh relationship id
    ///
    /// A second `Father`/`Mother` for the same member is rejected; remove the
    /// existing one first or use the relationship service's replace operation.
    pub fn add_edge(&mut self, edge: Edge) -> Result<RelationshipId, InvariantViolation> {
        let id = RelationshipId::new();
        self.insert(Relationship::new(id, self.family_id, edge))?;
        Ok(id)
    }

    /// Insert a row that already carries an id (bulk load, rollback)
    pub fn insert(&mut self, row: Relationship) -> Result<(), InvariantViolation> {
        if row.family_id != self.family_id {
            return Err(InvariantViolation::ForeignFamily {
                id: row.id,
                expected: self.family_id,
                found: row.family_id,
            });
        }
        if self.by_id.contains_key(&row.id) {
            return Err(InvariantViolation::DuplicateId(row.id));
        }
        self.check_edge(&row.edge)?;

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(row);
                slot
            }
            None => {
                self.slots.push(Some(row));
                self.slots.len() - 1
            }
        };

        self.by_id.insert(row.id, slot);
        self.by_edge.insert(row.edge, slot);
        self.incident.entry(row.edge.source).or_default().push(slot);
        self.incident.entry(row.edge.target).or_default().push(slot);

        tracing::trace!(edge = %row.edge, id = %row.id, "Edge added");
        Ok(())
    }

    /// Remove an edge by value
    pub fn remove_edge(&mut self, edge: &Edge) -> Result<Relationship, NotFound> {
        let slot = *self.by_edge.get(edge).ok_or(NotFound::Edge(*edge))?;
        self.remove_slot(slot).ok_or(NotFound::Edge(*edge))
    }

    /// Remove an edge by relationship id
    pub fn remove_relationship(&mut self, id: RelationshipId) -> Result<Relationship, NotFound> {
        let slot = *self.by_id.get(&id).ok_or(NotFound::Relationship(id))?;
        self.remove_slot(slot).ok_or(NotFound::Relationship(id))
    }

    /// Remove every edge where the member is source or target
    ///
    /// Returns the removed rows, oldest slot first.
    pub fn remove_member(&mut self, member: MemberId) -> Vec<Relationship> {
        let mut slots = self.incident.get(&member).cloned().unwrap_or_default();
        slots.sort_unstable();

        let removed: Vec<Relationship> = slots
            .into_iter()
            .filter_map(|slot| self.remove_slot(slot))
            .collect();

        tracing::debug!(member = %member, removed = removed.len(), "Cascaded member removal");
        removed
    }

    fn remove_slot(&mut self, slot: usize) -> Option<Relationship> {
        let row = self.slots.get_mut(slot)?.take()?;

        self.by_id.remove(&row.id);
        self.by_edge.remove(&row.edge);
        for end in [row.edge.source, row.edge.target] {
            if let Some(list) = self.incident.get_mut(&end) {
                list.retain(|&s| s != slot);
                if list.is_empty() {
                    self.incident.remove(&end);
                }
            }
        }
        self.free.push(slot);

        tracing::trace!(edge = %row.edge, id = %row.id, "Edge removed");
        Some(row)
    }

    /// Get a row by id
    pub fn get(&self, id: RelationshipId) -> Option<&Relationship> {
        self.by_id.get(&id).and_then(|&slot| self.slots[slot].as_ref())
    }

    /// Get the row holding an edge
    pub fn find(&self, edge: &Edge) -> Option<&Relationship> {
        self.by_edge.get(edge).and_then(|&slot| self.slots[slot].as_ref())
    }

    /// Whether the edge is stored
    pub fn contains(&self, edge: &Edge) -> bool {
        self.by_edge.contains_key(edge)
    }

    /// Rows where the member is source or target
    pub fn edges_of(&self, member: MemberId) -> impl Iterator<Item = &Relationship> + '_ {
        self.incident
            .get(&member)
            .into_iter()
            .flatten()
            .filter_map(move |&slot| self.slots[slot].as_ref())
    }

    /// All rows of the family, in slot order
    pub fn edges_of_family(&self) -> impl Iterator<Item = &Relationship> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Members with at least one edge
    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.incident.keys().copied()
    }

    /// The member's parent of the given kind (`Father` or `Mother`)
    pub fn parent_of(&self, member: MemberId, kind: RelationshipType) -> Option<MemberId> {
        self.edges_of(member)
            .find(|r| r.edge.target == member && r.edge.kind == kind)
            .map(|r| r.edge.source)
    }

    /// The member's father
    pub fn father_of(&self, member: MemberId) -> Option<MemberId> {
        self.parent_of(member, RelationshipType::Father)
    }

    /// The member's mother
    pub fn mother_of(&self, member: MemberId) -> Option<MemberId> {
        self.parent_of(member, RelationshipType::Mother)
    }

    /// Both recorded parents
    pub fn parents_of(&self, member: MemberId) -> Vec<MemberId> {
        [self.father_of(member), self.mother_of(member)]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Members this member is a parent of, sorted by id
    pub fn children_of(&self, member: MemberId) -> Vec<MemberId> {
        let mut children: Vec<MemberId> = self
            .edges_of(member)
            .filter(|r| r.edge.source == member && r.edge.kind.is_parent())
            .map(|r| r.edge.target)
            .collect();
        children.sort_unstable();
        children
    }

    /// Spouses in either stored direction, sorted by id and deduplicated
    pub fn spouses_of(&self, member: MemberId) -> Vec<MemberId> {
        let mut spouses: Vec<MemberId> = self
            .edges_of(member)
            .filter(|r| r.edge.kind.is_spouse())
            .filter_map(|r| r.edge.other_end(member))
            .collect();
        spouses.sort_unstable();
        spouses.dedup();
        spouses
    }
}
