//! Integration tests for kinship-graph
//!
//! These tests build a three-generation family with a remarriage and check
//! loading, traversal and cascade behaviour end to end.

use kinship_domain::{
    Edge, FamilyId, MemberId, Pattern, Relationship, RelationshipId, RelationshipType,
};
use kinship_graph::{InvariantViolation, PathFinder, RelationshipStore};
use std::collections::HashSet;

use RelationshipType::{Child, Father, Husband, Mother, Wife};

const FAMILY: u128 = 42;

fn id(n: u128) -> MemberId {
    MemberId::from_value(n)
}

/// Rows for:
///
/// ```text
///   1 (grandfather) == 2 (grandmother)
///          |
///   3 (father) == 4 (mother)        3 == 9 (second wife)
///      |      \                         |
///   5 (son)   6 (daughter)          10 (half-brother)
///      |
///   7 (grandson)
/// ```
fn rows() -> Vec<Relationship> {
    let family = FamilyId::from_value(FAMILY);
    let edges = [
        (1, 2, Husband),
        (1, 3, Father),
        (2, 3, Mother),
        (3, 4, Husband),
        (3, 5, Father),
        (4, 5, Mother),
        (3, 6, Father),
        (4, 6, Mother),
        (5, 7, Father),
        (9, 3, Wife),
        (3, 10, Father),
        (9, 10, Mother),
    ];
    edges
        .iter()
        .enumerate()
        .map(|(i, &(s, t, k))| {
            Relationship::new(
                RelationshipId::from_value(100 + i as u128),
                family,
                Edge::new(id(s), id(t), k),
            )
        })
        .collect()
}

fn load() -> RelationshipStore {
    RelationshipStore::from_relationships(FamilyId::from_value(FAMILY), rows()).unwrap()
}

#[test]
fn test_bulk_load() {
    let store = load();
    assert_eq!(store.len(), 12);
    assert_eq!(store.father_of(id(5)), Some(id(3)));
    assert_eq!(store.mother_of(id(10)), Some(id(9)));
    assert_eq!(store.spouses_of(id(3)), vec![id(4), id(9)]);
    assert_eq!(store.children_of(id(3)), vec![id(5), id(6), id(10)]);
}

#[test]
fn test_bulk_load_rejects_corrupt_rows() {
    let mut corrupt = rows();
    corrupt.push(Relationship::new(
        RelationshipId::from_value(999),
        FamilyId::from_value(FAMILY),
        Edge::new(id(8), id(5), Father),
    ));

    let result = RelationshipStore::from_relationships(FamilyId::from_value(FAMILY), corrupt);
    assert!(matches!(
        result,
        Err(InvariantViolation::DuplicateParent { .. })
    ));
}

#[test]
fn test_grandson_to_grandfather() {
    let store = load();
    let path = PathFinder::default().find_path(&store, id(7), id(1)).unwrap();

    assert_eq!(path.nodes(), &[id(7), id(5), id(3), id(1)]);
    assert_eq!(path.pattern(), Pattern::new(vec![Child, Child, Child]));
}

#[test]
fn test_half_sibling_goes_through_shared_father() {
    let store = load();
    let path = PathFinder::default().find_path(&store, id(5), id(10)).unwrap();
    assert_eq!(path.pattern(), Pattern::new(vec![Child, Father]));
    assert_eq!(path.nodes()[1], id(3));
}

#[test]
fn test_stepmother_path() {
    let store = load();
    // 5 -> father 3 -> his other wife 9
    let path = PathFinder::default().find_path(&store, id(5), id(9)).unwrap();
    assert_eq!(path.pattern(), Pattern::new(vec![Child, Husband]));
}

#[test]
fn test_repeated_queries_are_deterministic() {
    let store = load();
    let finder = PathFinder::default();

    let first: Vec<_> = (1..=10)
        .flat_map(|s| (1..=10).map(move |t| (s, t)))
        .map(|(s, t)| finder.find_path(&store, id(s), id(t)).ok())
        .collect();

    for _ in 0..3 {
        let again: Vec<_> = (1..=10)
            .flat_map(|s| (1..=10).map(move |t| (s, t)))
            .map(|(s, t)| finder.find_path(&store, id(s), id(t)).ok())
            .collect();
        assert_eq!(first, again);
    }
}

#[test]
fn test_member_8_is_unreachable() {
    let store = load();
    assert!(PathFinder::default().find_path(&store, id(7), id(8)).is_err());
}

#[test]
fn test_cascade_removes_every_reference() {
    let mut store = load();
    let removed = store.remove_member(id(3));

    // 3 took part in 7 rows
    assert_eq!(removed.len(), 7);
    assert!(store.edges_of_family().all(|r| !r.edge.involves(id(3))));

    let remaining: HashSet<RelationshipId> = store.edges_of_family().map(|r| r.id).collect();
    for row in removed {
        assert!(!remaining.contains(&row.id));
    }

    // The grandson is now cut off from his grandfather
    assert!(PathFinder::default().find_path(&store, id(7), id(1)).is_err());
}
