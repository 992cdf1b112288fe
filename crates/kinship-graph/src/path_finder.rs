//! Bounded, deterministic path finding between two members

use crate::{RelationshipStore, Unreachable};
use kinship_domain::{MemberId, Path, TraversedEdge};
use std::collections::{HashMap, VecDeque};

/// Default traversal bound: enough generation hops for second cousins
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Finds the relationship path between two members
///
/// The graph is walked as undirected: every edge can be followed from either
/// end, and the step records the type as seen in the walking direction.
///
/// When several shortest paths exist, the result is the one whose steps are
/// smallest in order of (type priority, next member id), where blood relations
/// rank before marriage. The result does not depend on the order edges were
/// added in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathFinder {
    max_depth: usize,
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl PathFinder {
    /// Create a path finder with the given depth bound
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Depth bound in effect
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Find the path from `subject` to `target`
    pub fn find_path(
        &self,
        store: &RelationshipStore,
        subject: MemberId,
        target: MemberId,
    ) -> Result<Path, Unreachable> {
        find_path(store, subject, target, self.max_depth)
    }
}

/// Find the path from `subject` to `target` using at most `max_depth` steps
///
/// Runs a breadth-first search outward from the target, stopping as soon as the
/// subject is reached, then walks greedily from the subject towards the target
/// choosing the smallest eligible step at each node. Both phases are O(V+E).
///
/// # Examples
///
/// ```
/// use kinship_domain::{Edge, FamilyId, MemberId, RelationshipType};
/// use kinship_graph::{find_path, RelationshipStore};
///
/// let (a, b, c) = (MemberId::from_value(1), MemberId::from_value(2), MemberId::from_value(3));
/// let mut store = RelationshipStore::new(FamilyId::from_value(1));
/// store.add_edge(Edge::new(a, b, RelationshipType::Father)).unwrap();
/// store.add_edge(Edge::new(b, c, RelationshipType::Father)).unwrap();
///
/// let path = find_path(&store, c, a, 4).unwrap();
/// assert_eq!(path.pattern().to_string(), "[Child, Child]");
/// ```
pub fn find_path(
    store: &RelationshipStore,
    subject: MemberId,
    target: MemberId,
    max_depth: usize,
) -> Result<Path, Unreachable> {
    if subject == target {
        return Ok(Path::new(subject));
    }

    let unreachable = Unreachable {
        subject,
        target,
        max_depth,
    };

    let distances = distances_to(store, target, subject, max_depth);
    let Some(&total) = distances.get(&subject) else {
        tracing::debug!(%subject, %target, max_depth, "No path within depth bound");
        return Err(unreachable);
    };

    let mut path = Path::new(subject);
    let mut current = subject;
    for remaining in (1..=total).rev() {
        let step = store
            .edges_of(current)
            .filter_map(|row| row.edge.traverse_from(current))
            .filter(|step| distances.get(&step.to) == Some(&(remaining - 1)))
            .min_by_key(step_order);

        let Some(step) = step else {
            // Distances came from the same store, so a closer neighbour exists
            tracing::warn!(%current, remaining, "Lost the shortest path while walking back");
            return Err(unreachable);
        };
        if let Err(e) = path.push(step) {
            tracing::warn!(error = %e, "Discontinuous step while building path");
            return Err(unreachable);
        }
        current = step.to;
    }

    tracing::trace!(%subject, %target, pattern = %path.pattern(), "Path found");
    Ok(path)
}

/// Ordering key for candidate steps: type priority, then member ids
fn step_order(step: &TraversedEdge) -> (u8, MemberId, MemberId, MemberId, u8) {
    (
        step.kind.traversal_priority(),
        step.to,
        step.stored.source,
        step.stored.target,
        step.stored.kind.traversal_priority(),
    )
}

/// Hop distances to `target`, bounded by `max_depth`
///
/// Stops once `subject` is discovered. At that point every member closer to the
/// target than the subject already has its final distance.
fn distances_to(
    store: &RelationshipStore,
    target: MemberId,
    subject: MemberId,
    max_depth: usize,
) -> HashMap<MemberId, usize> {
    let mut distances = HashMap::from([(target, 0usize)]);
    let mut queue = VecDeque::from([target]);

    while let Some(node) = queue.pop_front() {
        let depth = distances[&node];
        if depth >= max_depth {
            continue;
        }
        for row in store.edges_of(node) {
            let Some(next) = row.edge.other_end(node) else {
                continue;
            };
            if distances.contains_key(&next) {
                continue;
            }
            distances.insert(next, depth + 1);
            if next == subject {
                return distances;
            }
            queue.push_back(next);
        }
    }

    distances
}
