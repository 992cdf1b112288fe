//! Rule resolution over walked paths

use crate::RuleTable;
use kinship_domain::{MemberLookup, Path};
use std::sync::Arc;

/// Maps a walked path to a kinship label using a shared rule table
///
/// The engine holds no state besides the table, so cloning it is cheap and
/// clones can resolve concurrently.
///
/// # Examples
///
/// ```
/// use kinship_domain::{Edge, FamilyId, Gender, Member, MemberDirectory, MemberId, Path, RelationshipType};
/// use kinship_rules::{KinshipRuleEngine, RuleTable};
///
/// let family = FamilyId::from_value(1);
/// let (dad, kid) = (MemberId::from_value(1), MemberId::from_value(2));
/// let members = MemberDirectory::from_members([
///     Member::new(dad, family, Gender::Male),
///     Member::new(kid, family, Gender::Female),
/// ]);
///
/// let mut path = Path::new(kid);
/// let edge = Edge::new(dad, kid, RelationshipType::Father);
/// path.push(edge.traverse_from(kid).unwrap()).unwrap();
///
/// let engine = KinshipRuleEngine::new(RuleTable::builtin("en").unwrap().into());
/// assert_eq!(engine.resolve(&path, &members), Some("father"));
/// ```
#[derive(Debug, Clone)]
pub struct KinshipRuleEngine {
    table: Arc<RuleTable>,
}

impl KinshipRuleEngine {
    /// Create an engine over a loaded table
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self { table }
    }

    /// The table in use
    pub fn table(&self) -> &Arc<RuleTable> {
        &self.table
    }

    /// Label of the first matching rule, or `None` when nothing matches
    pub fn resolve<L: MemberLookup + ?Sized>(&self, path: &Path, members: &L) -> Option<&str> {
        resolve(path, members, &self.table)
    }
}

/// Resolve a path against a table without building an engine
pub fn resolve<'t, L: MemberLookup + ?Sized>(
    path: &Path,
    members: &L,
    table: &'t RuleTable,
) -> Option<&'t str> {
    let label = table.first_match(path, members).map(|rule| rule.label.as_str());
    match label {
        Some(label) => tracing::trace!(pattern = %path.pattern(), label, "Rule matched"),
        None => tracing::trace!(pattern = %path.pattern(), "No rule matched"),
    }
    label
}
