//! Rule conditions and their interpreter
//!
//! Conditions are plain data so rule tables can be loaded from files and
//! swapped in tests. [`Condition::evaluate`] interprets them against a walked
//! path and a member lookup.

use kinship_domain::{Gender, MemberId, MemberLookup, Path, RelationshipType};

/// A member position within a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The first member (who the label is relative to)
    Subject,

    /// The last member (who the label names)
    Target,

    /// The member at this index, subject being 0
    Node(usize),
}

impl Position {
    /// Member at this position, if the path is long enough
    pub fn resolve(&self, path: &Path) -> Option<MemberId> {
        match self {
            Position::Subject => Some(path.subject()),
            Position::Target => Some(path.target()),
            Position::Node(i) => path.nodes().get(*i).copied(),
        }
    }

    /// Parse `subject`, `target` or a node index
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "subject" => Some(Position::Subject),
            "target" => Some(Position::Target),
            other => other.parse().ok().map(Position::Node),
        }
    }
}

/// Predicate over a path and its members
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Always holds
    Always,

    /// The member at the position has the given gender
    GenderEquals(Position, Gender),

    /// The edge walked at `step` was stored with type `kind`
    ///
    /// Walking a `Father` or `Mother` edge backward yields `Child` either way;
    /// this recovers which line the step went through.
    StoredTypeEquals {
        /// Zero-based step index
        step: usize,
        /// Stored type to compare with
        kind: RelationshipType,
    },

    /// All nested conditions hold
    And(Vec<Condition>),

    /// At least one nested condition holds
    Or(Vec<Condition>),

    /// The nested condition does not hold
    Not(Box<Condition>),
}

impl Condition {
    /// The target member has this gender
    pub fn target_gender(gender: Gender) -> Self {
        Condition::GenderEquals(Position::Target, gender)
    }

    /// The edge walked at `step` was stored as `kind`
    pub fn via(step: usize, kind: RelationshipType) -> Self {
        Condition::StoredTypeEquals { step, kind }
    }

    /// Combine with another condition, flattening nested `And`s
    pub fn and(self, other: Condition) -> Self {
        match (self, other) {
            (Condition::Always, c) | (c, Condition::Always) => c,
            (Condition::And(mut a), Condition::And(b)) => {
                a.extend(b);
                Condition::And(a)
            }
            (Condition::And(mut a), c) => {
                a.push(c);
                Condition::And(a)
            }
            (c, Condition::And(mut b)) => {
                b.insert(0, c);
                Condition::And(b)
            }
            (a, b) => Condition::And(vec![a, b]),
        }
    }

    /// Evaluate against a path
    ///
    /// A gender test on a member the lookup does not know evaluates false.
    pub fn evaluate<L: MemberLookup + ?Sized>(&self, path: &Path, members: &L) -> bool {
        match self {
            Condition::Always => true,
            Condition::GenderEquals(position, gender) => position
                .resolve(path)
                .and_then(|id| members.gender(id))
                .is_some_and(|g| g == *gender),
            Condition::StoredTypeEquals { step, kind } => path
                .steps()
                .get(*step)
                .is_some_and(|s| s.stored.kind == *kind),
            Condition::And(all) => all.iter().all(|c| c.evaluate(path, members)),
            Condition::Or(any) => any.iter().any(|c| c.evaluate(path, members)),
            Condition::Not(inner) => !inner.evaluate(path, members),
        }
    }

    /// Check that every index used fits a pattern of `len` steps
    pub(crate) fn check_fits(&self, len: usize) -> Result<(), String> {
        match self {
            Condition::Always => Ok(()),
            Condition::GenderEquals(Position::Node(i), _) if *i > len => Err(format!(
                "node {} is past the end of a {}-step pattern",
                i, len
            )),
            Condition::GenderEquals(..) => Ok(()),
            Condition::StoredTypeEquals { step, .. } if *step >= len => Err(format!(
                "step {} is past the end of a {}-step pattern",
                step, len
            )),
            Condition::StoredTypeEquals { kind, .. } if !kind.is_stored() => {
                Err(format!("{} is never stored", kind))
            }
            Condition::StoredTypeEquals { .. } => Ok(()),
            Condition::And(list) | Condition::Or(list) => {
                list.iter().try_for_each(|c| c.check_fits(len))
            }
            Condition::Not(inner) => inner.check_fits(len),
        }
    }
}
