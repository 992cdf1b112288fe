//! Walked paths and their type-only patterns

use crate::{Edge, MemberId, RelationshipType};
use std::fmt;

/// One step of a walked path
///
/// `kind` is the relationship of `from` to `to` as traversed, which is the
/// stored type when walking forward and its inverse when walking backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraversedEdge {
    /// Member the step starts at
    pub from: MemberId,

    /// Member the step arrives at
    pub to: MemberId,

    /// `from` is the `kind` of `to`
    pub kind: RelationshipType,

    /// The stored edge that was walked
    pub stored: Edge,
}

impl TraversedEdge {
    /// Whether the stored edge was walked from its source
    pub fn is_forward(&self) -> bool {
        self.stored.source == self.from
    }
}

/// A path between two members
///
/// `nodes()[0]` is the subject and the last node the target. A path with no
/// steps connects a member to themself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    nodes: Vec<MemberId>,
    steps: Vec<TraversedEdge>,
}

impl Path {
    /// Start a path at `subject`
    pub fn new(subject: MemberId) -> Self {
        Self {
            nodes: vec![subject],
            steps: Vec::new(),
        }
    }

    /// Append a step; it must start where the path currently ends
    pub fn push(&mut self, step: TraversedEdge) -> Result<(), String> {
        let last = self.target();
        if step.from != last {
            return Err(format!(
                "Step starts at {} but path ends at {}",
                step.from, last
            ));
        }
        self.nodes.push(step.to);
        self.steps.push(step);
        Ok(())
    }

    /// First member of the path
    pub fn subject(&self) -> MemberId {
        self.nodes[0]
    }

    /// Last member of the path
    pub fn target(&self) -> MemberId {
        self.nodes[self.nodes.len() - 1]
    }

    /// All members along the path, subject first
    pub fn nodes(&self) -> &[MemberId] {
        &self.nodes
    }

    /// All steps along the path
    pub fn steps(&self) -> &[TraversedEdge] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the path has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The type-only shape of this path
    pub fn pattern(&self) -> Pattern {
        Pattern::from(self)
    }
}

/// Ordered traversal types of a path, with member ids dropped
///
/// # Examples
///
/// ```
/// use kinship_domain::{Pattern, RelationshipType};
///
/// let pattern = Pattern::new(vec![RelationshipType::Child, RelationshipType::Child]);
/// assert_eq!(pattern.to_string(), "[Child, Child]");
/// assert_eq!("Child, Child".parse::<Pattern>().unwrap(), pattern);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pattern(Vec<RelationshipType>);

impl Pattern {
    /// Create a pattern from traversal types
    pub fn new(steps: Vec<RelationshipType>) -> Self {
        Self(steps)
    }

    /// Traversal types in order
    pub fn steps(&self) -> &[RelationshipType] {
        &self.0
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the pattern is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&Path> for Pattern {
    fn from(path: &Path) -> Self {
        Self(path.steps.iter().map(|s| s.kind).collect())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, "]")
    }
}

impl std::str::FromStr for Pattern {
    type Err = String;

    /// Parse a comma-separated list of type names, brackets optional
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
        if inner.trim().is_empty() {
            return Ok(Self::default());
        }
        inner
            .split(',')
            .map(|part| part.trim().parse::<RelationshipType>())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}
