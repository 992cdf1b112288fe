//! Kinship rules and ordered rule tables

use crate::{Condition, RuleError};
use kinship_domain::{MemberLookup, Path, Pattern};
use std::collections::HashMap;

/// A single rule: when a path has `pattern` and `condition` holds, emit `label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Shape the path must have
    pub pattern: Pattern,

    /// Extra predicate over the path
    pub condition: Condition,

    /// Kinship term to emit
    pub label: String,
}

impl Rule {
    /// Create a new rule
    pub fn new(pattern: Pattern, condition: Condition, label: impl Into<String>) -> Self {
        Self {
            pattern,
            condition,
            label: label.into(),
        }
    }

    /// Whether this rule applies to the path
    pub fn matches<L: MemberLookup + ?Sized>(&self, path: &Path, members: &L) -> bool {
        self.pattern == path.pattern() && self.condition.evaluate(path, members)
    }
}

/// Ordered, immutable list of rules
///
/// Declaration order is priority order: the first rule whose pattern and
/// condition match wins. Rules are indexed by pattern so resolution only
/// evaluates conditions of rules with the right shape.
///
/// Tables are loaded once and shared (e.g. through `Arc`); nothing mutates
/// them after construction.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    index: HashMap<Pattern, Vec<usize>>,
}

impl RuleTable {
    /// Build a table, validating every rule
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        let mut index: HashMap<Pattern, Vec<usize>> = HashMap::new();

        for (i, rule) in rules.iter().enumerate() {
            if rule.label.trim().is_empty() {
                return Err(RuleError::InvalidRule {
                    index: i,
                    label: rule.label.clone(),
                    reason: "label is empty".to_string(),
                });
            }
            rule.condition
                .check_fits(rule.pattern.len())
                .map_err(|reason| RuleError::InvalidRule {
                    index: i,
                    label: rule.label.clone(),
                    reason,
                })?;
            index.entry(rule.pattern.clone()).or_default().push(i);
        }

        Ok(Self { rules, index })
    }

    /// All rules in priority order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules with exactly this pattern, in priority order
    pub fn candidates<'a>(&'a self, pattern: &Pattern) -> impl Iterator<Item = &'a Rule> + 'a {
        self.index
            .get(pattern)
            .into_iter()
            .flatten()
            .map(move |&i| &self.rules[i])
    }

    /// First rule that applies to the path
    pub fn first_match<L: MemberLookup + ?Sized>(&self, path: &Path, members: &L) -> Option<&Rule> {
        let pattern = path.pattern();
        self.candidates(&pattern)
            .find(|rule| rule.condition.evaluate(path, members))
    }

    /// Distinct patterns covered by the table
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.index.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_domain::{Gender, RelationshipType};

    #[test]
    fn test_rejects_empty_label() {
        let rule = Rule::new(Pattern::default(), Condition::Always, "  ");
        assert!(matches!(
            RuleTable::new(vec![rule]),
            Err(RuleError::InvalidRule { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_condition() {
        let rules = vec![
            Rule::new(Pattern::default(), Condition::Always, "self"),
            Rule::new(
                Pattern::new(vec![RelationshipType::Child]),
                Condition::via(1, RelationshipType::Father),
                "father",
            ),
        ];
        let err = RuleTable::new(rules).unwrap_err();
        assert!(err.to_string().contains("#1 ('father')"));
    }

    #[test]
    fn test_candidates_keep_declaration_order() {
        let pattern = Pattern::new(vec![RelationshipType::Father]);
        let table = RuleTable::new(vec![
            Rule::new(pattern.clone(), Condition::target_gender(Gender::Male), "son"),
            Rule::new(Pattern::new(vec![RelationshipType::Wife]), Condition::Always, "husband"),
            Rule::new(pattern.clone(), Condition::Always, "child"),
        ])
        .unwrap();

        let labels: Vec<&str> = table.candidates(&pattern).map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["son", "child"]);
        assert_eq!(table.patterns().count(), 2);
    }
}
