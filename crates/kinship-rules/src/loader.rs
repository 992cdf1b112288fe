//! Loading rule tables from TOML
//!
//! # File format
//!
//! ```toml
//! [[rule]]
//! pattern = ["Child", "Child"]       # traversal types; "Parent" = Father or Mother
//! via = ["Father", "Father"]         # optional stored type per step, "*" = any
//! target_gender = "Male"             # optional
//! label = "paternal grandfather"
//!
//! [[rule]]
//! pattern = ["Child"]
//! when = { not = { gender = { at = "target", is = "Female" } } }
//! label = "father"
//! ```
//!
//! `via`, `target_gender` and `when` are combined with AND. A pattern entry of
//! `Parent` expands the rule into one copy per parent type, Father first.

use crate::{Condition, Position, Rule, RuleError, RuleTable};
use kinship_domain::{Gender, Pattern, RelationshipType};
use serde::Deserialize;
use std::path::Path as FsPath;

/// Locales with a built-in table
pub const BUILTIN_LOCALES: [&str; 2] = ["en", "vi"];

const EN_RULES: &str = include_str!("../rules/en.toml");
const VI_RULES: &str = include_str!("../rules/vi.toml");

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default, rename = "rule")]
    rules: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSpec {
    pattern: Vec<String>,
    label: String,
    #[serde(default)]
    via: Option<Vec<String>>,
    #[serde(default)]
    target_gender: Option<String>,
    #[serde(default)]
    when: Option<ConditionSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ConditionSpec {
    Always,
    Gender { at: String, is: String },
    Via { step: usize, stored: String },
    All(Vec<ConditionSpec>),
    Any(Vec<ConditionSpec>),
    Not(Box<ConditionSpec>),
}

impl RuleTable {
    /// Parse a table from TOML text
    pub fn from_toml(toml_str: &str) -> Result<Self, RuleError> {
        let file: RuleFile = toml::from_str(toml_str)?;

        let mut rules = Vec::new();
        for (index, spec) in file.rules.into_iter().enumerate() {
            let invalid = |reason: String| RuleError::InvalidRule {
                index,
                label: spec.label.clone(),
                reason,
            };
            if spec.label.trim().is_empty() {
                return Err(invalid("label is empty".to_string()));
            }
            let condition = spec_condition(&spec).map_err(invalid)?;
            condition.check_fits(spec.pattern.len()).map_err(invalid)?;
            for pattern in expand_pattern(&spec.pattern).map_err(invalid)? {
                rules.push(Rule::new(pattern, condition.clone(), spec.label.clone()));
            }
        }

        RuleTable::new(rules)
    }

    /// Load a table from a TOML file
    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self, RuleError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let table = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.as_ref().display(), rules = table.len(), "Loaded rule table");
        Ok(table)
    }

    /// One of the tables shipped with the crate (see [`BUILTIN_LOCALES`])
    pub fn builtin(locale: &str) -> Result<Self, RuleError> {
        match locale {
            "en" => Self::from_toml(EN_RULES),
            "vi" => Self::from_toml(VI_RULES),
            other => Err(RuleError::UnknownLocale(other.to_string())),
        }
    }
}

fn spec_condition(spec: &RuleSpec) -> Result<Condition, String> {
    let mut condition = Condition::Always;

    if let Some(via) = &spec.via {
        if via.len() != spec.pattern.len() {
            return Err(format!(
                "via has {} entries but pattern has {} steps",
                via.len(),
                spec.pattern.len()
            ));
        }
        for (step, name) in via.iter().enumerate() {
            if name == "*" {
                continue;
            }
            condition = condition.and(Condition::via(step, parse_type(name)?));
        }
    }

    if let Some(gender) = &spec.target_gender {
        condition = condition.and(Condition::target_gender(parse_gender(gender)?));
    }

    if let Some(when) = &spec.when {
        condition = condition.and(convert(when)?);
    }

    Ok(condition)
}

fn convert(spec: &ConditionSpec) -> Result<Condition, String> {
    Ok(match spec {
        ConditionSpec::Always => Condition::Always,
        ConditionSpec::Gender { at, is } => {
            let position = Position::parse(at).ok_or_else(|| format!("Invalid position: {}", at))?;
            Condition::GenderEquals(position, parse_gender(is)?)
        }
        ConditionSpec::Via { step, stored } => Condition::via(*step, parse_type(stored)?),
        ConditionSpec::All(list) => Condition::And(list.iter().map(convert).collect::<Result<_, _>>()?),
        ConditionSpec::Any(list) => Condition::Or(list.iter().map(convert).collect::<Result<_, _>>()?),
        ConditionSpec::Not(inner) => Condition::Not(Box::new(convert(inner)?)),
    })
}

fn parse_type(name: &str) -> Result<RelationshipType, String> {
    name.parse()
}

fn parse_gender(name: &str) -> Result<Gender, String> {
    name.parse()
}

/// Expand `Parent` entries into Father/Mother variants
fn expand_pattern(steps: &[String]) -> Result<Vec<Pattern>, String> {
    let mut expanded: Vec<Vec<RelationshipType>> = vec![Vec::new()];

    for step in steps {
        let options = match step.as_str() {
            "Parent" | "parent" => vec![RelationshipType::Father, RelationshipType::Mother],
            name => vec![parse_type(name)?],
        };
        expanded = expanded
            .into_iter()
            .flat_map(|prefix| {
                options.iter().map(move |&option| {
                    let mut next = prefix.clone();
                    next.push(option);
                    next
                })
            })
            .collect();
    }

    Ok(expanded.into_iter().map(Pattern::new).collect())
}
