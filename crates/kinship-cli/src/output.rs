//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use kinship_domain::{EdgeChanges, Member, MemberDirectory, MemberLookup, Path, Relationship};
use kinship_rules::{Condition, Position, Rule};
use kinship_service::{Kinship, Resolution};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Integrity report for one family.
#[derive(Debug, Clone)]
pub struct FamilyCheck {
    /// Family name
    pub name: String,
    /// Number of members
    pub members: usize,
    /// Number of stored relationships
    pub relationships: usize,
    /// First problem found, if any
    pub problem: Option<String>,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a computed kinship label.
    pub fn format_kinship(
        &self,
        subject: &Member,
        target: &Member,
        kinship: &Kinship,
        members: &MemberDirectory,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(kinship.label.clone()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "subject": subject.id.to_string(),
                "target": target.id.to_string(),
                "label": kinship.label,
                "resolution": match kinship.resolution {
                    Resolution::Rule => "rule",
                    Resolution::Fallback => "fallback",
                },
                "pattern": kinship.pattern.to_string(),
                "path": kinship.path.nodes().iter().map(|id| id.to_string()).collect::<Vec<_>>(),
            }))?),
            OutputFormat::Table => {
                let mut line = format!(
                    "{} is {}'s {}",
                    target.label(),
                    subject.label(),
                    self.colorize(&kinship.label, "cyan")
                );
                if kinship.resolution == Resolution::Fallback {
                    line.push_str(&format!(" {}", self.colorize("(no rule matched)", "yellow")));
                }
                Ok(format!("{}\n{}", line, self.path_line(&kinship.path, members)))
            }
        }
    }

    /// Format a path between two members.
    pub fn format_path(&self, path: &Path, members: &MemberDirectory) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(path.pattern().to_string()),
            OutputFormat::Json => {
                let steps: Vec<serde_json::Value> = path
                    .steps()
                    .iter()
                    .map(|step| {
                        serde_json::json!({
                            "from": step.from.to_string(),
                            "to": step.to.to_string(),
                            "type": step.kind.as_str(),
                            "stored": step.stored.kind.as_str(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "pattern": path.pattern().to_string(),
                    "steps": steps,
                }))?)
            }
            OutputFormat::Table => {
                if path.is_empty() {
                    return Ok(self.info("Subject and target are the same member"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "From", "Is the", "Of", "Stored as"]);
                for (i, step) in path.steps().iter().enumerate() {
                    builder.push_record([
                        (i + 1).to_string(),
                        name(members, step.from),
                        step.kind.to_string(),
                        name(members, step.to),
                        step.stored.to_string(),
                    ]);
                }
                Ok(format!(
                    "{}\n{}",
                    self.table(builder),
                    self.path_line(path, members)
                ))
            }
        }
    }

    /// Format the members of a family.
    pub fn format_members(&self, members: &MemberDirectory) -> Result<String> {
        let mut sorted: Vec<&Member> = members.iter().collect();
        sorted.sort_by_key(|m| m.id);

        match self.format {
            OutputFormat::Quiet => Ok(sorted
                .iter()
                .map(|m| m.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = sorted
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "id": m.id.to_string(),
                            "name": m.display_name,
                            "gender": m.gender.as_str(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                if sorted.is_empty() {
                    return Ok(self.colorize("No members found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Gender"]);
                for member in sorted {
                    builder.push_record([
                        member.id.to_string(),
                        member.display_name.clone().unwrap_or_default(),
                        member.gender.to_string(),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format a change set.
    pub fn format_changes(
        &self,
        changes: &EdgeChanges,
        members: &MemberDirectory,
        dry_run: bool,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(changes
                .removed
                .iter()
                .map(|r| format!("-{}", r.id))
                .chain(changes.added.iter().map(|r| format!("+{}", r.id)))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => {
                let rows = |rows: &[Relationship]| -> Vec<serde_json::Value> {
                    rows.iter()
                        .map(|r| {
                            serde_json::json!({
                                "id": r.id.to_string(),
                                "source": r.edge.source.to_string(),
                                "target": r.edge.target.to_string(),
                                "type": r.edge.kind.as_str(),
                            })
                        })
                        .collect()
                };
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "dry_run": dry_run,
                    "added": rows(&changes.added),
                    "removed": rows(&changes.removed),
                }))?)
            }
            OutputFormat::Table => {
                if changes.is_empty() {
                    return Ok(self.info("Nothing to change"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Change", "Relationship", "ID"]);
                for (sign, row) in changes
                    .removed
                    .iter()
                    .map(|r| ("removed", r))
                    .chain(changes.added.iter().map(|r| ("added", r)))
                {
                    builder.push_record([
                        sign.to_string(),
                        format!(
                            "{} is {} of {}",
                            name(members, row.edge.source),
                            row.edge.kind,
                            name(members, row.edge.target)
                        ),
                        row.id.to_string(),
                    ]);
                }
                let summary = format!(
                    "{} added, {} removed",
                    changes.added.len(),
                    changes.removed.len()
                );
                let footer = if dry_run {
                    self.warning(&format!("Dry run: {} (not saved)", summary))
                } else {
                    self.success(&summary)
                };
                Ok(format!("{}\n{}", self.table(builder), footer))
            }
        }
    }

    /// Format integrity reports.
    pub fn format_checks(&self, checks: &[FamilyCheck]) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(checks
                .iter()
                .map(|c| format!("{}\t{}", c.name, if c.problem.is_none() { "ok" } else { "error" }))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = checks
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "family": c.name,
                            "members": c.members,
                            "relationships": c.relationships,
                            "ok": c.problem.is_none(),
                            "problem": c.problem,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Family", "Members", "Relationships", "Status"]);
                for check in checks {
                    let status = match &check.problem {
                        None => self.colorize("ok", "green"),
                        Some(problem) => self.colorize(problem, "red"),
                    };
                    builder.push_record([
                        check.name.clone(),
                        check.members.to_string(),
                        check.relationships.to_string(),
                        status,
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format rules of a table.
    pub fn format_rules(&self, rules: &[&Rule]) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(rules
                .iter()
                .map(|r| r.label.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = rules
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "pattern": r.pattern.to_string(),
                            "condition": describe_condition(&r.condition),
                            "label": r.label,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                if rules.is_empty() {
                    return Ok(self.colorize("No rules found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Pattern", "Condition", "Label"]);
                for rule in rules {
                    builder.push_record([
                        rule.pattern.to_string(),
                        describe_condition(&rule.condition),
                        rule.label.clone(),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn path_line(&self, path: &Path, members: &MemberDirectory) -> String {
        let names: Vec<String> = path.nodes().iter().map(|&id| name(members, id)).collect();
        self.colorize(&names.join(" → "), "magenta")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn name(members: &MemberDirectory, id: kinship_domain::MemberId) -> String {
    members
        .member(id)
        .map(Member::label)
        .unwrap_or_else(|| id.to_string())
}

/// Render a condition in a compact, readable form.
pub fn describe_condition(condition: &Condition) -> String {
    match condition {
        Condition::Always => "-".to_string(),
        Condition::GenderEquals(position, gender) => {
            let at = match position {
                Position::Subject => "subject".to_string(),
                Position::Target => "target".to_string(),
                Position::Node(i) => format!("node {}", i),
            };
            format!("{} is {}", at, gender)
        }
        Condition::StoredTypeEquals { step, kind } => format!("step {} via {}", step, kind),
        Condition::And(all) => all.iter().map(describe_condition).collect::<Vec<_>>().join(" and "),
        Condition::Or(any) => format!(
            "({})",
            any.iter().map(describe_condition).collect::<Vec<_>>().join(" or ")
        ),
        Condition::Not(inner) => format!("not {}", describe_condition(inner)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_domain::{
        Edge, FamilyId, Gender, MemberId, Pattern, RelationshipId, RelationshipType,
    };

    fn members() -> MemberDirectory {
        let family = FamilyId::from_value(1);
        MemberDirectory::from_members([
            Member::new(MemberId::from_value(1), family, Gender::Male).with_name("Dad"),
            Member::new(MemberId::from_value(2), family, Gender::Female).with_name("Kid"),
        ])
    }

    fn changes() -> EdgeChanges {
        EdgeChanges {
            added: vec![Relationship::new(
                RelationshipId::from_value(9),
                FamilyId::from_value(1),
                Edge::new(MemberId::from_value(1), MemberId::from_value(2), RelationshipType::Father),
            )],
            removed: Vec::new(),
        }
    }

    #[test]
    fn test_changes_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_changes(&changes(), &members(), true).unwrap();
        assert!(output.contains("Dad is Father of Kid"));
        assert!(output.contains("Dry run: 1 added, 0 removed"));
    }

    #[test]
    fn test_changes_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_changes(&changes(), &members(), false).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["added"][0]["type"], "Father");
        assert_eq!(json["removed"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_members_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_members(&members()).unwrap();
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_describe_condition() {
        let condition = Condition::via(0, RelationshipType::Father)
            .and(Condition::target_gender(Gender::Female));
        assert_eq!(describe_condition(&condition), "step 0 via Father and target is Female");
        assert_eq!(describe_condition(&Condition::Always), "-");
    }

    #[test]
    fn test_rules_table() {
        let rule = Rule::new(Pattern::new(vec![RelationshipType::Child]), Condition::Always, "parent");
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_rules(&[&rule]).unwrap();
        assert!(output.contains("[Child]"));
        assert!(output.contains("parent"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
