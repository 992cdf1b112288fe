//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Kinship CLI - Compute and maintain family relationships.
#[derive(Debug, Parser)]
#[command(name = "kinship")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Family file (JSON)
    #[arg(short = 'F', long, env = "KINSHIP_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Family to operate on, by name or id (needed when the file has several)
    #[arg(long, global = true)]
    pub family: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Name what TARGET is to SUBJECT (e.g. "paternal grandfather")
    Label(LabelArgs),

    /// Show the relationship path between two members
    Path(PathArgs),

    /// Set a member's father, mother, husband or wife
    Set(SetArgs),

    /// Remove every relationship of a member
    RemoveMember(RemoveMemberArgs),

    /// Remove a single relationship by id
    RemoveRelationship(RemoveRelationshipArgs),

    /// List the members of the family
    Members,

    /// Check that stored relationships satisfy the graph invariants
    Check,

    /// Show the rules of a rule table
    Rules(RulesArgs),
}

/// Arguments for the label command.
#[derive(Debug, Parser)]
pub struct LabelArgs {
    /// Member the label is relative to (id or display name)
    pub subject: String,

    /// Member to name (id or display name)
    pub target: String,

    /// Built-in rule table to use instead of the configured one
    #[arg(short, long)]
    pub locale: Option<String>,
}

/// Arguments for the path command.
#[derive(Debug, Parser)]
pub struct PathArgs {
    /// Start member (id or display name)
    pub subject: String,

    /// End member (id or display name)
    pub target: String,

    /// Maximum number of steps
    #[arg(short, long)]
    pub max_depth: Option<usize>,
}

/// Arguments for the set command.
#[derive(Debug, Parser)]
pub struct SetArgs {
    /// Member whose relatives are set (id or display name)
    pub member: String,

    /// Father (id or display name)
    #[arg(long)]
    pub father: Option<String>,

    /// Mother (id or display name)
    #[arg(long)]
    pub mother: Option<String>,

    /// Husband (id or display name)
    #[arg(long)]
    pub husband: Option<String>,

    /// Wife (id or display name)
    #[arg(long)]
    pub wife: Option<String>,

    /// Show the changes without saving them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the remove-member command.
#[derive(Debug, Parser)]
pub struct RemoveMemberArgs {
    /// Member whose relationships are removed (id or display name)
    pub member: String,

    /// Show the changes without saving them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the remove-relationship command.
#[derive(Debug, Parser)]
pub struct RemoveRelationshipArgs {
    /// Relationship id
    pub id: String,

    /// Show the changes without saving them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the rules command.
#[derive(Debug, Parser)]
pub struct RulesArgs {
    /// Built-in table to show instead of the configured one
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Rule file to show instead of the configured one
    #[arg(long)]
    pub rules_file: Option<PathBuf>,

    /// Only rules with this pattern, e.g. "Child, Child"
    #[arg(short, long)]
    pub pattern: Option<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        let cli = Cli::try_parse_from(["kinship", "-F", "family.json", "label", "An", "Binh"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("family.json")));
        match cli.command {
            Command::Label(args) => {
                assert_eq!(args.subject, "An");
                assert_eq!(args.target, "Binh");
                assert!(args.locale.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_set_slots() {
        let cli = Cli::try_parse_from([
            "kinship", "set", "Kid", "--father", "Dad", "--wife", "Mai", "--dry-run", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Set(args) => {
                assert_eq!(args.father.as_deref(), Some("Dad"));
                assert!(args.mother.is_none());
                assert_eq!(args.wife.as_deref(), Some("Mai"));
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["kinship"]).is_err());
    }
}
