//! Rules command implementation.

use crate::cli::RulesArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use kinship_domain::Pattern;
use kinship_rules::{Rule, RuleTable};
use kinship_service::KinshipConfig;

/// Execute the rules command.
pub fn execute_rules(args: RulesArgs, config: &KinshipConfig, formatter: &Formatter) -> Result<String> {
    let table = match (&args.rules_file, &args.locale) {
        (Some(file), _) => RuleTable::from_file(file)?,
        (None, Some(locale)) => RuleTable::builtin(locale)?,
        (None, None) => match &config.rules_path {
            Some(path) => RuleTable::from_file(path)?,
            None => RuleTable::builtin(&config.rules_locale)?,
        },
    };

    let rules: Vec<&Rule> = match &args.pattern {
        Some(pattern) => {
            let pattern: Pattern = pattern.parse().map_err(CliError::InvalidInput)?;
            table.candidates(&pattern).collect()
        }
        None => table.rules().iter().collect(),
    };

    formatter.format_rules(&rules)
}
