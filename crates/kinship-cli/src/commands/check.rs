//! Check command implementation.

use crate::error::Result;
use crate::output::{FamilyCheck, Formatter};
use kinship_domain::FamilyRepository;
use kinship_graph::RelationshipStore;
use kinship_store::InMemoryFamilyRepository;
use std::path::Path;

/// Execute the check command over every family in the file.
///
/// Returns the report and whether every family passed.
pub fn execute_check(file: &Path, formatter: &Formatter) -> Result<(String, bool)> {
    let repo = InMemoryFamilyRepository::load(file)?;
    let checks = check_families(&repo)?;
    let passed = checks.iter().all(|c| c.problem.is_none());
    Ok((formatter.format_checks(&checks)?, passed))
}

/// Load each family's relationships into a store and record the first violation.
pub fn check_families(repo: &InMemoryFamilyRepository) -> Result<Vec<FamilyCheck>> {
    let mut checks = Vec::new();
    for (family, name) in repo.families() {
        let members = repo.members_of_family(family)?;
        let rows = repo.relationships_of_family(family)?;
        let relationships = rows.len();

        let problem = match RelationshipStore::from_relationships(family, rows) {
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(family = %family, error = %err, "Family failed integrity check");
                Some(err.to_string())
            }
        };

        checks.push(FamilyCheck {
            name: name.to_string(),
            members: members.len(),
            relationships,
            problem,
        });
    }
    Ok(checks)
}
