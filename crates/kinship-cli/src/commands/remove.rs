//! Remove-member and remove-relationship command implementations.

use crate::cli::{RemoveMemberArgs, RemoveRelationshipArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use kinship_domain::{FamilyRepository, RelationshipId};

/// Execute the remove-member command.
pub fn execute_remove_member(
    args: RemoveMemberArgs,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<String> {
    let member = session.resolve_member(&args.member)?;
    let members = session.members()?;

    let changes = session.service().remove_member(member.id)?;
    if !args.dry_run {
        session.persist(&changes)?;
    }

    formatter.format_changes(&changes, &members, args.dry_run)
}

/// Execute the remove-relationship command.
pub fn execute_remove_relationship(
    args: RemoveRelationshipArgs,
    session: &mut Session,
    formatter: &Formatter,
) -> Result<String> {
    let id: RelationshipId = args
        .id
        .parse()
        .map_err(CliError::InvalidInput)?;

    let row = session.service().repository().relationship(id)?;
    if row.is_some_and(|row| row.family_id != session.family()) {
        return Err(CliError::InvalidInput(format!(
            "Relationship {} belongs to another family",
            id
        )));
    }

    let members = session.members()?;
    let changes = session.service().remove_relationship(id)?;
    if !args.dry_run {
        session.persist(&changes)?;
    }

    formatter.format_changes(&changes, &members, args.dry_run)
}
