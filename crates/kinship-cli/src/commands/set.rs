//! Set command implementation.

use crate::cli::SetArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use kinship_service::RelationshipUpdate;

/// Execute the set command.
pub fn execute_set(args: SetArgs, session: &mut Session, formatter: &Formatter) -> Result<String> {
    let member = session.resolve_member(&args.member)?;

    let mut update = RelationshipUpdate::new();
    if let Some(father) = &args.father {
        update = update.father(session.resolve_member(father)?.id);
    }
    if let Some(mother) = &args.mother {
        update = update.mother(session.resolve_member(mother)?.id);
    }
    if let Some(husband) = &args.husband {
        update = update.husband(session.resolve_member(husband)?.id);
    }
    if let Some(wife) = &args.wife {
        update = update.wife(session.resolve_member(wife)?.id);
    }
    if update.is_empty() {
        return Err(CliError::InvalidInput(
            "Nothing to set; pass --father, --mother, --husband or --wife".to_string(),
        ));
    }

    let changes = session
        .service()
        .update_member_relationships(member.id, &update)?;
    if !args.dry_run {
        session.persist(&changes)?;
    }

    formatter.format_changes(&changes, &session.members()?, args.dry_run)
}
