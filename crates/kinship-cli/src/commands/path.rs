//! Path command implementation.

use crate::cli::PathArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use kinship_graph::PathFinder;
use kinship_service::MAX_DEPTH_LIMIT;

/// Execute the path command.
pub fn execute_path(args: PathArgs, session: &Session, formatter: &Formatter) -> Result<String> {
    let subject = session.resolve_member(&args.subject)?;
    let target = session.resolve_member(&args.target)?;

    let path = match args.max_depth {
        Some(depth) => {
            if depth == 0 || depth > MAX_DEPTH_LIMIT {
                return Err(CliError::InvalidInput(format!(
                    "max-depth must be between 1 and {}",
                    MAX_DEPTH_LIMIT
                )));
            }
            let (_, store) = session.service().load_family(session.family())?;
            PathFinder::new(depth)
                .find_path(&store, subject.id, target.id)
                .map_err(kinship_service::KinshipError::from)?
        }
        None => session
            .service()
            .find_path(session.family(), subject.id, target.id)?,
    };

    formatter.format_path(&path, &session.members()?)
}
