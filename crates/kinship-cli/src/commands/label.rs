//! Label command implementation.

use crate::cli::LabelArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;
use kinship_domain::MemberId;
use kinship_rules::RuleTable;
use kinship_service::{Kinship, KinshipService};
use std::sync::Arc;

/// Execute the label command.
pub fn execute_label(args: LabelArgs, session: &Session, formatter: &Formatter) -> Result<String> {
    let subject = session.resolve_member(&args.subject)?;
    let target = session.resolve_member(&args.target)?;

    let kinship = match &args.locale {
        Some(locale) => label_with_locale(session, locale, subject.id, target.id)?,
        None => session
            .service()
            .compute_kinship_label(session.family(), subject.id, target.id)?,
    };

    formatter.format_kinship(&subject, &target, &kinship, &session.members()?)
}

/// Compute a label with a built-in table other than the configured one.
fn label_with_locale(
    session: &Session,
    locale: &str,
    subject: MemberId,
    target: MemberId,
) -> Result<Kinship> {
    let table = Arc::new(RuleTable::builtin(locale)?);
    let service = KinshipService::with_rules(
        session.service().repository(),
        session.service().config().clone(),
        table,
    );
    Ok(service.compute_kinship_label(session.family(), subject, target)?)
}
