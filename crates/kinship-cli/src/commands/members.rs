//! Members command implementation.

use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;

/// Execute the members command.
pub fn execute_members(session: &Session, formatter: &Formatter) -> Result<String> {
    formatter.format_members(&session.members()?)
}
