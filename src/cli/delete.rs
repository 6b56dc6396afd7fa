//! Delete command.
//!
//! # Usage
//!
//! ```bash
//! # Asks before each deletion
//! feedcl delete --feed https://example.com/albums --title "Old.*" --kind album
//!
//! # Skip confirmation
//! feedcl delete --feed https://example.com/albums --id a42 --force
//! ```

use super::{TargetArgs, write_error};
use crate::Result;
use crate::feed::{EntryMutator, FeedSource};
use crate::prompt::Prompt;
use crate::services::{CommandDispatcher, DeleteReport};
use std::io::Write;

/// Deletes matching entries and prints a summary line.
///
/// # Errors
///
/// Returns an error if the invocation is incomplete, the feed cannot be
/// fetched, input cannot be read, or output cannot be written.
pub fn cmd_delete<S, P, W>(
    dispatcher: &CommandDispatcher<'_, S, P>,
    target: &TargetArgs,
    kind: &str,
    out: &mut W,
) -> Result<DeleteReport>
where
    S: FeedSource + EntryMutator + ?Sized,
    P: Prompt + ?Sized,
    W: Write,
{
    let report = dispatcher.delete(&target.to_context(), kind)?;

    write!(out, "Deleted {} {kind}(s)", report.deleted).map_err(write_error)?;
    if report.skipped > 0 {
        write!(out, ", skipped {}", report.skipped).map_err(write_error)?;
    }
    if report.failed > 0 {
        write!(out, ", {} failed", report.failed).map_err(write_error)?;
    }
    writeln!(out).map_err(write_error)?;
    Ok(report)
}
