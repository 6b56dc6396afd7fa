//! Get command.

use super::list::formatter_for;
use super::{OutputArgs, TargetArgs, write_error};
use crate::Result;
use crate::feed::{EntryMutator, FeedSource};
use crate::prompt::Prompt;
use crate::rendering::FormatSettings;
use crate::services::CommandDispatcher;
use std::io::Write;

/// Prints the single entry matching the title or id.
///
/// Returns false when nothing matched.
///
/// # Errors
///
/// Returns an error if the invocation is incomplete, the feed cannot be
/// fetched, the selection is invalid, or output cannot be written.
pub fn cmd_get<S, P, W>(
    dispatcher: &CommandDispatcher<'_, S, P>,
    target: &TargetArgs,
    output: &OutputArgs,
    format: &FormatSettings,
    out: &mut W,
) -> Result<bool>
where
    S: FeedSource + EntryMutator + ?Sized,
    P: Prompt + ?Sized,
    W: Write,
{
    let ctx = output.extend_context(target.to_context());
    let Some(entry) = dispatcher.get(&ctx)? else {
        tracing::info!("No matching entry");
        return Ok(false);
    };

    let formatter = formatter_for(output, format);
    writeln!(out, "{}", formatter.format(&entry)).map_err(write_error)?;
    Ok(true)
}
