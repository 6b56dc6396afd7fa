//! List command.

use super::{OutputArgs, TargetArgs, write_error};
use crate::Result;
use crate::feed::{EntryMutator, FeedSource};
use crate::prompt::Prompt;
use crate::rendering::{DEFAULT_FIELDS, EntryFormatter, FormatSettings};
use crate::services::CommandDispatcher;
use std::io::Write;

/// Prints every entry of the feed, one line each. Returns the number printed.
///
/// # Errors
///
/// Returns an error if the invocation is incomplete, the feed cannot be
/// fetched, or output cannot be written.
pub fn cmd_list<S, P, W>(
    dispatcher: &CommandDispatcher<'_, S, P>,
    target: &TargetArgs,
    output: &OutputArgs,
    format: &FormatSettings,
    out: &mut W,
) -> Result<usize>
where
    S: FeedSource + EntryMutator + ?Sized,
    P: Prompt + ?Sized,
    W: Write,
{
    let ctx = output.extend_context(target.to_context());
    let entries = dispatcher.list(&ctx)?;
    let formatter = formatter_for(output, format);

    for entry in &entries {
        writeln!(out, "{}", formatter.format(entry)).map_err(write_error)?;
    }
    Ok(entries.len())
}

/// Builds the formatter for the requested fields and delimiter.
pub(super) fn formatter_for(output: &OutputArgs, format: &FormatSettings) -> EntryFormatter {
    let delimiter = output.delimiter.as_deref().unwrap_or(",");
    match output.fields.as_deref() {
        Some(list) => EntryFormatter::from_field_list(list, delimiter, format.clone()),
        None => EntryFormatter::new(DEFAULT_FIELDS, delimiter, format.clone()),
    }
}
