//! Tasks command.

use super::write_error;
use crate::Result;
use crate::services::TaskRegistry;
use std::io::Write;

/// Prints each task with its description and usage string.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn cmd_tasks<W: Write>(registry: &TaskRegistry, out: &mut W) -> Result<()> {
    for task in registry.iter() {
        writeln!(out, "{}: {}", task.name, task.description).map_err(write_error)?;
        writeln!(out, "  {}", task.spec.usage()).map_err(write_error)?;
    }
    Ok(())
}
