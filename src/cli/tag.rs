//! Tag command.

use super::{TargetArgs, write_error};
use crate::Result;
use crate::feed::{EntryMutator, FeedSource};
use crate::prompt::Prompt;
use crate::services::{CommandDispatcher, TagReport};
use std::io::Write;

/// Applies a tag edit to matching entries and prints how many changed.
///
/// Entries whose update failed are reported after the count.
///
/// # Errors
///
/// Returns an error if the invocation is incomplete, no tags were given,
/// the feed cannot be fetched, or output cannot be written.
pub fn cmd_tag<S, P, W>(
    dispatcher: &CommandDispatcher<'_, S, P>,
    target: &TargetArgs,
    tags: Option<&str>,
    out: &mut W,
) -> Result<TagReport>
where
    S: FeedSource + EntryMutator + ?Sized,
    P: Prompt + ?Sized,
    W: Write,
{
    let ctx = target.to_context().with_opt("tags", tags);
    let report = dispatcher.tag(&ctx)?;

    write!(out, "Updated tags on {} entries", report.updated).map_err(write_error)?;
    if report.failed > 0 {
        write!(out, ", {} failed", report.failed).map_err(write_error)?;
    }
    writeln!(out).map_err(write_error)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MemoryFeedSource;
    use crate::models::Entry;
    use crate::prompt::ScriptedPrompt;
    use crate::services::TaskRegistry;

    #[test]
    fn test_tag_summary() {
        let source = MemoryFeedSource::chained(
            "mem://f",
            vec![vec![Entry::new("1", "Hike"), Entry::new("2", "Hike")]],
        )
        .failing_at("1");
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let registry = TaskRegistry::standard().expect("standard tasks");
        let dispatcher = CommandDispatcher::new(registry, &source, &prompt);

        let target = TargetArgs {
            feed: Some("mem://f".to_string()),
            title: Some("Hike".to_string()),
            id: None,
        };
        let mut out = Vec::new();
        let report = cmd_tag(&dispatcher, &target, Some("trail"), &mut out).expect("tag");

        assert_eq!(report, TagReport { updated: 1, failed: 1 });
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Updated tags on 1 entries, 1 failed\n"
        );
    }
}
