//! CLI command implementations.
//!
//! Each submodule turns parsed arguments into an [`AttributeContext`], runs
//! the matching [`CommandDispatcher`] operation, and writes results to the
//! given output.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `list` | List entries in a feed |
//! | `get` | Show one entry, asking which when several match |
//! | `delete` | Delete matching entries |
//! | `tag` | Edit tags on matching entries |
//! | `tasks` | Show every task and its usage |
//!
//! # Example Usage
//!
//! ```bash
//! feedcl list --feed https://example.com/albums --fields title,url
//! feedcl get --feed https://example.com/albums --title "Vacation.*"
//! feedcl tag --feed https://example.com/albums --title Beach --tags "sun, -rain"
//! feedcl delete --feed https://example.com/albums --id a42 --kind album
//! ```

mod delete;
mod get;
mod list;
mod tag;
mod tasks;

pub use delete::cmd_delete;
pub use get::cmd_get;
pub use list::cmd_list;
pub use tag::cmd_tag;
pub use tasks::cmd_tasks;

use crate::models::AttributeContext;
use crate::Error;
use clap::Args;

/// Arguments selecting a feed and the entries within it.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Feed URI to query.
    #[arg(short, long)]
    pub feed: Option<String>,

    /// Title to match (a prefix-anchored regex unless `--no-regex`).
    #[arg(short, long)]
    pub title: Option<String>,

    /// Entry id.
    #[arg(long)]
    pub id: Option<String>,
}

impl TargetArgs {
    /// Builds the attribute context for these arguments.
    #[must_use]
    pub fn to_context(&self) -> AttributeContext {
        AttributeContext::new()
            .with_opt("feed", self.feed.as_deref())
            .with_opt("title", self.title.as_deref())
            .with_opt("id", self.id.as_deref())
    }
}

/// Arguments controlling how entries are printed.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Comma-separated fields to print, e.g. `title,url,tags`.
    #[arg(long)]
    pub fields: Option<String>,

    /// Delimiter placed between fields.
    #[arg(short, long)]
    pub delimiter: Option<String>,
}

impl OutputArgs {
    /// Adds the output attributes to `ctx`.
    #[must_use]
    pub fn extend_context(&self, ctx: AttributeContext) -> AttributeContext {
        ctx.with_opt("fields", self.fields.as_deref())
            .with_opt("delimiter", self.delimiter.as_deref())
    }
}

/// Maps an output error.
#[allow(clippy::needless_pass_by_value)]
fn write_error(e: std::io::Error) -> Error {
    Error::OperationFailed {
        operation: "write_output".to_string(),
        cause: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_context() {
        let target = TargetArgs {
            feed: Some("mem://f".to_string()),
            title: None,
            id: Some(String::new()),
        };
        let ctx = target.to_context();
        assert_eq!(ctx.get("feed"), Some("mem://f"));
        assert!(!ctx.is_set("title"));
        assert!(!ctx.is_set("id"));
    }

    #[test]
    fn test_output_context() {
        let output = OutputArgs {
            fields: Some("title".to_string()),
            delimiter: None,
        };
        let ctx = output.extend_context(AttributeContext::new());
        assert_eq!(ctx.supplied().collect::<Vec<_>>(), vec!["fields"]);
    }
}
