//! Task registry and command execution.
//!
//! Every operation validates the invocation against its task's
//! [`RequirementSpec`] before touching the feed source.

use super::aggregator::{FeedAggregator, FeedSettings};
use super::requirements::RequirementSpec;
use super::selector::{EntrySelector, filter_by_title};
use super::tags::parse_tag_edit;
use crate::feed::{EntryMutator, FeedSource};
use crate::models::{AttributeContext, Entry};
use crate::prompt::Prompt;
use crate::{Error, Result};
use tracing::instrument;

/// A named command with its requirement signature.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name used on the command line.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Attributes the task needs and accepts.
    pub spec: RequirementSpec,
}

impl Task {
    /// Creates a task.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        spec: RequirementSpec,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            spec,
        }
    }
}

/// Ordered collection of tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Creates the registry of built-in tasks: `list`, `get`, `delete`, `tag`.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in signature is inconsistent.
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Task::new(
            "list",
            "List entries in a feed",
            RequirementSpec::builder()
                .require("feed")
                .optional("title")
                .optional("fields")
                .optional("delimiter")
                .build()?,
        ))?;
        registry.register(Task::new(
            "get",
            "Show a single entry",
            RequirementSpec::builder()
                .require("feed")
                .require_any(["title", "id"])
                .optional("fields")
                .optional("delimiter")
                .build()?,
        ))?;
        registry.register(Task::new(
            "delete",
            "Delete matching entries",
            RequirementSpec::builder()
                .require("feed")
                .require_any(["title", "id"])
                .build()?,
        ))?;
        registry.register(Task::new(
            "tag",
            "Add, remove, or replace tags on matching entries",
            RequirementSpec::builder()
                .require("feed")
                .require("title")
                .optional("tags")
                .args("tags as \"tag1, -removed, \\-literal, --\"")
                .build()?,
        ))?;
        Ok(registry)
    }

    /// Adds a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a task with the same name exists.
    pub fn register(&mut self, task: Task) -> Result<()> {
        if self.get(&task.name).is_some() {
            return Err(Error::InvalidInput(format!(
                "task '{}' is already registered",
                task.name
            )));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Looks up a task by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    /// Iterates over tasks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }
}

/// Behaviour switches for a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Paging policy.
    pub feed: FeedSettings,
    /// Match titles as regular expressions.
    pub use_regex: bool,
    /// Ask for tags when none were given.
    pub tags_prompt: bool,
    /// Ask before deleting each entry.
    pub delete_prompt: bool,
    /// Answer used when the delete question is left blank.
    pub delete_by_default: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            feed: FeedSettings::default(),
            use_regex: true,
            tags_prompt: false,
            delete_prompt: true,
            delete_by_default: true,
        }
    }
}

/// Outcome of a delete run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Entries removed from the service.
    pub deleted: usize,
    /// Entries the user declined to delete.
    pub skipped: usize,
    /// Entries whose delete request failed.
    pub failed: usize,
}

/// Outcome of a tag run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagReport {
    /// Entries whose tags were written.
    pub updated: usize,
    /// Entries whose tag update failed.
    pub failed: usize,
}

/// Runs tasks against a feed service.
pub struct CommandDispatcher<'a, S, P>
where
    S: FeedSource + EntryMutator + ?Sized,
    P: Prompt + ?Sized,
{
    registry: TaskRegistry,
    source: &'a S,
    prompt: &'a P,
    settings: DispatchSettings,
}

impl<'a, S, P> CommandDispatcher<'a, S, P>
where
    S: FeedSource + EntryMutator + ?Sized,
    P: Prompt + ?Sized,
{
    /// Creates a dispatcher with default settings.
    #[must_use]
    pub fn new(registry: TaskRegistry, source: &'a S, prompt: &'a P) -> Self {
        Self {
            registry,
            source,
            prompt,
            settings: DispatchSettings::default(),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: DispatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the task registry.
    #[must_use]
    pub const fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> DispatchSettings {
        self.settings
    }

    /// Checks that `ctx` satisfies the signature of `task`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown task, or
    /// [`Error::MissingRequirements`] listing every unsatisfied term.
    pub fn validate(&self, task: &str, ctx: &AttributeContext) -> Result<&Task> {
        let definition = self
            .registry
            .get(task)
            .ok_or_else(|| Error::InvalidInput(format!("unknown task '{task}'")))?;

        let missing = definition.spec.missing(ctx);
        if missing.is_empty() {
            return Ok(definition);
        }

        Err(Error::MissingRequirements {
            task: task.to_string(),
            missing: missing.iter().map(ToString::to_string).collect(),
            usage: definition.spec.usage().to_string(),
        })
    }

    /// Lists the entries of a feed, filtered by title if one was given.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the first page cannot be
    /// fetched, or the title pattern is invalid.
    #[instrument(skip(self, ctx), fields(feed = ctx.get("feed")))]
    pub fn list(&self, ctx: &AttributeContext) -> Result<Vec<Entry>> {
        self.validate("list", ctx)?;
        let entries = self.fetch_all(ctx)?;
        filter_by_title(entries, ctx.get("title"), self.settings.use_regex)
    }

    /// Returns the single entry matching the title or id.
    ///
    /// Asks the user to choose when several entries match.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the first page cannot be
    /// fetched, or the selection is invalid.
    #[instrument(skip(self, ctx), fields(feed = ctx.get("feed")))]
    pub fn get(&self, ctx: &AttributeContext) -> Result<Option<Entry>> {
        self.validate("get", ctx)?;
        let entries = self.fetch_matching_id(ctx)?;
        EntrySelector::new(self.prompt, self.settings.use_regex)
            .select_one(entries, ctx.get("title"))
    }

    /// Deletes every entry matching the title or id.
    ///
    /// With `delete_prompt` on, each deletion is confirmed first. A failed
    /// delete is logged and counted; the remaining entries are still tried.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the first page cannot be
    /// fetched, the title pattern is invalid, or input cannot be read.
    #[instrument(skip(self, ctx), fields(feed = ctx.get("feed")))]
    pub fn delete(&self, ctx: &AttributeContext, entry_kind: &str) -> Result<DeleteReport> {
        self.validate("delete", ctx)?;
        let entries = self.fetch_matching_id(ctx)?;
        let entries = filter_by_title(entries, ctx.get("title"), self.settings.use_regex)?;

        let default = self.settings.delete_by_default;
        let choices = if default { "(Y/n)" } else { "(y/N)" };
        let mut report = DeleteReport::default();

        for entry in &entries {
            if self.settings.delete_prompt {
                let question = format!(
                    "Are you SURE you want to delete {entry_kind} \"{}\"? {choices}: ",
                    entry.display_title()
                );
                if !self.prompt.confirm(&question, default)? {
                    report.skipped += 1;
                    continue;
                }
            }

            match self.source.delete(entry) {
                Ok(()) => {
                    metrics::counter!("entries_deleted_total").increment(1);
                    report.deleted += 1;
                },
                Err(err) => {
                    tracing::warn!(id = %entry.id, "Could not delete {entry_kind}: {err}");
                    report.failed += 1;
                },
            }
        }

        tracing::info!(
            deleted = report.deleted,
            skipped = report.skipped,
            failed = report.failed,
            "Delete finished"
        );
        Ok(report)
    }

    /// Edits the tags of every entry matching the title.
    ///
    /// Tags come from the `tags` attribute, or from the prompt when
    /// `tags_prompt` is on. A failed write is logged and counted; the
    /// remaining entries are still tried.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequirements`] if no tags were supplied and
    /// prompting is off, or an error if the first page cannot be fetched.
    #[instrument(skip(self, ctx), fields(feed = ctx.get("feed")))]
    pub fn tag(&self, ctx: &AttributeContext) -> Result<TagReport> {
        let task = self.validate("tag", ctx)?;

        let tags = match ctx.get("tags") {
            Some(tags) => tags.to_string(),
            None if self.settings.tags_prompt => self
                .prompt
                .read_line("Enter tags (tag1, -removed, --): ")?,
            None => {
                return Err(Error::MissingRequirements {
                    task: task.name.clone(),
                    missing: vec!["tags".to_string()],
                    usage: task.spec.usage().to_string(),
                });
            },
        };

        let edit = parse_tag_edit(&tags);
        if edit.is_empty() {
            tracing::info!("No tag changes requested");
            return Ok(TagReport::default());
        }

        let entries = self.fetch_all(ctx)?;
        let entries = filter_by_title(entries, ctx.get("title"), self.settings.use_regex)?;

        let mut report = TagReport::default();
        for entry in &entries {
            let new_tags = edit.apply(&entry.tags);
            match self.source.set_tags(entry, &new_tags) {
                Ok(()) => {
                    metrics::counter!("entries_retagged_total").increment(1);
                    report.updated += 1;
                },
                Err(err) => {
                    tracing::warn!(id = %entry.id, "Could not update tags: {err}");
                    report.failed += 1;
                },
            }
        }

        tracing::info!(
            updated = report.updated,
            failed = report.failed,
            edit = %edit,
            "Tags updated"
        );
        Ok(report)
    }

    fn fetch_all(&self, ctx: &AttributeContext) -> Result<Vec<Entry>> {
        let feed = ctx.get("feed").unwrap_or_default();
        FeedAggregator::new(self.source, self.settings.feed)
            .aggregate(feed)
            .into_result()
    }

    fn fetch_matching_id(&self, ctx: &AttributeContext) -> Result<Vec<Entry>> {
        let mut entries = self.fetch_all(ctx)?;
        if let Some(id) = ctx.get("id") {
            entries.retain(|entry| entry.id == id);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MemoryFeedSource;
    use crate::prompt::ScriptedPrompt;

    const FEED: &str = "mem://albums";

    fn source() -> MemoryFeedSource {
        MemoryFeedSource::chained(
            FEED,
            vec![
                vec![
                    Entry::new("a1", "Vacation 2009").with_tags(["beach", "family"]),
                    Entry::new("a2", "Vacation 2010").with_tags(["beach"]),
                ],
                vec![Entry::new("a3", "Work")],
            ],
        )
    }

    fn dispatcher<'a>(
        source: &'a MemoryFeedSource,
        prompt: &'a ScriptedPrompt,
    ) -> CommandDispatcher<'a, MemoryFeedSource, ScriptedPrompt> {
        let registry = TaskRegistry::standard().expect("standard tasks");
        CommandDispatcher::new(registry, source, prompt)
    }

    #[test]
    fn test_standard_usage_strings() {
        let registry = TaskRegistry::standard().expect("standard tasks");
        let usage = |name: &str| registry.get(name).map(|t| t.spec.usage().to_string());

        assert_eq!(
            usage("list").as_deref(),
            Some("Requires: feed Optional: title, fields, delimiter")
        );
        assert_eq!(
            usage("delete").as_deref(),
            Some("Requires: feed AND (title OR id)")
        );
        assert_eq!(registry.iter().count(), 4);
    }

    #[test]
    fn test_duplicate_task_rejected() {
        let mut registry = TaskRegistry::standard().expect("standard tasks");
        let spec = RequirementSpec::builder().build().expect("empty spec");
        let result = registry.register(Task::new("list", "again", spec));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_reports_missing_before_fetch() {
        let source = source();
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let ctx = AttributeContext::new().with("feed", FEED);

        let err = dispatcher(&source, &prompt)
            .get(&ctx)
            .expect_err("missing title or id");
        match err {
            Error::MissingRequirements { task, missing, .. } => {
                assert_eq!(task, "get");
                assert_eq!(missing, vec!["(title OR id)"]);
            },
            other => panic!("unexpected error: {other}"),
        }
        assert!(source.requests().is_empty());
    }

    #[test]
    fn test_unknown_task() {
        let source = source();
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let dispatcher = dispatcher(&source, &prompt);
        let result = dispatcher.validate("upload", &AttributeContext::new());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_list_filters_by_title() {
        let source = source();
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let ctx = AttributeContext::new()
            .with("feed", FEED)
            .with("title", "Vac");

        let entries = dispatcher(&source, &prompt).list(&ctx).expect("list");
        assert_eq!(entries.len(), 2);
        assert_eq!(source.requests().len(), 2);
    }

    #[test]
    fn test_list_surfaces_first_page_failure() {
        let source = source().failing_at(FEED);
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let ctx = AttributeContext::new().with("feed", FEED);

        let result = dispatcher(&source, &prompt).list(&ctx);
        assert!(matches!(result, Err(Error::Request(_))));
    }

    #[test]
    fn test_get_by_id() {
        let source = source();
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let ctx = AttributeContext::new().with("feed", FEED).with("id", "a3");

        let entry = dispatcher(&source, &prompt).get(&ctx).expect("get");
        assert_eq!(entry.map(|e| e.id), Some("a3".to_string()));
    }

    #[test]
    fn test_get_ambiguous_prompts() {
        let source = source();
        let prompt = ScriptedPrompt::new(["1"]);
        let ctx = AttributeContext::new()
            .with("feed", FEED)
            .with("title", "Vacation");

        let entry = dispatcher(&source, &prompt).get(&ctx).expect("get");
        assert_eq!(entry.map(|e| e.id), Some("a1".to_string()));
    }

    #[test]
    fn test_delete_with_prompt_defaults() {
        let source = source();
        let prompt = ScriptedPrompt::new(["", "n"]);
        let ctx = AttributeContext::new()
            .with("feed", FEED)
            .with("title", "Vacation");

        let report = dispatcher(&source, &prompt)
            .delete(&ctx, "album")
            .expect("delete");
        assert_eq!(
            report,
            DeleteReport {
                deleted: 1,
                skipped: 1,
                failed: 0
            }
        );
        assert_eq!(source.deleted(), vec!["a1"]);
        assert_eq!(
            prompt.transcript()[0],
            "Are you SURE you want to delete album \"Vacation 2009\"? (Y/n): "
        );
    }

    #[test]
    fn test_delete_default_no() {
        let source = source();
        let prompt = ScriptedPrompt::new(["", "y"]);
        let ctx = AttributeContext::new()
            .with("feed", FEED)
            .with("title", "Vacation");
        let settings = DispatchSettings {
            delete_by_default: false,
            ..DispatchSettings::default()
        };

        let report = dispatcher(&source, &prompt)
            .with_settings(settings)
            .delete(&ctx, "album")
            .expect("delete");
        assert_eq!(report.deleted, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(source.deleted(), vec!["a2"]);
        assert!(prompt.transcript()[0].ends_with("(y/N): "));
    }

    #[test]
    fn test_delete_failure_does_not_abort() {
        let source = source().failing_at("a1");
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let ctx = AttributeContext::new()
            .with("feed", FEED)
            .with("title", "Vacation");
        let settings = DispatchSettings {
            delete_prompt: false,
            ..DispatchSettings::default()
        };

        let report = dispatcher(&source, &prompt)
            .with_settings(settings)
            .delete(&ctx, "album")
            .expect("delete");
        assert_eq!(report.failed, 1);
        assert_eq!(report.deleted, 1);
        assert_eq!(source.deleted(), vec!["a2"]);
    }

    #[test]
    fn test_tag_applies_edit() {
        let source = source();
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let ctx = AttributeContext::new()
            .with("feed", FEED)
            .with("title", "Vacation")
            .with("tags", "sun, -beach");

        let report = dispatcher(&source, &prompt).tag(&ctx).expect("tag");
        assert_eq!(report, TagReport { updated: 2, failed: 0 });
        assert_eq!(
            source.tags_of("a1"),
            Some(vec!["family".to_string(), "sun".to_string()])
        );
        assert_eq!(source.tags_of("a2"), Some(vec!["sun".to_string()]));
    }

    #[test]
    fn test_tag_prompts_when_enabled() {
        let source = source();
        let prompt = ScriptedPrompt::new(["--, fresh"]);
        let ctx = AttributeContext::new()
            .with("feed", FEED)
            .with("title", "Work");
        let settings = DispatchSettings {
            tags_prompt: true,
            ..DispatchSettings::default()
        };

        let report = dispatcher(&source, &prompt)
            .with_settings(settings)
            .tag(&ctx)
            .expect("tag");
        assert_eq!(report.updated, 1);
        assert_eq!(source.tags_of("a3"), Some(vec!["fresh".to_string()]));
    }

    #[test]
    fn test_tag_without_tags_or_prompt() {
        let source = source();
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let ctx = AttributeContext::new()
            .with("feed", FEED)
            .with("title", "Work");

        let result = dispatcher(&source, &prompt).tag(&ctx);
        assert!(matches!(
            result,
            Err(Error::MissingRequirements { ref missing, .. }) if missing == &["tags"]
        ));
        assert!(source.requests().is_empty());
    }

    #[test]
    fn test_tag_failure_does_not_abort() {
        let source = MemoryFeedSource::chained(
            FEED,
            vec![vec![
                Entry::new("t1", "Trip"),
                Entry::new("t2", "Trip"),
                Entry::new("t3", "Trip"),
            ]],
        )
        .failing_at("t2");
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        let ctx = AttributeContext::new()
            .with("feed", FEED)
            .with("title", "Trip")
            .with("tags", "x");

        let report = dispatcher(&source, &prompt).tag(&ctx).expect("tag");
        assert_eq!(report, TagReport { updated: 2, failed: 1 });
        assert_eq!(source.tags_of("t1"), Some(vec!["x".to_string()]));
        assert_eq!(source.tags_of("t2"), None);
        assert_eq!(source.tags_of("t3"), Some(vec!["x".to_string()]));
    }
}
