//! In-process feed source.
//!
//! Serves pages from a map keyed by URI and records every request it sees.
//! Used for `--offline` runs and tests.

use super::{EntryMutator, FeedSource};
use crate::models::{Entry, FeedPage, RequestFailure};
use crate::{Error, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Feed source serving pages from memory.
#[derive(Debug, Default)]
pub struct MemoryFeedSource {
    pages: BTreeMap<String, FeedPage>,
    failing: BTreeSet<String>,
    requests: RefCell<Vec<String>>,
    deleted: RefCell<Vec<String>>,
    retagged: RefCell<BTreeMap<String, Vec<String>>>,
}

impl MemoryFeedSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain of pages starting at `start_uri`.
    ///
    /// Page `n > 0` lives at `{start_uri}#page={n}`; every page except the
    /// last links to its successor.
    #[must_use]
    pub fn chained(start_uri: &str, pages: Vec<Vec<Entry>>) -> Self {
        let count = pages.len();
        let locator = |n: usize| {
            if n == 0 {
                start_uri.to_string()
            } else {
                format!("{start_uri}#page={n}")
            }
        };

        let mut source = Self::new();
        for (n, entries) in pages.into_iter().enumerate() {
            let next = (n + 1 < count).then(|| locator(n + 1));
            source = source.with_page(locator(n), FeedPage::new(entries, next));
        }
        source
    }

    /// Loads pages from a JSON object mapping URIs to pages.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_offline_feed".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        Self::from_json(&contents)
    }

    /// Parses pages from a JSON object mapping URIs to pages.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let pages: BTreeMap<String, FeedPage> =
            serde_json::from_str(json).map_err(|e| Error::OperationFailed {
                operation: "parse_offline_feed".to_string(),
                cause: e.to_string(),
            })?;
        Ok(Self {
            pages,
            ..Self::default()
        })
    }

    /// Adds a page.
    #[must_use]
    pub fn with_page(mut self, uri: impl Into<String>, page: FeedPage) -> Self {
        self.pages.insert(uri.into(), page);
        self
    }

    /// Makes every request to `uri` fail with a server error.
    #[must_use]
    pub fn failing_at(mut self, uri: impl Into<String>) -> Self {
        self.failing.insert(uri.into());
        self
    }

    /// Returns every URI fetched so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Returns the ids of deleted entries, in order.
    #[must_use]
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.borrow().clone()
    }

    /// Returns the tags last written for an entry.
    #[must_use]
    pub fn tags_of(&self, entry_id: &str) -> Option<Vec<String>> {
        self.retagged.borrow().get(entry_id).cloned()
    }

    fn check_failing(&self, target: &str) -> Result<()> {
        if self.failing.contains(target) {
            return Err(
                RequestFailure::new(Some(500), "Internal Server Error", target.to_string()).into(),
            );
        }
        Ok(())
    }
}

impl FeedSource for MemoryFeedSource {
    fn fetch(&self, uri: &str) -> Result<Option<FeedPage>> {
        self.requests.borrow_mut().push(uri.to_string());

        let key = strip_max_results(uri);
        self.check_failing(&key)?;
        Ok(self.pages.get(&key).cloned())
    }
}

impl EntryMutator for MemoryFeedSource {
    fn delete(&self, entry: &Entry) -> Result<()> {
        self.check_failing(entry.mutation_target())?;
        self.deleted.borrow_mut().push(entry.id.clone());
        Ok(())
    }

    fn set_tags(&self, entry: &Entry, tags: &[String]) -> Result<()> {
        self.check_failing(entry.mutation_target())?;
        self.retagged
            .borrow_mut()
            .insert(entry.id.clone(), tags.to_vec());
        Ok(())
    }
}

/// Removes any `max-results` query parameter so page keys stay stable.
fn strip_max_results(uri: &str) -> String {
    let Some((base, query)) = uri.split_once('?') else {
        return uri.to_string();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|param| !param.starts_with("max-results="))
        .collect();
    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", kept.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_max_results() {
        assert_eq!(strip_max_results("mem://f?max-results=5"), "mem://f");
        assert_eq!(strip_max_results("mem://f?a=1&max-results=5"), "mem://f?a=1");
        assert_eq!(strip_max_results("mem://f"), "mem://f");
    }

    #[test]
    fn test_chained_pages_link() {
        let source = MemoryFeedSource::chained(
            "mem://f",
            vec![vec![Entry::new("1", "a")], vec![Entry::new("2", "b")]],
        );
        let first = source.fetch("mem://f").expect("fetch").expect("page");
        assert_eq!(first.next.as_deref(), Some("mem://f#page=1"));

        let second = source.fetch("mem://f#page=1").expect("fetch").expect("page");
        assert!(second.next.is_none());
        assert_eq!(source.requests().len(), 2);
    }

    #[test]
    fn test_unknown_uri_is_end_of_data() {
        let source = MemoryFeedSource::new();
        assert!(source.fetch("mem://nothing").expect("fetch").is_none());
    }

    #[test]
    fn test_from_json() {
        let source = MemoryFeedSource::from_json(
            r#"{"mem://f": {"entries": [{"id": "1", "title": "a"}], "next": null}}"#,
        )
        .expect("valid json");
        let page = source.fetch("mem://f?max-results=10").expect("fetch").expect("page");
        assert_eq!(page.entries.len(), 1);
    }

    #[test]
    fn test_failing_mutation() {
        let source = MemoryFeedSource::new().failing_at("2");
        assert!(source.delete(&Entry::new("1", "a")).is_ok());
        assert!(source.delete(&Entry::new("2", "b")).is_err());
        assert_eq!(source.deleted(), vec!["1"]);
    }
}
