//! Title matching and interactive disambiguation.

use crate::models::Entry;
use crate::prompt::Prompt;
use crate::{Error, Result};
use regex::Regex;
use tracing::instrument;

/// Narrows `entries` to those whose title matches `title`.
///
/// With no title every entry is kept. With `use_regex`, `title` is a pattern
/// anchored at the start of the entry title; otherwise titles must be equal.
/// Entries without a title never match a title filter.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `title` is not a valid pattern.
pub fn filter_by_title(
    entries: Vec<Entry>,
    title: Option<&str>,
    use_regex: bool,
) -> Result<Vec<Entry>> {
    let Some(title) = title else {
        return Ok(entries);
    };

    if use_regex {
        let pattern = Regex::new(&format!("^(?:{title})"))
            .map_err(|e| Error::InvalidInput(format!("invalid title pattern '{title}': {e}")))?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.title().is_some_and(|t| pattern.is_match(t)))
            .collect())
    } else {
        Ok(entries
            .into_iter()
            .filter(|entry| entry.title() == Some(title))
            .collect())
    }
}

/// Picks a single entry, asking the user when a title is ambiguous.
pub struct EntrySelector<'a, P: Prompt + ?Sized> {
    prompt: &'a P,
    use_regex: bool,
}

impl<'a, P: Prompt + ?Sized> EntrySelector<'a, P> {
    /// Creates a selector.
    #[must_use]
    pub const fn new(prompt: &'a P, use_regex: bool) -> Self {
        Self { prompt, use_regex }
    }

    /// Filters `entries` by `title` and returns exactly one of them.
    ///
    /// Returns `None` when nothing matches. When several entries match, they
    /// are listed 1-based and the user is asked to choose.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid, the answer is not a number,
    /// or input cannot be read.
    #[instrument(skip(self, entries), fields(candidates = entries.len()))]
    pub fn select_one(&self, entries: Vec<Entry>, title: Option<&str>) -> Result<Option<Entry>> {
        let mut matches = filter_by_title(entries, title, self.use_regex)?;

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => {
                self.prompt.display(&format!(
                    "More than one match for title {}",
                    title.unwrap_or_default()
                ));
                for (n, entry) in matches.iter().enumerate() {
                    self.prompt
                        .display(&format!("{}) {}", n + 1, entry.display_title()));
                }
                let index = self
                    .prompt
                    .choose_index("Please select one of the items by number: ", count)?;
                tracing::debug!(index, "Entry selected");
                Ok(Some(matches.swap_remove(index)))
            },
        }
    }
}
