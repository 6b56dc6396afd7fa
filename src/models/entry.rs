//! Feed entry records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record returned within a feed (a photo, a document, a contact...).
///
/// The core only reads `title` and the identity (`id`, `edit_link`). The
/// remaining fields exist for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    /// Service-assigned identifier.
    pub id: String,
    /// Human-readable title, if the service provides one.
    #[serde(default)]
    pub title: Option<String>,
    /// Summary or description text.
    #[serde(default)]
    pub summary: Option<String>,
    /// Tags, keywords, or labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Link to the page hosting the content.
    #[serde(default)]
    pub html_link: Option<String>,
    /// Direct link to the content itself.
    #[serde(default)]
    pub content_src: Option<String>,
    /// Link used for mutating requests (delete, update).
    #[serde(default)]
    pub edit_link: Option<String>,
    /// Last modification time.
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}

impl Entry {
    /// Creates an entry with the given id and title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns the title, treating an empty title as absent.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Returns the title for display, or an empty string.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Returns the link mutating requests should target.
    ///
    /// Falls back to the id when the service gave no edit link.
    #[must_use]
    pub fn mutation_target(&self) -> &str {
        self.edit_link.as_deref().unwrap_or(&self.id)
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
