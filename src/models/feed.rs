//! Feed pages and aggregation results.

use super::Entry;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of a cursor-linked feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedPage {
    /// Entries on this page, in server order.
    #[serde(default)]
    pub entries: Vec<Entry>,
    /// Locator of the next page; `None` when this is the last page.
    #[serde(default)]
    pub next: Option<String>,
}

impl FeedPage {
    /// Creates a page.
    #[must_use]
    pub const fn new(entries: Vec<Entry>, next: Option<String>) -> Self {
        Self { entries, next }
    }

    /// Creates a final page (no next locator).
    #[must_use]
    pub const fn last(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            next: None,
        }
    }
}

/// Result of walking a feed.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Entries from every fetched page, concatenated in fetch order.
    pub entries: Vec<Entry>,
    /// True when pages were left on the server because results were capped.
    pub truncated: bool,
    /// Set when the first page could not be fetched; `entries` is then empty.
    pub failure: Option<Error>,
}

impl Aggregation {
    /// Creates a failed aggregation.
    #[must_use]
    pub fn failed(error: Error) -> Self {
        Self {
            entries: Vec::new(),
            truncated: false,
            failure: Some(error),
        }
    }

    /// Returns true if the first fetch failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Converts into the entries, or the failure that prevented fetching them.
    pub fn into_result(self) -> crate::Result<Vec<Entry>> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.entries),
        }
    }
}

/// Detail record for a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    /// HTTP status code, when a response was received.
    pub status: Option<u16>,
    /// Reason phrase or transport error description.
    pub reason: String,
    /// Response body, possibly empty.
    pub body: String,
}

impl RequestFailure {
    /// Creates a failure record.
    #[must_use]
    pub fn new(status: Option<u16>, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Creates a failure for an error raised before any response arrived.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::new(None, reason, String::new())
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "{status} ")?;
        }
        f.write_str(&self.reason)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}
