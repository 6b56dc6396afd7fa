//! Feed service capabilities.
//!
//! The core services only talk to a feed service through these traits:
//! - [`FeedSource`] - fetch one page of a feed
//! - [`EntryMutator`] - delete an entry or replace its tags
//!
//! Two implementations are provided: [`HttpFeedSource`] for a live JSON feed
//! service and [`MemoryFeedSource`] for in-process pages.

mod http;
mod memory;

pub use http::{HttpFeedConfig, HttpFeedSource};
pub use memory::MemoryFeedSource;

use crate::Result;
use crate::models::{Entry, FeedPage};

/// Trait for fetching feed pages.
pub trait FeedSource {
    /// Fetches the page at `uri`.
    ///
    /// Returns `Ok(None)` when the source has no page there (end of data).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Request`] if the request fails.
    fn fetch(&self, uri: &str) -> Result<Option<FeedPage>>;
}

/// Trait for mutating entries.
pub trait EntryMutator {
    /// Deletes an entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Request`] if the request fails.
    fn delete(&self, entry: &Entry) -> Result<()>;

    /// Replaces the tags of an entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Request`] if the request fails.
    fn set_tags(&self, entry: &Entry, tags: &[String]) -> Result<()>;
}
