//! # feedcl
//!
//! A command-line front end for paginated, feed-based data services.
//!
//! feedcl turns user invocations into validated, paginated, and mutating
//! requests against a remote feed service and renders the results as text.
//!
//! ## Features
//!
//! - Task signatures with AND/OR requirement checking before any network call
//! - Cursor-following feed aggregation with an optional results cap
//! - Title filtering (exact or prefix-anchored regex) with interactive disambiguation
//! - A compact tag-edit grammar: `tag1, -tag2, \-literal, --`
//! - Pluggable feed sources and prompts behind small capability traits
//!
//! ## Example
//!
//! ```rust
//! use feedcl::services::parse_tag_edit;
//!
//! let edit = parse_tag_edit("tag1, tag2, -tag3");
//! assert!(edit.add.contains("tag1"));
//! assert!(edit.remove.contains("tag3"));
//! assert!(!edit.replace_all);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod feed;
pub mod models;
pub mod observability;
pub mod prompt;
pub mod rendering;
pub mod services;

pub use config::{FeedclConfig, ServiceSettings};
pub use feed::{EntryMutator, FeedSource, HttpFeedSource, MemoryFeedSource};
pub use models::{Aggregation, AttributeContext, Entry, FeedPage, RequestFailure, TagEdit};
pub use prompt::{Prompt, ScriptedPrompt, TerminalPrompt};
pub use services::{
    CommandDispatcher, EntrySelector, FeedAggregator, Requirement, RequirementSpec, TaskRegistry,
};

/// Error type for feedcl operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Bad regex, unknown task, inconsistent requirement spec |
/// | `MissingRequirements` | A required attribute or alternative group is unsatisfied |
/// | `Request` | The feed service rejected or failed a request |
/// | `InvalidSelection` | Interactive selection received non-numeric input |
/// | `OperationFailed` | I/O, config parsing, logging initialization |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A task was invoked without the attributes it requires.
    ///
    /// Raised by the dispatcher before any request is sent. Never retried.
    #[error("task '{task}' is missing {}; {usage}", missing.join(", "))]
    MissingRequirements {
        /// The task that was invoked.
        task: String,
        /// Rendered unsatisfied terms, e.g. `title` or `(title OR id)`.
        missing: Vec<String>,
        /// The task's usage string.
        usage: String,
    },

    /// A request against the feed service failed.
    #[error("request failed: {0}")]
    Request(RequestFailure),

    /// Interactive selection received input that is not a number.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl From<RequestFailure> for Error {
    fn from(failure: RequestFailure) -> Self {
        Self::Request(failure)
    }
}

/// Result type alias for feedcl operations.
pub type Result<T> = std::result::Result<T, Error>;
