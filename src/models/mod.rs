//! Data models for feedcl.
//!
//! This module contains the records that flow between the feed source,
//! the core services, and the rendering layer.

mod attributes;
mod entry;
mod feed;
mod tags;

pub use attributes::AttributeContext;
pub use entry::Entry;
pub use feed::{Aggregation, FeedPage, RequestFailure};
pub use tags::TagEdit;
