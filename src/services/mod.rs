//! Business logic services.
//!
//! Services validate invocations, walk feeds, pick entries, and apply tag
//! edits. They reach the network and the user only through the capability
//! traits in [`crate::feed`] and [`crate::prompt`].

mod aggregator;
mod dispatcher;
mod requirements;
mod selector;
mod tags;

pub use aggregator::{FeedAggregator, FeedSettings, MAX_RESULTS_PARAM, set_max_results};
pub use dispatcher::{
    CommandDispatcher, DeleteReport, DispatchSettings, TagReport, Task, TaskRegistry,
};
pub use requirements::{Requirement, RequirementSpec, RequirementSpecBuilder};
pub use selector::{EntrySelector, filter_by_title};
pub use tags::parse_tag_edit;
