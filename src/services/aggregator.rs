//! Paginated feed aggregation.

use crate::feed::FeedSource;
use crate::models::Aggregation;
use tracing::instrument;

/// Query parameter naming the page size.
pub const MAX_RESULTS_PARAM: &str = "max-results";

/// Paging policy for an aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    /// Page size requested from the service.
    pub max_results: u32,
    /// Stop after the first page even if the server has more.
    pub cap_results: bool,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            max_results: crate::config::LARGE_MAX_RESULTS,
            cap_results: false,
        }
    }
}

/// Adds the `max-results` parameter to `uri` unless it is already named.
///
/// The check is a substring match on the parameter name, so a URI that
/// already carries the parameter is returned unchanged whatever its value.
///
/// # Examples
///
/// ```
/// use feedcl::services::set_max_results;
///
/// assert_eq!(set_max_results("http://x/feed", 50), "http://x/feed?max-results=50");
/// assert_eq!(set_max_results("http://x/feed?a=1", 50), "http://x/feed?a=1&max-results=50");
/// assert_eq!(
///     set_max_results("http://x/feed?max-results=10", 50),
///     "http://x/feed?max-results=10"
/// );
/// ```
#[must_use]
pub fn set_max_results(uri: &str, max: u32) -> String {
    if !uri.contains('?') {
        format!("{uri}?{MAX_RESULTS_PARAM}={max}")
    } else if !uri.contains(MAX_RESULTS_PARAM) {
        format!("{uri}&{MAX_RESULTS_PARAM}={max}")
    } else {
        uri.to_string()
    }
}

/// Walks cursor-linked feed pages.
pub struct FeedAggregator<'a, S: FeedSource + ?Sized> {
    source: &'a S,
    settings: FeedSettings,
}

impl<'a, S: FeedSource + ?Sized> FeedAggregator<'a, S> {
    /// Creates an aggregator over `source`.
    #[must_use]
    pub const fn new(source: &'a S, settings: FeedSettings) -> Self {
        Self { source, settings }
    }

    /// Returns the paging policy.
    #[must_use]
    pub const fn settings(&self) -> FeedSettings {
        self.settings
    }

    /// Fetches the feed at `start_uri` and every page it links to.
    ///
    /// With `cap_results`, only the first page is fetched and `truncated` is
    /// set if the server reported more. A failed first fetch yields an empty
    /// result carrying the failure. A failed later fetch ends the walk with
    /// the entries gathered so far.
    #[instrument(skip(self), fields(max_results = self.settings.max_results, cap_results = self.settings.cap_results))]
    pub fn aggregate(&self, start_uri: &str) -> Aggregation {
        let uri = set_max_results(start_uri, self.settings.max_results);

        let first = match self.source.fetch(&uri) {
            Ok(Some(page)) => page,
            Ok(None) => return Aggregation::default(),
            Err(err) => {
                tracing::warn!(uri = %uri, "Failed to get entries: {err}");
                metrics::counter!("feed_fetch_failures_total").increment(1);
                return Aggregation::failed(err);
            },
        };
        metrics::counter!("feed_pages_fetched_total").increment(1);

        let mut entries = first.entries;
        let mut next = first.next;

        if next.is_some() && self.settings.cap_results {
            tracing::warn!(
                "Leaving data that matches query on server. \
                 Increase max_results or set cap_results to false."
            );
            metrics::counter!("feed_truncated_total").increment(1);
            return Aggregation {
                entries,
                truncated: true,
                failure: None,
            };
        }

        while let Some(locator) = next.take() {
            match self.source.fetch(&locator) {
                Ok(Some(page)) => {
                    metrics::counter!("feed_pages_fetched_total").increment(1);
                    entries.extend(page.entries);
                    next = page.next;
                },
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(uri = %locator, "Stopping at failed page: {err}");
                    metrics::counter!("feed_fetch_failures_total").increment(1);
                    break;
                },
            }
        }

        tracing::debug!(entries = entries.len(), "Aggregated feed");
        Aggregation {
            entries,
            truncated: false,
            failure: None,
        }
    }
}
