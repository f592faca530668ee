//! Paginated collection fetching
//!
//! Jira families disagree on how a collection signals its end:
//!
//! - [`Strategy::Cursor`]: follow the `next` link until it is null or absent.
//! - [`Strategy::OffsetIsLast`]: request `startAt=<offset>`, advance the offset by
//!   `maxResults` and stop once `isLast` is true.
//! - [`Strategy::CountThreshold`]: sum `maxResults` and stop once the sum reaches
//!   the `total` reported by the most recent page.
//!
//! All three share one sequential fetch/accumulate loop in [`Paginator`]; they only
//! differ in how [`FetchState`] advances and when it reports completion.
//!
//! A page reporting `startAt`, `maxResults` and `total` all as zero ends any run
//! successfully without contributing items.

use std::future::Future;

use serde_json::Value;
use tracing::{debug, instrument, trace};
use url::Url;

use super::{
    error::{ClientError, Result},
    page::{Page, Record},
};

/// Single-page fetch primitive driven by the pagination loop
pub trait PageFetcher {
    /// GET `url` and return the parsed JSON body
    fn fetch_page(&self, url: &str, operation: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// Pagination convention of an endpoint family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Cursor,
    OffsetIsLast,
    CountThreshold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    Link { next: Option<String> },
    Offset { start_at: u64, is_last: bool },
    Count { count: u64, total: Option<u64> },
}

/// Progress of one pagination run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState {
    seed: Url,
    cursor: Cursor,
    pages: u32,
}

impl FetchState {
    pub fn new(strategy: Strategy, seed: &str) -> Result<Self> {
        let seed = Url::parse(seed).map_err(|_| ClientError::invalid_url(seed))?;
        let cursor = match strategy {
            Strategy::Cursor => Cursor::Link { next: Some(seed.to_string()) },
            Strategy::OffsetIsLast => Cursor::Offset { start_at: 0, is_last: false },
            // total stays unknown until the first page reports it
            Strategy::CountThreshold => Cursor::Count { count: 0, total: None },
        };

        Ok(Self { seed, cursor, pages: 0 })
    }

    /// Number of pages consumed so far
    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn is_done(&self) -> bool {
        match &self.cursor {
            Cursor::Link { next } => next.is_none(),
            Cursor::Offset { is_last, .. } => *is_last,
            Cursor::Count { count, total } => total.is_some_and(|total| *count >= total),
        }
    }

    /// URL of the next page, `None` once the run is done
    pub fn request_url(&self) -> Option<String> {
        if self.is_done() {
            return None;
        }

        match &self.cursor {
            Cursor::Link { next } => next.clone(),
            Cursor::Offset { start_at, .. } => Some(self.seed_with_start_at(*start_at)),
            Cursor::Count { .. } if self.pages == 0 => Some(self.seed.to_string()),
            Cursor::Count { count, .. } => Some(self.seed_with_start_at(*count)),
        }
    }

    /// Fold one page's metadata into the state
    pub fn advance(mut self, page: &Page, operation: &str) -> Result<Self> {
        self.pages += 1;

        match &mut self.cursor {
            Cursor::Link { next } => {
                *next = page.next.clone();
            },
            Cursor::Offset { start_at, is_last } => {
                *start_at = step(*start_at, page, operation)?;
                *is_last = required(page.is_last, "isLast", operation)?;
            },
            Cursor::Count { count, total } => {
                *count = step(*count, page, operation)?;
                *total = Some(required(page.total, "total", operation)?);
            },
        }

        Ok(self)
    }

    // offsets are always relative to the original query
    fn seed_with_start_at(&self, start_at: u64) -> String {
        let mut url = self.seed.clone();
        url.query_pairs_mut()
            .append_pair("startAt", &start_at.to_string());
        url.into()
    }
}

fn step(offset: u64, page: &Page, operation: &str) -> Result<u64> {
    let max_results = required(page.max_results, "maxResults", operation)?;
    offset
        .checked_add(max_results)
        .ok_or_else(|| ClientError::malformed_page(operation, "maxResults", "overflows the offset"))
}

fn required<T>(value: Option<T>, field: &str, operation: &str) -> Result<T> {
    value.ok_or_else(|| ClientError::malformed_page(operation, field, "is missing"))
}

/// Concatenates page items in arrival order
#[derive(Debug, Default)]
pub struct Aggregator {
    items: Vec<Record>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, page: Page) {
        self.items.extend(page.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> Vec<Record> {
        self.items
    }
}

/// Walks paginated collections through a [`PageFetcher`]
#[derive(Debug)]
pub struct Paginator<'a, F> {
    fetcher: &'a F,
    max_pages: u32,
}

impl<'a, F: PageFetcher> Paginator<'a, F> {
    pub fn new(fetcher: &'a F, max_pages: u32) -> Self {
        Self { fetcher, max_pages }
    }

    /// Fetch every page of the collection at `seed` and return the items under `data_key`
    ///
    /// Pages are requested one at a time. The first failing page aborts the run
    /// and nothing accumulated so far is returned.
    #[instrument(skip(self), fields(max_pages = self.max_pages))]
    pub async fn paginate(
        &self,
        seed: &str,
        data_key: &str,
        strategy: Strategy,
        operation: &str,
    ) -> Result<Vec<Record>> {
        let mut state = FetchState::new(strategy, seed)?;
        let mut aggregator = Aggregator::new();

        while let Some(url) = state.request_url() {
            if state.pages() >= self.max_pages {
                return Err(ClientError::PageLimitExceeded {
                    operation: operation.into(),
                    pages: state.pages(),
                });
            }

            trace!(%url, page = state.pages(), "Fetching page");
            let body = self.fetcher.fetch_page(&url, operation).await?;
            let page = Page::parse(body, data_key, operation)?;

            if page.is_degenerate() {
                debug!(page = state.pages(), "No data found, ending run");
                break;
            }

            state = state.advance(&page, operation)?;
            aggregator.push(page);
        }

        debug!(
            pages = state.pages(),
            item_count = aggregator.len(),
            "Pagination complete"
        );
        Ok(aggregator.finish())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use serde_json::json;

    use super::*;

    const SEED: &str = "https://jira.example.com/rest/agile/1.0/board";
    const SEARCH_SEED: &str = "https://jira.example.com/rest/api/2/search?jql=project%3DABC";

    /// Replays canned responses and records every requested URL
    #[derive(Default)]
    struct ScriptedFetcher {
        responses: Mutex<VecDeque<Result<Value>>>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(responses: impl IntoIterator<Item = Result<Value>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::default(),
            }
        }

        fn pages(pages: impl IntoIterator<Item = Value>) -> Self {
            Self::new(pages.into_iter().map(Ok))
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl PageFetcher for ScriptedFetcher {
        async fn fetch_page(&self, url: &str, operation: &str) -> Result<Value> {
            self.requests.lock().unwrap().push(url.to_string());
            let next = self.responses.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Err(ClientError::from_status(operation, 404)))
        }
    }

    fn items(range: std::ops::Range<u64>) -> Vec<Value> {
        range.map(|id| json!({ "id": id })).collect()
    }

    fn offset_page(start_at: u64, max_results: u64, is_last: bool, ids: std::ops::Range<u64>) -> Value {
        json!({
            "startAt": start_at,
            "maxResults": max_results,
            "total": 120,
            "isLast": is_last,
            "values": items(ids),
        })
    }

    fn search_page(start_at: u64, max_results: u64, total: u64, ids: std::ops::Range<u64>) -> Value {
        json!({
            "startAt": start_at,
            "maxResults": max_results,
            "total": total,
            "issues": items(ids),
        })
    }

    fn link_page(next: Option<&str>, ids: std::ops::Range<u64>) -> Value {
        json!({
            "startAt": 0,
            "maxResults": 2,
            "total": 6,
            "next": next,
            "worklogs": items(ids),
        })
    }

    async fn run(fetcher: &ScriptedFetcher, seed: &str, key: &str, strategy: Strategy) -> Result<Vec<Value>> {
        Paginator::new(fetcher, 100).paginate(seed, key, strategy, "test").await
    }

    #[tokio::test]
    async fn test_cursor_follows_next_links() {
        let fetcher = ScriptedFetcher::pages([
            link_page(Some("https://jira.example.com/p2"), 0..2),
            link_page(Some("https://jira.example.com/p3"), 2..4),
            link_page(None, 4..6),
        ]);

        let result = run(&fetcher, SEED, "worklogs", Strategy::Cursor).await.unwrap();

        assert_eq!(result, items(0..6));
        assert_eq!(
            fetcher.requests(),
            vec![SEED, "https://jira.example.com/p2", "https://jira.example.com/p3"]
        );
    }

    #[tokio::test]
    async fn test_offset_advances_by_max_results() {
        let fetcher = ScriptedFetcher::pages([
            offset_page(0, 50, false, 0..50),
            offset_page(50, 50, false, 50..100),
            offset_page(100, 20, true, 100..120),
        ]);

        let result = run(&fetcher, SEED, "values", Strategy::OffsetIsLast).await.unwrap();

        assert_eq!(result, items(0..120));
        assert_eq!(
            fetcher.requests(),
            vec![
                format!("{SEED}?startAt=0"),
                format!("{SEED}?startAt=50"),
                format!("{SEED}?startAt=100"),
            ]
        );
    }

    #[tokio::test]
    async fn test_offset_ignores_server_next_link() {
        let mut first = offset_page(0, 2, false, 0..2);
        first["next"] = json!("https://elsewhere.example.com/bogus");
        let fetcher = ScriptedFetcher::pages([first, offset_page(2, 2, true, 2..4)]);

        run(&fetcher, SEED, "values", Strategy::OffsetIsLast).await.unwrap();

        assert_eq!(fetcher.requests()[1], format!("{SEED}?startAt=2"));
    }

    #[tokio::test]
    async fn test_count_threshold_uses_original_query() {
        let fetcher = ScriptedFetcher::pages([
            search_page(0, 20, 45, 0..20),
            search_page(20, 20, 45, 20..40),
            search_page(40, 20, 45, 40..45),
        ]);

        let result = run(&fetcher, SEARCH_SEED, "issues", Strategy::CountThreshold)
            .await
            .unwrap();

        assert_eq!(result, items(0..45));
        assert_eq!(
            fetcher.requests(),
            vec![
                SEARCH_SEED.to_string(),
                format!("{SEARCH_SEED}&startAt=20"),
                format!("{SEARCH_SEED}&startAt=40"),
            ]
        );
    }

    #[tokio::test]
    async fn test_count_threshold_follows_changing_total() {
        let fetcher = ScriptedFetcher::pages([
            search_page(0, 10, 15, 0..10),
            search_page(10, 10, 30, 10..20),
            search_page(20, 10, 30, 20..30),
        ]);

        let result = run(&fetcher, SEARCH_SEED, "issues", Strategy::CountThreshold)
            .await
            .unwrap();

        assert_eq!(result.len(), 30);
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_degenerate_page_is_empty_success_for_every_strategy() {
        let degenerate = json!({
            "startAt": 0,
            "maxResults": 0,
            "total": 0,
            "isLast": false,
            "next": "https://jira.example.com/never",
            "values": [{"id": 99}],
        });

        for strategy in [Strategy::Cursor, Strategy::OffsetIsLast, Strategy::CountThreshold] {
            let fetcher = ScriptedFetcher::pages([degenerate.clone(), offset_page(0, 1, true, 0..1)]);

            let result = run(&fetcher, SEED, "values", strategy).await.unwrap();

            assert!(result.is_empty(), "{strategy:?}");
            assert_eq!(fetcher.requests().len(), 1, "{strategy:?}");
        }
    }

    #[tokio::test]
    async fn test_degenerate_page_keeps_items_collected_before_it() {
        let degenerate = json!({
            "startAt": 0,
            "maxResults": 0,
            "total": 0,
            "isLast": false,
            "values": [{"id": 99}],
        });
        let fetcher = ScriptedFetcher::pages([
            offset_page(0, 2, false, 0..2),
            degenerate,
            offset_page(2, 2, true, 2..4),
        ]);

        let result = run(&fetcher, SEED, "values", Strategy::OffsetIsLast).await.unwrap();

        assert_eq!(result, items(0..2));
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_max_results_overflowing_offset_is_malformed() {
        let huge = json!({"startAt": 0, "maxResults": u64::MAX, "isLast": false, "values": []});

        let fetcher = ScriptedFetcher::pages([huge.clone(), offset_page(0, 1, true, 0..1)]);
        let err = run(&fetcher, SEED, "values", Strategy::OffsetIsLast).await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedPage { ref field, .. } if field.as_str() == "maxResults"));

        let mut search = huge;
        search["total"] = json!(u64::MAX);
        let fetcher = ScriptedFetcher::pages([search_page(0, 1, 10, 0..1), search]);
        let err = run(&fetcher, SEARCH_SEED, "issues", Strategy::CountThreshold)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedPage { ref field, .. } if field.as_str() == "maxResults"));
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_aborts_run() {
        for status in [400, 401, 403, 404, 500] {
            let fetcher = ScriptedFetcher::new([
                Ok(offset_page(0, 2, false, 0..2)),
                Err(ClientError::from_status("test", status)),
                Ok(offset_page(4, 2, true, 4..6)),
            ]);

            let err = run(&fetcher, SEED, "values", Strategy::OffsetIsLast)
                .await
                .unwrap_err();

            assert_eq!(err.status(), Some(status));
            assert_eq!(err.operation(), Some("test"));
            assert_eq!(fetcher.requests().len(), 2);
        }
    }

    #[tokio::test]
    async fn test_missing_is_last_is_malformed() {
        let fetcher = ScriptedFetcher::pages([json!({"startAt": 0, "maxResults": 5, "values": []})]);

        let err = run(&fetcher, SEED, "values", Strategy::OffsetIsLast).await.unwrap_err();

        assert!(matches!(err, ClientError::MalformedPage { ref field, .. } if field.as_str() == "isLast"));
    }

    #[tokio::test]
    async fn test_missing_total_is_malformed_for_search() {
        let fetcher = ScriptedFetcher::pages([json!({"maxResults": 5, "issues": []})]);

        let err = run(&fetcher, SEARCH_SEED, "issues", Strategy::CountThreshold)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::MalformedPage { ref field, .. } if field.as_str() == "total"));
    }

    #[tokio::test]
    async fn test_page_limit_stops_runaway_run() {
        let stuck = offset_page(0, 0, false, 0..0);
        let fetcher = ScriptedFetcher::pages(std::iter::repeat(stuck).take(10));

        let err = Paginator::new(&fetcher, 3)
            .paginate(SEED, "values", Strategy::OffsetIsLast, "boards")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::PageLimitExceeded { pages: 3, .. }));
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_rerun_yields_identical_result() {
        let pages = [
            search_page(0, 2, 3, 0..2),
            search_page(2, 2, 3, 2..3),
        ];

        let first = run(&ScriptedFetcher::pages(pages.clone()), SEARCH_SEED, "issues", Strategy::CountThreshold)
            .await
            .unwrap();
        let second = run(&ScriptedFetcher::pages(pages), SEARCH_SEED, "issues", Strategy::CountThreshold)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, items(0..3));
    }

    #[test]
    fn test_fetch_state_transitions() {
        let state = FetchState::new(Strategy::CountThreshold, SEARCH_SEED).unwrap();
        assert!(!state.is_done());
        assert_eq!(state.request_url().as_deref(), Some(SEARCH_SEED));

        let page = Page { max_results: Some(50), total: Some(50), ..Default::default() };
        let state = state.advance(&page, "test").unwrap();
        assert!(state.is_done());
        assert_eq!(state.request_url(), None);
        assert_eq!(state.pages(), 1);
    }

    #[test]
    fn test_invalid_seed() {
        let result = FetchState::new(Strategy::Cursor, "board?startAt=0");
        assert!(matches!(result, Err(ClientError::InvalidUrl { .. })));
    }

    #[test]
    fn test_aggregator_preserves_order_and_duplicates() {
        let mut aggregator = Aggregator::new();
        aggregator.push(Page { items: items(0..2), ..Default::default() });
        aggregator.push(Page { items: items(1..3), ..Default::default() });

        assert_eq!(aggregator.len(), 4);
        assert_eq!(
            aggregator.finish(),
            vec![json!({"id": 0}), json!({"id": 1}), json!({"id": 1}), json!({"id": 2})]
        );
    }
}
