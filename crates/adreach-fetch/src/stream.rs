//! Cursor-driven crawling.

use std::time::Duration;

use adreach_types::AdRecord;
use futures::stream::{self, Stream, StreamExt};
use reqwest::Url;
use tokio::time::Instant;
use tracing::debug;

use crate::{FetchError, Page, PageSource, url::redacted};

/// Optional bounds on a crawl, checked before each follow-up page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Maximum number of pages to fetch.
    pub max_pages: Option<usize>,
    /// Point in time after which no further page is requested.
    pub deadline: Option<Instant>,
}

impl CrawlLimits {
    /// No limits: crawl until the archive runs out of pages.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_pages: None,
            deadline: None,
        }
    }

    /// Sets the page limit.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline to `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    fn check(&self, pages_fetched: usize) -> Result<(), FetchError> {
        if let Some(max) = self.max_pages
            && pages_fetched >= max
        {
            return Err(FetchError::LimitReached(format!(
                "page limit of {max} reached"
            )));
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(FetchError::LimitReached(format!(
                "deadline reached after {pages_fetched} pages"
            )));
        }
        Ok(())
    }
}

/// Where a crawl stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    /// Nothing fetched yet; the seed URL is next.
    Start(Url),
    /// At least one page fetched; the cursor is the next page.
    HasPage(Url),
    /// No further pages. Terminal.
    Done,
}

impl CrawlState {
    /// Returns true once the crawl can yield nothing more.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Walks the archive page by page, following `paging.next`.
#[derive(Debug)]
pub struct Crawler<S> {
    source: S,
    state: CrawlState,
    limits: CrawlLimits,
    pages_fetched: usize,
}

impl<S: PageSource> Crawler<S> {
    /// Creates a crawler that starts at `seed`.
    #[must_use]
    pub const fn new(source: S, seed: Url, limits: CrawlLimits) -> Self {
        Self {
            source,
            state: CrawlState::Start(seed),
            limits,
            pages_fetched: 0,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Returns the number of pages fetched so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetches the next page, or returns `None` once the crawl is done.
    ///
    /// Any error moves the crawler to [`CrawlState::Done`].
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or a limit is reached.
    pub async fn next_page(&mut self) -> Result<Option<Page>, FetchError> {
        let cursor = match std::mem::replace(&mut self.state, CrawlState::Done) {
            CrawlState::Done => return Ok(None),
            CrawlState::Start(seed) => seed,
            CrawlState::HasPage(cursor) => {
                self.limits.check(self.pages_fetched)?;
                cursor
            }
        };

        let page = self.source.fetch_page(&cursor).await?;
        self.pages_fetched += 1;
        debug!(
            url = %redacted(&cursor),
            records = page.len(),
            last = page.is_last(),
            "page fetched"
        );

        if let Some(next) = &page.next_cursor {
            self.state = CrawlState::HasPage(next.clone());
        }
        Ok(Some(page))
    }
}

/// Turns a crawler into a lazy stream of pages.
///
/// Pages are requested one at a time as the stream is polled. A fatal error
/// is yielded once and then the stream ends.
pub fn page_stream<S: PageSource>(
    crawler: Crawler<S>,
) -> impl Stream<Item = Result<Page, FetchError>> {
    stream::unfold(crawler, |mut crawler| async move {
        crawler
            .next_page()
            .await
            .transpose()
            .map(|item| (item, crawler))
    })
}

/// Flattens a page stream into individual records, preserving order.
pub fn flatten_records(
    page_stream: impl Stream<Item = Result<Page, FetchError>>,
) -> impl Stream<Item = Result<AdRecord, FetchError>> {
    page_stream.flat_map(|result| match result {
        Ok(page) => stream::iter(page.records.into_iter().map(Ok)).left_stream(),
        Err(e) => stream::once(async move { Err(e) }).right_stream(),
    })
}

/// Crawls from `seed` and streams every record of every page.
///
/// # Example
///
/// ```no_run
/// use adreach_fetch::{ArchiveClient, CrawlLimits, crawl, url::ArchiveQuery};
/// use futures::StreamExt;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ArchiveClient::with_defaults()?;
/// let seed = client.seed_url(&ArchiveQuery::new("TOKEN").with_page_ids(["123"]))?;
///
/// let mut records = std::pin::pin!(crawl(&client, seed, CrawlLimits::unlimited()));
/// while let Some(record) = records.next().await {
///     println!("{:?}", record?.id());
/// }
/// # Ok(())
/// # }
/// ```
pub fn crawl<S: PageSource>(
    source: S,
    seed: Url,
    limits: CrawlLimits,
) -> impl Stream<Item = Result<AdRecord, FetchError>> {
    flatten_records(page_stream(Crawler::new(source, seed, limits)))
}
