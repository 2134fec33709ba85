//! Paged view over the remote image collection
//!
//! The cache holds one page at a time. Status filter and filename search only
//! narrow the loaded page; they never trigger a remote query. A newer
//! [`ListingCache::load_page`] supersedes one still in flight: the late result
//! is dropped and its caller gets a `Cancelled` envelope.

use imgflow_client::{ErrorEnvelope, ImageService};
use imgflow_core::domain::job::JobStatus;
use imgflow_core::domain::resource::{PageWindow, ResourceRecord};
use tokio::sync::Mutex;
use tracing::debug;

/// Records per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// Filename substring search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub needle: String,
    pub case_insensitive: bool,
}

/// What the caller sees of the loaded page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub page_index: u64,
    /// Loaded records narrowed by the active filter and search
    pub records: Vec<ResourceRecord>,
    /// Size of the whole remote collection
    pub total_count: u64,
    pub total_pages: u64,
}

#[derive(Debug, Default)]
struct ListingState {
    generation: u64,
    page_index: u64,
    records: Vec<ResourceRecord>,
    total_count: u64,
    filter: Option<JobStatus>,
    search: Option<SearchQuery>,
}

impl ListingState {
    fn view(&self, page_size: u64) -> ListingPage {
        let records = self
            .records
            .iter()
            .filter(|r| self.filter.is_none_or(|status| r.status == status))
            .filter(|r| {
                self.search
                    .as_ref()
                    .is_none_or(|q| r.filename_contains(&q.needle, q.case_insensitive))
            })
            .cloned()
            .collect();

        ListingPage {
            page_index: self.page_index,
            records,
            total_count: self.total_count,
            total_pages: PageWindow {
                offset: 0,
                limit: page_size,
                total_count: self.total_count,
            }
            .total_pages(),
        }
    }
}

/// Page cache over [`ImageService::list_resources`]
pub struct ListingCache<S> {
    service: S,
    page_size: u64,
    state: Mutex<ListingState>,
}

impl<S: ImageService> ListingCache<S> {
    /// Creates a cache with the default page size
    pub fn new(service: S) -> Self {
        Self::with_page_size(service, DEFAULT_PAGE_SIZE)
    }

    /// A page size of 0 is treated as 1
    pub fn with_page_size(service: S, page_size: u64) -> Self {
        Self {
            service,
            page_size: page_size.max(1),
            state: Mutex::new(ListingState::default()),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Fetches page `page_index` (zero-based) and applies `filter` to it
    ///
    /// Records are kept as the service returns them, so a page past the end
    /// comes back empty rather than as an error. The total is never lower
    /// than the records seen up to this page. The active search stays in
    /// effect.
    pub async fn load_page(
        &self,
        filter: Option<JobStatus>,
        page_index: u64,
    ) -> Result<ListingPage, ErrorEnvelope> {
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.generation
        };

        let Some(offset) = page_index.checked_mul(self.page_size) else {
            let mut state = self.state.lock().await;
            state.page_index = page_index;
            state.records.clear();
            state.filter = filter;
            return Ok(state.view(self.page_size));
        };

        debug!(
            "Loading page {} (limit={}, offset={})",
            page_index, self.page_size, offset
        );
        let result = self.service.list_resources(self.page_size, offset).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!("Discarding page {}: superseded by a newer load", page_index);
            return Err(ErrorEnvelope::cancelled(
                "superseded by a newer page load",
            ));
        }

        let response = result?;
        let mut records = response.images;
        records.truncate(self.page_size as usize);
        let window = PageWindow::observed(
            offset,
            self.page_size,
            response.total_count,
            records.len() as u64,
        );

        state.page_index = page_index;
        state.records = records;
        state.total_count = window.total_count;
        state.filter = filter;
        Ok(state.view(self.page_size))
    }

    /// Changes the status filter on the loaded page; `None` shows everything
    pub async fn apply_filter(&self, filter: Option<JobStatus>) -> ListingPage {
        let mut state = self.state.lock().await;
        state.filter = filter;
        state.view(self.page_size)
    }

    /// Narrows the loaded page to filenames containing `needle`
    ///
    /// An empty needle clears the search.
    pub async fn apply_search(&self, needle: &str, case_insensitive: bool) -> ListingPage {
        let mut state = self.state.lock().await;
        state.search = if needle.is_empty() {
            None
        } else {
            Some(SearchQuery {
                needle: needle.to_string(),
                case_insensitive,
            })
        };
        state.view(self.page_size)
    }

    pub async fn clear_search(&self) -> ListingPage {
        self.apply_search("", true).await
    }

    /// The loaded page as currently filtered
    pub async fn current(&self) -> ListingPage {
        self.state.lock().await.view(self.page_size)
    }

    pub async fn total_pages(&self) -> u64 {
        self.current().await.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeService, record};
    use imgflow_client::ErrorKind;
    use std::sync::Arc;
    use std::time::Duration;

    fn collection(len: usize) -> Vec<ResourceRecord> {
        (0..len)
            .map(|i| record(&format!("image-{:02}.jpg", i), JobStatus::Completed))
            .collect()
    }

    #[tokio::test]
    async fn test_pages_and_totals() {
        let service = Arc::new(FakeService::new().with_records(collection(13)));
        let cache = ListingCache::new(service.clone());

        let first = cache.load_page(None, 0).await.unwrap();
        assert_eq!(first.records.len(), 12);
        assert_eq!(first.total_count, 13);
        assert_eq!(first.total_pages, 2);

        let second = cache.load_page(None, 1).await.unwrap();
        assert_eq!(second.page_index, 1);
        assert_eq!(second.records.len(), 1);
        assert_eq!(second.records[0].filename, "image-12.jpg");
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_empty() {
        let service = Arc::new(FakeService::new().with_records(collection(13)));
        let cache = ListingCache::new(service.clone());

        let page = cache.load_page(None, 5).await.unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total_count, 13);

        let page = cache.load_page(None, u64::MAX).await.unwrap();
        assert!(page.records.is_empty());
        assert_eq!(service.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_page_length_total_keeps_later_pages() {
        let service = Arc::new(
            FakeService::new()
                .with_records(collection(20))
                .reporting_page_length(),
        );
        let cache = ListingCache::new(service.clone());

        let first = cache.load_page(None, 0).await.unwrap();
        assert_eq!(first.records.len(), 12);

        let second = cache.load_page(None, 1).await.unwrap();
        assert_eq!(second.records.len(), 8);
        assert_eq!(second.records[0].filename, "image-12.jpg");
        assert_eq!(second.total_count, 20);
        assert_eq!(second.total_pages, 2);

        let third = cache.load_page(None, 2).await.unwrap();
        assert!(third.records.is_empty());
    }

    #[tokio::test]
    async fn test_filter_and_search_compose() {
        let service = Arc::new(FakeService::new().with_records(vec![
            record("Cat.jpg", JobStatus::Completed),
            record("cathedral.png", JobStatus::Processing),
            record("dog.jpg", JobStatus::Completed),
            record("black_cat.webp", JobStatus::Completed),
        ]));
        let cache = ListingCache::new(service.clone());

        let page = cache.load_page(Some(JobStatus::Completed), 0).await.unwrap();
        assert_eq!(page.records.len(), 3);

        let page = cache.apply_search("cat", true).await;
        let names: Vec<&str> = page.records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["Cat.jpg", "black_cat.webp"]);

        let page = cache.apply_search("cat", false).await;
        assert_eq!(page.records.len(), 1);

        let page = cache.apply_filter(None).await;
        assert_eq!(page.records.len(), 2);

        let page = cache.clear_search().await;
        assert_eq!(page.records.len(), 4);

        // Narrowing never goes back to the service
        assert_eq!(service.list_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_load_supersedes_pending_one() {
        let service = Arc::new(
            FakeService::new()
                .with_records(collection(30))
                .with_delay(0, Duration::from_millis(500)),
        );
        let cache = ListingCache::new(service.clone());

        let (slow, fast) = tokio::join!(cache.load_page(None, 0), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cache.load_page(None, 1).await
        });

        let err = slow.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
        assert_eq!(fast.unwrap().page_index, 1);

        let current = cache.current().await;
        assert_eq!(current.page_index, 1);
        assert_eq!(current.records[0].filename, "image-12.jpg");
    }

    #[tokio::test]
    async fn test_custom_page_size() {
        let service = Arc::new(FakeService::new().with_records(collection(3)));
        let cache = ListingCache::with_page_size(service, 2);

        cache.load_page(None, 1).await.unwrap();
        assert_eq!(cache.total_pages().await, 2);
        assert_eq!(cache.current().await.records.len(), 1);
        assert_eq!(cache.page_size(), 2);
    }
}
