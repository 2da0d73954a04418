//! Backwards walk over a user's timeline.
//!
//! Each page asks for posts at or below a cursor (`max_id`). The cursor for the next
//! page is the last post id of the current page minus one, so pages never overlap when
//! the source honours `max_id`. An empty page leaves the cursor where it was.
//!
//! The walk always spends its full page budget unless [`ExhaustionPolicy::StopOnEmptyPage`]
//! is selected. A short page is not an end marker: with reposts excluded the API trims
//! them after applying `count`, so pages below the requested size turn up mid-timeline.
//! Only an empty page says there is nothing older to fetch.
use crate::Result;
use crate::twitter::types::Status;
use async_trait::async_trait;

/// Pages requested per walk.
pub const PAGE_BUDGET: usize = 16;
/// Posts requested per page (the API maximum).
pub const PAGE_SIZE: u32 = 200;

/// Exactly what the paginator asks the source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub screen_name: String,
    pub count: u32,
    /// Only posts with an id at or below this. `None` on the first page.
    pub max_id: Option<u64>,
    pub include_rts: bool,
}

#[async_trait]
pub trait TimelineSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Status>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExhaustionPolicy {
    /// Issue every request in the budget, even after an empty page.
    #[default]
    FullBudget,
    /// Stop after the first empty page.
    StopOnEmptyPage,
}

impl ExhaustionPolicy {
    pub fn from_flag(stop_on_empty_page: bool) -> Self {
        if stop_on_empty_page {
            Self::StopOnEmptyPage
        } else {
            Self::FullBudget
        }
    }
}

/// Cursor for the page after `page`: last id minus one. `None` when the page is empty
/// (or the last id is 0), in which case the caller keeps its previous cursor.
pub fn next_cursor(page: &[Status]) -> Option<u64> {
    page.last().and_then(|s| s.id.checked_sub(1))
}

pub struct TimelinePaginator<S> {
    source: S,
    page_budget: usize,
    page_size: u32,
    policy: ExhaustionPolicy,
}

impl<S: TimelineSource> TimelinePaginator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_budget: PAGE_BUDGET,
            page_size: PAGE_SIZE,
            policy: ExhaustionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Every post `handle` authored (reposts excluded), newest first, in the order the
    /// source returned them. Duplicates across pages are kept.
    pub async fn fetch(&self, handle: &str) -> Result<Vec<Status>> {
        let mut cursor: Option<u64> = None;
        let mut result: Vec<Status> = Vec::new();

        for page_index in 0..self.page_budget {
            let request = PageRequest {
                screen_name: handle.to_string(),
                count: self.page_size,
                max_id: cursor,
                include_rts: false,
            };
            let page = self.source.fetch_page(&request).await?;
            let page_len = page.len();

            match next_cursor(&page) {
                Some(next) => cursor = Some(next),
                None => tracing::debug!(
                    page = page_index,
                    cursor = ?cursor,
                    "timeline.cursor_unavailable"
                ),
            }

            tracing::debug!(
                page = page_index,
                size = page_len,
                max_id = ?request.max_id,
                next_max_id = ?cursor,
                "timeline.page"
            );
            result.extend(page);

            if page_len < self.page_size as usize {
                tracing::debug!(page = page_index, size = page_len, "timeline.short_page");
            }
            if page_len == 0 {
                match self.policy {
                    ExhaustionPolicy::StopOnEmptyPage => {
                        tracing::debug!(page = page_index, "timeline.empty_page.stop");
                        break;
                    }
                    ExhaustionPolicy::FullBudget => {
                        tracing::debug!(page = page_index, "timeline.empty_page.continue");
                    }
                }
            }
        }

        tracing::info!(handle, total = result.len(), "timeline.fetched");
        Ok(result)
    }
}
