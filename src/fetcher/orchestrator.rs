//! Drives article fetching from [`FilterState`] changes.
//!
//! The orchestrator is a synchronous state machine: [`observe`](FetchOrchestrator::observe)
//! turns a filter change into a [`FetchTicket`], [`execute`] performs the request, and
//! [`apply`](FetchOrchestrator::apply) folds the [`FetchOutcome`] back in. Callers may run
//! `execute` on a spawned task; tickets are numbered so that a response belonging to a
//! superseded request is dropped instead of overwriting fresher results.

use crate::app::Result;
use crate::domain::{Article, FilterState};
use crate::fetcher::{NewsClient, NewsPage, NewsQuery, PageStatus, DEFAULT_PAGE_SIZE};

pub const FALLBACK_ERROR: &str = "Failed to fetch news";

/// A request issued by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: NewsQuery,
}

impl FetchTicket {
    pub fn page(&self) -> u32 {
        self.query.page
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<NewsPage>,
}

/// Run one fetch cycle against a client.
pub async fn execute(client: &(dyn NewsClient + Send + Sync), ticket: FetchTicket) -> FetchOutcome {
    let result = client.fetch_news(&ticket.query).await;
    FetchOutcome { ticket, result }
}

pub struct FetchOrchestrator {
    articles: Vec<Article>,
    total_results: u64,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    page_size: u32,
    last_seq: u64,
    // (filter generation, page) of the last issued request
    observed: Option<(u64, u32)>,
    // Page above 1 whose request failed or came back degraded
    failed_page: Option<u32>,
}

impl FetchOrchestrator {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            articles: Vec::new(),
            total_results: 0,
            loading: false,
            error: None,
            notice: None,
            page_size: page_size.max(1),
            last_seq: 0,
            observed: None,
            failed_page: None,
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set when the last page came back degraded from the fallback chain.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn has_more(&self) -> bool {
        (self.articles.len() as u64) < self.total_results
    }

    /// The last request failed or was degraded and can be issued again.
    pub fn can_retry(&self) -> bool {
        !self.loading && (self.error.is_some() || self.notice.is_some())
    }

    /// Issue a request if the filters or page changed since the last one.
    ///
    /// A filter change clears the accumulated articles before the ticket is returned.
    pub fn observe(&mut self, filters: &FilterState) -> Option<FetchTicket> {
        let key = (filters.generation(), filters.current_page());
        if self.observed == Some(key) {
            return None;
        }

        let filters_changed = self.observed.map(|(g, _)| g != key.0).unwrap_or(true);
        if filters_changed {
            self.articles.clear();
            self.total_results = 0;
            self.failed_page = None;
        }

        self.observed = Some(key);
        Some(self.issue(filters))
    }

    /// Re-issue the request for the current filters and page.
    pub fn retry(&mut self, filters: &FilterState) -> FetchTicket {
        self.observed = Some((filters.generation(), filters.current_page()));
        self.issue(filters)
    }

    /// Advance to the next page. Refused while loading or when everything is loaded.
    ///
    /// If the current page failed, it is requested again instead of skipped.
    pub fn load_more(&mut self, filters: &mut FilterState) -> bool {
        if self.loading || !self.has_more() {
            return false;
        }
        if self.failed_page == Some(filters.current_page()) {
            // Pages start at 1, so the next observe sees a change
            self.observed = self.observed.map(|(generation, _)| (generation, 0));
            return true;
        }
        filters.set_current_page(filters.current_page() + 1);
        true
    }

    fn issue(&mut self, filters: &FilterState) -> FetchTicket {
        self.last_seq += 1;
        self.loading = true;
        self.error = None;
        self.notice = None;

        let ticket = FetchTicket {
            seq: self.last_seq,
            query: NewsQuery::from_filters(filters, self.page_size),
        };
        tracing::debug!(
            "Fetch #{} issued: q={:?} category={:?} page={}",
            ticket.seq,
            ticket.query.q,
            ticket.query.category,
            ticket.query.page
        );
        ticket
    }

    /// Fold a finished request into the state. Returns `false` for superseded responses.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { ticket, result } = outcome;
        if ticket.seq < self.last_seq {
            tracing::debug!(
                "Discarding response #{} superseded by #{}",
                ticket.seq,
                self.last_seq
            );
            return false;
        }

        self.loading = false;
        let first_page = ticket.page() <= 1;

        match result {
            Ok(NewsPage {
                status: PageStatus::Degraded(message),
                ..
            }) if !first_page => {
                // Keep what is loaded so the page can be fetched again
                self.notice = Some(message);
                self.failed_page = Some(ticket.page());
            }
            Ok(page) => {
                self.failed_page = None;
                if first_page {
                    self.articles = page.articles;
                } else {
                    self.articles.extend(page.articles);
                }
                self.total_results = page.total_results;
                if let PageStatus::Degraded(message) = page.status {
                    self.notice = Some(message);
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Fetch #{} failed: {}", ticket.seq, message);
                self.error = Some(if message.is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                });
                if first_page {
                    self.articles.clear();
                    self.failed_page = None;
                } else {
                    self.failed_page = Some(ticket.page());
                }
            }
        }

        true
    }

    /// Observe, fetch and apply in one step. Returns whether a request was made.
    pub async fn refresh(
        &mut self,
        filters: &FilterState,
        client: &(dyn NewsClient + Send + Sync),
    ) -> bool {
        let Some(ticket) = self.observe(filters) else {
            return false;
        };
        let outcome = execute(client, ticket).await;
        self.apply(outcome);
        true
    }
}

impl Default for FetchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
