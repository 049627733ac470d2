pub mod fallback;
pub mod gnews;
pub mod newsapi;
pub mod orchestrator;

use std::time::Duration;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Article, FilterState, SortBy};

pub use fallback::FallbackClient;
pub use gnews::GNewsClient;
pub use newsapi::NewsApiClient;
pub use orchestrator::{FetchOrchestrator, FetchOutcome, FetchTicket};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const LANGUAGE: &str = "en";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameters for one request to a news provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub q: String,
    /// Empty means no category filter.
    pub category: String,
    pub sort_by: SortBy,
    pub page: u32,
    pub page_size: u32,
    pub country: String,
}

impl NewsQuery {
    pub fn from_filters(filters: &FilterState, page_size: u32) -> Self {
        Self {
            q: filters.search_query().to_string(),
            category: filters.category().query_value().to_string(),
            sort_by: filters.sort_by(),
            page: filters.current_page(),
            page_size,
            country: filters.country().to_string(),
        }
    }

    /// A non-empty search term selects the full-text search endpoint.
    pub fn is_search(&self) -> bool {
        !self.q.trim().is_empty()
    }
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self::from_filters(&FilterState::new(), DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    /// The primary provider failed and no fallback was available.
    Degraded(String),
}

/// One page of results from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsPage {
    pub articles: Vec<Article>,
    pub total_results: u64,
    pub status: PageStatus,
}

impl NewsPage {
    pub fn new(articles: Vec<Article>, total_results: u64) -> Self {
        Self {
            articles,
            total_results,
            status: PageStatus::Ok,
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            articles: Vec::new(),
            total_results: 0,
            status: PageStatus::Degraded(message.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, PageStatus::Degraded(_))
    }
}

#[async_trait]
pub trait NewsClient {
    /// Short provider name for logs and status lines.
    fn name(&self) -> &str;

    async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage>;
}

/// Append non-empty parameters to a URL's query string.
pub(crate) fn append_params(url: &mut url::Url, params: &[(&str, &str)]) {
    let mut pairs = url.query_pairs_mut();
    for (key, value) in params {
        if !value.is_empty() {
            pairs.append_pair(key, value);
        }
    }
}

/// Join a base URL and an endpoint path regardless of trailing slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<url::Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(url::Url::parse(&joined)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    #[test]
    fn test_query_from_filters_normalizes_general() {
        let mut filters = FilterState::new();
        let query = NewsQuery::from_filters(&filters, DEFAULT_PAGE_SIZE);
        assert_eq!(query.category, "");
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 12);
        assert_eq!(query.country, "us");
        assert!(!query.is_search());

        filters.set_category(Category::Sports);
        filters.set_search_query("final");
        filters.set_current_page(3);
        let query = NewsQuery::from_filters(&filters, 20);
        assert_eq!(query.category, "sports");
        assert_eq!(query.q, "final");
        assert_eq!(query.page, 3);
        assert!(query.is_search());
    }

    #[test]
    fn test_whitespace_query_is_not_search() {
        let query = NewsQuery {
            q: "   ".into(),
            ..Default::default()
        };
        assert!(!query.is_search());
    }

    #[test]
    fn test_endpoint_joining() {
        assert_eq!(
            endpoint("https://newsapi.org/v2", "/everything").unwrap().as_str(),
            "https://newsapi.org/v2/everything"
        );
        assert_eq!(
            endpoint("https://newsapi.org/v2/", "top-headlines").unwrap().as_str(),
            "https://newsapi.org/v2/top-headlines"
        );
    }

    #[test]
    fn test_append_params_skips_empty() {
        let mut url = url::Url::parse("https://example.com/x").unwrap();
        append_params(&mut url, &[("q", "rust lang"), ("category", ""), ("page", "2")]);
        assert_eq!(url.as_str(), "https://example.com/x?q=rust+lang&page=2");
    }
}
