use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::{NewsError, Result};
use crate::domain::Article;
use crate::fetcher::{
    append_params, endpoint, NewsClient, NewsPage, NewsQuery, DEFAULT_TIMEOUT, LANGUAGE,
};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

const EVERYTHING: &str = "/everything";
const TOP_HEADLINES: &str = "/top-headlines";
const SOURCES: &str = "/sources";

/// A publisher listed by the `/sources` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewsSource {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticlesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct SourcesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    sources: Vec<NewsSource>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for NewsAPI-compatible servers.
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("newshub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key,
        })
    }

    /// Build the request URL: `/everything` when searching, `/top-headlines` otherwise.
    pub fn request_url(&self, query: &NewsQuery) -> Result<Url> {
        let path = if query.is_search() {
            EVERYTHING
        } else {
            TOP_HEADLINES
        };
        let mut url = endpoint(&self.base_url, path)?;
        let page = query.page.to_string();
        let page_size = query.page_size.to_string();

        append_params(
            &mut url,
            &[
                ("q", query.q.trim()),
                ("category", &query.category),
                ("sortBy", query.sort_by.id()),
                ("page", &page),
                ("pageSize", &page_size),
                ("language", LANGUAGE),
                ("country", &query.country),
                ("apiKey", self.api_key.as_deref().unwrap_or("")),
            ],
        );
        Ok(url)
    }

    pub fn sources_url(&self, category: Option<&str>, country: Option<&str>) -> Result<Url> {
        let mut url = endpoint(&self.base_url, SOURCES)?;
        append_params(
            &mut url,
            &[
                ("category", category.unwrap_or("")),
                ("country", country.unwrap_or("")),
                ("language", LANGUAGE),
                ("apiKey", self.api_key.as_deref().unwrap_or("")),
            ],
        );
        Ok(url)
    }

    /// List the publishers the provider knows about.
    pub async fn fetch_sources(
        &self,
        category: Option<&str>,
        country: Option<&str>,
    ) -> Result<Vec<NewsSource>> {
        let url = self.sources_url(category, country)?;
        let body = self.get(url).await?;
        let response: SourcesResponse = serde_json::from_slice(&body)?;
        if response.status.as_deref() == Some("error") {
            return Err(NewsError::Api {
                status: 200,
                message: response.message.unwrap_or_default(),
            });
        }
        Ok(response.sources)
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>> {
        tracing::debug!("GET {}{}", url.origin().ascii_serialization(), url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(body)
    }
}

/// Decode an articles payload into a page.
pub fn parse_articles(body: &[u8]) -> Result<NewsPage> {
    let response: ArticlesResponse = serde_json::from_slice(body)?;
    if response.status.as_deref() == Some("error") {
        return Err(NewsError::Api {
            status: 200,
            message: response
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }
    Ok(NewsPage::new(response.articles, response.total_results))
}

fn api_error(status: u16, body: &[u8]) -> NewsError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|e| match (e.code, e.message) {
            (_, Some(message)) => Some(message),
            (Some(code), None) => Some(code),
            (None, None) => None,
        })
        .unwrap_or_else(|| format!("request failed with status {}", status));
    NewsError::Api { status, message }
}

#[async_trait]
impl NewsClient for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage> {
        let url = self.request_url(query)?;
        let body = self.get(url).await?;
        let page = parse_articles(&body)?;
        tracing::debug!(
            "NewsAPI returned {} of {} articles for page {}",
            page.articles.len(),
            page.total_results,
            query.page
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortBy;

    fn client() -> NewsApiClient {
        NewsApiClient::new("https://newsapi.test/v2", Some("secret".into())).unwrap()
    }

    #[test]
    fn test_headlines_url_without_search_term() {
        let query = NewsQuery {
            category: "technology".into(),
            ..Default::default()
        };
        let url = client().request_url(&query).unwrap();
        assert_eq!(url.path(), "/v2/top-headlines");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("category".into(), "technology".into())));
        assert!(pairs.contains(&("pageSize".into(), "12".into())));
        assert!(pairs.contains(&("language".into(), "en".into())));
        assert!(pairs.contains(&("country".into(), "us".into())));
        assert!(pairs.contains(&("apiKey".into(), "secret".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "q"));
    }

    #[test]
    fn test_search_url_uses_everything() {
        let query = NewsQuery {
            q: "rust".into(),
            sort_by: SortBy::Popularity,
            page: 2,
            ..Default::default()
        };
        let url = client().request_url(&query).unwrap();
        assert_eq!(url.path(), "/v2/everything");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "rust".into())));
        assert!(pairs.contains(&("sortBy".into(), "popularity".into())));
        assert!(pairs.contains(&("page".into(), "2".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "category"));
    }

    #[test]
    fn test_missing_api_key_is_omitted() {
        let client = NewsApiClient::new("https://newsapi.test/v2", None).unwrap();
        let url = client.request_url(&NewsQuery::default()).unwrap();
        assert!(!url.query_pairs().any(|(k, _)| k == "apiKey"));
    }

    #[test]
    fn test_parse_articles() {
        let body = br#"{
            "status": "ok",
            "totalResults": 50,
            "articles": [
                {"source": {"id": null, "name": "A"}, "title": "One", "url": "https://a/1"},
                {"source": {"id": null, "name": "B"}, "title": "Two", "url": "https://b/2"}
            ]
        }"#;
        let page = parse_articles(body).unwrap();
        assert_eq!(page.total_results, 50);
        assert_eq!(page.articles.len(), 2);
        assert_eq!(page.articles[0].title, "One");
        assert_eq!(page.articles[1].url, "https://b/2");
        assert!(!page.is_degraded());
    }

    #[test]
    fn test_parse_error_payload() {
        let body = br#"{"status": "error", "code": "rateLimited", "message": "Too many requests"}"#;
        let err = parse_articles(body).unwrap_err();
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn test_api_error_prefers_message() {
        let err = api_error(401, br#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#);
        match err {
            NewsError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Your API key is invalid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_without_body() {
        let err = api_error(502, b"<html>Bad gateway</html>");
        assert_eq!(
            err.to_string(),
            "News API error (502): request failed with status 502"
        );
    }

    #[test]
    fn test_sources_url() {
        let url = client().sources_url(Some("science"), None).unwrap();
        assert_eq!(url.path(), "/v2/sources");
        assert!(url.query_pairs().any(|(k, v)| k == "category" && v == "science"));
        assert!(!url.query_pairs().any(|(k, _)| k == "country"));
    }
}
