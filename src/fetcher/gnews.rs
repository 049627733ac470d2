//! GNews client, used as the secondary provider.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::{NewsError, Result};
use crate::domain::{Article, SortBy, Source};
use crate::fetcher::{
    append_params, endpoint, NewsClient, NewsPage, NewsQuery, DEFAULT_TIMEOUT, LANGUAGE,
};

pub const DEFAULT_BASE_URL: &str = "https://gnews.io/api/v4";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GNewsResponse {
    #[serde(default)]
    total_articles: u64,
    #[serde(default)]
    articles: Vec<GNewsArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GNewsArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<GNewsSource>,
}

#[derive(Debug, Deserialize)]
struct GNewsSource {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GNewsErrors {
    #[serde(default)]
    errors: Vec<String>,
}

impl From<GNewsArticle> for Article {
    fn from(a: GNewsArticle) -> Self {
        Article {
            source: Source {
                id: None,
                name: a.source.and_then(|s| s.name),
            },
            author: None,
            title: a.title.unwrap_or_default(),
            description: a.description,
            url: a.url.unwrap_or_default(),
            url_to_image: a.image,
            published_at: a.published_at.and_then(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok()
            }),
            content: a.content,
        }
    }
}

pub struct GNewsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GNewsClient {
    pub fn new(base_url: &str, api_key: String) -> Result<Self> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("newshub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key,
        })
    }

    pub fn request_url(&self, query: &NewsQuery) -> Result<Url> {
        let path = if query.is_search() {
            "/search"
        } else {
            "/top-headlines"
        };
        let mut url = endpoint(&self.base_url, path)?;
        let page = query.page.to_string();
        let max = query.page_size.to_string();
        // GNews only sorts search results, by date or relevance.
        let sort_by = match (query.is_search(), query.sort_by) {
            (false, _) => "",
            (true, SortBy::Relevancy) => "relevance",
            (true, _) => "publishedAt",
        };

        append_params(
            &mut url,
            &[
                ("q", query.q.trim()),
                ("category", &query.category),
                ("lang", LANGUAGE),
                ("country", &query.country),
                ("max", &max),
                ("page", &page),
                ("sortby", sort_by),
                ("apikey", &self.api_key),
            ],
        );
        Ok(url)
    }
}

pub fn parse_articles(body: &[u8]) -> Result<NewsPage> {
    let response: GNewsResponse = serde_json::from_slice(body)?;
    let articles = response.articles.into_iter().map(Article::from).collect();
    Ok(NewsPage::new(articles, response.total_articles))
}

#[async_trait]
impl NewsClient for GNewsClient {
    fn name(&self) -> &str {
        "GNews"
    }

    async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage> {
        let url = self.request_url(query)?;
        tracing::debug!("GET {}{}", url.origin().ascii_serialization(), url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<GNewsErrors>(&body)
                .ok()
                .and_then(|e| e.errors.into_iter().next())
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
            return Err(NewsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_articles(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GNewsClient {
        GNewsClient::new("https://gnews.test/api/v4", "key".into()).unwrap()
    }

    #[test]
    fn test_headlines_url() {
        let query = NewsQuery {
            category: "science".into(),
            ..Default::default()
        };
        let url = client().request_url(&query).unwrap();
        assert_eq!(url.path(), "/api/v4/top-headlines");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("category".into(), "science".into())));
        assert!(pairs.contains(&("max".into(), "12".into())));
        assert!(pairs.contains(&("apikey".into(), "key".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "sortby"));
    }

    #[test]
    fn test_search_url_maps_sort() {
        let query = NewsQuery {
            q: "mars".into(),
            sort_by: SortBy::Relevancy,
            ..Default::default()
        };
        let url = client().request_url(&query).unwrap();
        assert_eq!(url.path(), "/api/v4/search");
        assert!(url.query_pairs().any(|(k, v)| k == "sortby" && v == "relevance"));
    }

    #[test]
    fn test_parse_normalizes_shape() {
        let body = br#"{
            "totalArticles": 7,
            "articles": [{
                "title": "Rover finds water",
                "description": "d",
                "content": "c",
                "url": "https://g/1",
                "image": "https://g/1.jpg",
                "publishedAt": "2024-05-01T08:00:00Z",
                "source": {"name": "Space Daily", "url": "https://g"}
            }]
        }"#;
        let page = parse_articles(body).unwrap();
        assert_eq!(page.total_results, 7);
        let article = &page.articles[0];
        assert_eq!(article.url_to_image.as_deref(), Some("https://g/1.jpg"));
        assert_eq!(article.source_name(), "Space Daily");
        assert!(article.published_at.is_some());
        assert!(article.author.is_none());
    }
}
