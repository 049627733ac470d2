use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Result;
use crate::fetcher::{NewsClient, NewsPage, NewsQuery};

/// Tries the primary provider, then the secondary one.
///
/// Without a secondary provider a primary failure produces an empty
/// [`NewsPage::degraded`] page instead of an error. A failing secondary
/// provider propagates its error.
pub struct FallbackClient {
    primary: Arc<dyn NewsClient + Send + Sync>,
    secondary: Option<Arc<dyn NewsClient + Send + Sync>>,
}

impl FallbackClient {
    pub fn new(
        primary: Arc<dyn NewsClient + Send + Sync>,
        secondary: Option<Arc<dyn NewsClient + Send + Sync>>,
    ) -> Self {
        Self { primary, secondary }
    }

    pub fn has_fallback(&self) -> bool {
        self.secondary.is_some()
    }
}

#[async_trait]
impl NewsClient for FallbackClient {
    fn name(&self) -> &str {
        self.primary.name()
    }

    async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage> {
        let err = match self.primary.fetch_news(query).await {
            Ok(page) => return Ok(page),
            Err(e) => e,
        };

        tracing::warn!("{} request failed: {}", self.primary.name(), err);

        match &self.secondary {
            Some(secondary) => {
                tracing::info!("Falling back to {}", secondary.name());
                secondary.fetch_news(query).await
            }
            None => Ok(NewsPage::degraded(format!(
                "{} failed and no fallback provider is configured: {}",
                self.primary.name(),
                err
            ))),
        }
    }
}
