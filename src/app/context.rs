use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{NewsError, Result};
use crate::config::Config;
use crate::domain::Theme;
use crate::fetcher::{FallbackClient, GNewsClient, NewsApiClient, NewsClient};
use crate::share::Sharer;
use crate::store::{BookmarkStore, KeyValueStore, SqliteStore, ThemeState};

/// Shared services built once at startup.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub newsapi: Arc<NewsApiClient>,
    /// Primary provider wrapped with the optional secondary one.
    pub client: Arc<dyn NewsClient + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_store(config, Arc::new(SqliteStore::in_memory()?))
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let api = &config.api;
        let newsapi = Arc::new(NewsApiClient::with_timeout(
            &api.base_url,
            api.api_key.clone(),
            api.timeout(),
        )?);

        let secondary = match &api.fallback_api_key {
            Some(key) => {
                let gnews = GNewsClient::with_timeout(&api.fallback_base_url, key.clone(), api.timeout())?;
                Some(Arc::new(gnews) as Arc<dyn NewsClient + Send + Sync>)
            }
            None => None,
        };
        let client = Arc::new(FallbackClient::new(newsapi.clone(), secondary));

        Ok(Self {
            config,
            store,
            newsapi,
            client,
        })
    }

    fn storage(&self) -> Arc<dyn KeyValueStore + Send + Sync> {
        self.store.clone()
    }

    pub fn bookmarks(&self) -> BookmarkStore {
        BookmarkStore::load(self.storage())
    }

    pub fn theme(&self) -> ThemeState {
        ThemeState::load(self.storage(), Theme::ambient())
    }

    pub fn sharer(&self) -> Sharer {
        Sharer::new(self.config.share.command.clone())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| NewsError::Config("Could not find data directory".into()))?;
        let newshub_dir = data_dir.join("newshub");
        std::fs::create_dir_all(&newshub_dir)?;
        Ok(newshub_dir.join("newshub.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Article;

    #[test]
    fn test_in_memory_context_shares_one_store() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();

        let mut bookmarks = ctx.bookmarks();
        assert!(bookmarks.add(&Article::new("https://example.com/a", "A")).unwrap());

        let reloaded = ctx.bookmarks();
        assert!(reloaded.is_bookmarked("https://example.com/a"));
    }

    #[test]
    fn test_client_name_is_primary() {
        let mut config = Config::default();
        config.api.fallback_api_key = Some("key".into());
        let ctx = AppContext::in_memory(config).unwrap();
        assert_eq!(ctx.client.name(), "NewsAPI");
    }
}
