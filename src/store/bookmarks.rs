use std::sync::Arc;

use crate::app::Result;
use crate::domain::{Article, Bookmark};
use crate::store::{load_json, save_json, KeyValueStore, BOOKMARKS_KEY};

/// Saved articles, most recent first, at most one per URL.
///
/// Every mutation is applied in memory first and then the whole collection is
/// written back. When that write fails the in-memory change is kept and the
/// storage error is returned so the caller can report it.
pub struct BookmarkStore {
    storage: Arc<dyn KeyValueStore + Send + Sync>,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    /// Rehydrate from storage. Missing or corrupt data yields an empty collection.
    pub fn load(storage: Arc<dyn KeyValueStore + Send + Sync>) -> Self {
        let bookmarks: Vec<Bookmark> = load_json(storage.as_ref(), BOOKMARKS_KEY).unwrap_or_default();
        tracing::debug!("Loaded {} bookmarks", bookmarks.len());
        Self { storage, bookmarks }
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn is_bookmarked(&self, url: &str) -> bool {
        self.bookmarks.iter().any(|b| b.url() == url)
    }

    /// Find a bookmark by id or URL.
    pub fn find(&self, key: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.matches(key))
    }

    /// Save an article. Returns `Ok(false)` without changes if its URL is already saved.
    pub fn add(&mut self, article: &Article) -> Result<bool> {
        if self.is_bookmarked(&article.url) {
            return Ok(false);
        }

        self.bookmarks.insert(0, Bookmark::new(article.clone()));
        self.persist()?;
        Ok(true)
    }

    /// Remove the first bookmark whose id or URL equals `key`.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let Some(idx) = self.bookmarks.iter().position(|b| b.matches(key)) else {
            return Ok(false);
        };

        self.bookmarks.remove(idx);
        self.persist()?;
        Ok(true)
    }

    /// Add the article if absent, otherwise remove it. Returns whether it is now saved.
    pub fn toggle(&mut self, article: &Article) -> Result<bool> {
        if self.is_bookmarked(&article.url) {
            self.remove(&article.url)?;
            Ok(false)
        } else {
            self.add(article)?;
            Ok(true)
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.bookmarks.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        save_json(self.storage.as_ref(), BOOKMARKS_KEY, &self.bookmarks).map_err(|e| {
            tracing::error!("Failed to persist bookmarks: {}", e);
            e
        })
    }
}
