use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::Article;

/// A locally saved copy of an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(flatten)]
    pub article: Article,
    pub bookmark_id: String,
    pub bookmarked_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(article: Article) -> Self {
        let bookmarked_at = Utc::now();
        let bookmark_id = Self::generate_id(&article.url, &bookmarked_at);
        Self {
            article,
            bookmark_id,
            bookmarked_at,
        }
    }

    /// Derive a short id from the article URL and the save time
    pub fn generate_id(url: &str, at: &DateTime<Utc>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hasher.update(at.to_rfc3339().as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..16].to_string()
    }

    pub fn url(&self) -> &str {
        &self.article.url
    }

    /// A removal key matches either the bookmark id or the article URL.
    pub fn matches(&self, key: &str) -> bool {
        self.bookmark_id == key || self.article.url == key
    }
}
