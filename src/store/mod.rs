pub mod bookmarks;
pub mod sqlite;
pub mod theme;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app::Result;

pub use bookmarks::BookmarkStore;
pub use sqlite::SqliteStore;
pub use theme::ThemeState;

pub const BOOKMARKS_KEY: &str = "newshub_bookmarks";
pub const THEME_KEY: &str = "newshub_theme";
/// Reserved for user preferences; nothing reads it yet.
pub const PREFERENCES_KEY: &str = "newshub_preferences";

pub const APP_KEYS: [&str; 3] = [BOOKMARKS_KEY, THEME_KEY, PREFERENCES_KEY];

/// Durable string key/value storage.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// Remove every application key.
    fn clear(&self) -> Result<()>;
}

/// Load and decode a JSON value. Absence, read errors and malformed data all yield `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read {} from storage: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring malformed value stored under {}: {}", key, e);
            None
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set_raw(key, &raw)
}
