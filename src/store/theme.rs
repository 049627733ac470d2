use std::sync::Arc;

use crate::app::Result;
use crate::domain::Theme;
use crate::store::{load_json, save_json, KeyValueStore, THEME_KEY};

/// The active light/dark theme, persisted on every toggle.
pub struct ThemeState {
    storage: Arc<dyn KeyValueStore + Send + Sync>,
    theme: Theme,
}

impl ThemeState {
    /// Persisted value first, then the ambient preference, then light.
    pub fn load(storage: Arc<dyn KeyValueStore + Send + Sync>, ambient: Option<Theme>) -> Self {
        let theme = load_json::<Theme>(storage.as_ref(), THEME_KEY)
            .or(ambient)
            .unwrap_or_default();
        Self { storage, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    /// Flip the theme and persist it. The new value sticks even if persisting fails.
    pub fn toggle(&mut self) -> Result<Theme> {
        self.theme = self.theme.toggled();
        save_json(self.storage.as_ref(), THEME_KEY, &self.theme).map_err(|e| {
            tracing::error!("Failed to persist theme: {}", e);
            e
        })?;
        Ok(self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn storage() -> Arc<dyn KeyValueStore + Send + Sync> {
        Arc::new(SqliteStore::in_memory().unwrap())
    }

    #[test]
    fn test_defaults_to_light() {
        let state = ThemeState::load(storage(), None);
        assert_eq!(state.theme(), Theme::Light);
    }

    #[test]
    fn test_ambient_dark_without_persisted_value() {
        let state = ThemeState::load(storage(), Some(Theme::Dark));
        assert_eq!(state.theme(), Theme::Dark);
    }

    #[test]
    fn test_persisted_value_wins_over_ambient() {
        let storage = storage();
        storage.set_raw(THEME_KEY, "\"light\"").unwrap();
        let state = ThemeState::load(storage, Some(Theme::Dark));
        assert_eq!(state.theme(), Theme::Light);
    }

    #[test]
    fn test_malformed_persisted_value_falls_back() {
        let storage = storage();
        storage.set_raw(THEME_KEY, "\"sepia\"").unwrap();
        let state = ThemeState::load(storage, Some(Theme::Dark));
        assert_eq!(state.theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle_twice_persists_each_step() {
        let storage = storage();
        let mut state = ThemeState::load(storage.clone(), Some(Theme::Dark));

        assert_eq!(state.toggle().unwrap(), Theme::Light);
        assert_eq!(storage.get_raw(THEME_KEY).unwrap(), Some("\"light\"".into()));

        assert_eq!(state.toggle().unwrap(), Theme::Dark);
        assert_eq!(storage.get_raw(THEME_KEY).unwrap(), Some("\"dark\"".into()));

        let reloaded = ThemeState::load(storage, None);
        assert_eq!(reloaded.theme(), Theme::Dark);
    }
}
