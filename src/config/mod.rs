//! Configuration management for newshub.
//!
//! Configuration is read from `~/.config/newshub/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! `NEWSAPI_BASE_URL`, `NEWSAPI_KEY` and `GNEWS_API_KEY` take precedence over the file.

pub mod colors;
pub mod keybindings;

pub use colors::{ColorConfig, Palette, ThemeColors};
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::{gnews, newsapi, DEFAULT_PAGE_SIZE};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub reader: ReaderConfig,
    pub share: ShareConfig,
    pub colors: ThemeColors,
    pub keybindings: KeybindingConfig,
}

/// News provider endpoints and credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub fallback_base_url: String,
    /// The secondary provider is only used when this is set.
    pub fallback_api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: newsapi::DEFAULT_BASE_URL.to_string(),
            api_key: None,
            fallback_base_url: gnews::DEFAULT_BASE_URL.to_string(),
            fallback_api_key: None,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub toast_duration_ms: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: 500,
            toast_duration_ms: 3000,
        }
    }
}

impl ReaderConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

/// Platform share command. Arguments may contain `{title}`, `{text}` and `{url}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub command: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from the default path, then apply environment overrides.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        let config = Self::load_from(&config_path)?;
        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Load from an explicit path, writing the default file if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/newshub/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newshub").join("config.toml"))
    }

    /// Apply `NEWSAPI_BASE_URL`, `NEWSAPI_KEY` and `GNEWS_API_KEY`. Empty values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = var("NEWSAPI_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Some(key) = var("NEWSAPI_KEY") {
            self.api.api_key = Some(key);
        }
        if let Some(key) = var("GNEWS_API_KEY") {
            self.api.fallback_api_key = Some(key);
        }
        self
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let io_err = |e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(Self::default_config_content().as_bytes())
            .map_err(io_err)?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# newshub configuration
#
# Environment variables NEWSAPI_BASE_URL, NEWSAPI_KEY and GNEWS_API_KEY
# override the [api] section.
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "A", "/"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"

[api]
base_url = "https://newsapi.org/v2"
# api_key = "your-newsapi-key"

# Secondary provider, used when the primary request fails
fallback_base_url = "https://gnews.io/api/v4"
# fallback_api_key = "your-gnews-key"

# Request timeout in seconds
timeout_secs = 30

[reader]
# Articles requested per page
page_size = 12

# Quiet period before a typed search is submitted (milliseconds)
search_debounce_ms = 500

# How long status notifications stay visible (milliseconds)
toast_duration_ms = 3000

[share]
# Command used to share an article; falls back to the clipboard when unset
# or when the command fails. Placeholders: {title}, {text}, {url}
# command = ["notify-send", "{title}", "{url}"]

# Overrides for either palette; unset colors keep the theme default
[colors.light]
# active_border = "Blue"

[colors.dark]
# active_border = "Cyan"

[keybindings]
# Navigation
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["PageDown"]
prev_page = ["PageUp"]
next_pane = ["Tab"]
prev_pane = ["BackTab", "Shift+Tab"]
select = ["Enter"]
back = ["Esc"]

# Filters
search = ["/"]
next_category = ["c"]
prev_category = ["C"]
cycle_sort = ["s"]
cycle_country = ["g"]
reset_filters = ["x"]

# Actions
load_more = ["n"]
retry = ["R"]
toggle_bookmark = ["b"]
toggle_sidebar = ["B"]
remove_bookmark = ["d", "Delete"]
open_in_browser = ["o"]
share = ["y"]
toggle_theme = ["t"]
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
