//! # newshub
//!
//! A terminal news reader: browse headlines by category and country, search
//! every article, and keep bookmarks locally.
//!
//! ## Architecture
//!
//! ```text
//! FilterState → FetchOrchestrator → NewsClient (NewsAPI, GNews fallback) → UI
//!                                   BookmarkStore / ThemeState → SQLite
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export NEWSAPI_KEY=...
//!
//! # Top technology headlines in the UK
//! newshub headlines -c technology --country gb
//!
//! # Search, two pages of results
//! newshub search "rust language" --pages 2
//!
//! # Launch the TUI
//! newshub tui
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the provider clients and the loaded configuration.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/newshub/config.toml`:
/// API settings, reader timings, share command, colours and keybindings.
pub mod config;

/// Quiet-period coalescing for search input.
pub mod debounce;

/// Core domain models.
///
/// - [`Article`](domain::Article): a news article; its url is its identity
/// - [`Bookmark`](domain::Bookmark): a saved article with a generated id
/// - [`FilterState`](domain::FilterState): query parameters for the article list
/// - [`Theme`](domain::Theme): light or dark
pub mod domain;

/// Remote news providers and fetch orchestration.
///
/// - [`NewsClient`](fetcher::NewsClient): async trait for providers
/// - [`FallbackClient`](fetcher::FallbackClient): primary provider with optional secondary
/// - [`FetchOrchestrator`](fetcher::FetchOrchestrator): pagination and stale-response guard
pub mod fetcher;

/// Sharing through a platform command or the clipboard.
pub mod share;

/// SQLite-backed key/value persistence for bookmarks and the theme.
pub mod store;

/// Terminal user interface built with ratatui.
pub mod tui;
