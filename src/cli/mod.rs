pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Category, SortBy};

#[derive(Parser)]
#[command(name = "newshub")]
#[command(about = "Browse, search and bookmark news from the terminal", long_about = None)]
pub struct Cli {
    /// Path to the local database (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show top headlines
    Headlines {
        /// general, business, technology, entertainment, health, science, sports
        #[arg(short, long, default_value = "general")]
        category: Category,

        /// Two-letter country code
        #[arg(long, default_value = "us")]
        country: String,

        #[command(flatten)]
        paging: Paging,
    },
    /// Search all articles
    Search {
        query: String,

        /// latest, popular or relevant
        #[arg(short, long, default_value = "latest")]
        sort: SortBy,

        #[command(flatten)]
        paging: Paging,
    },
    /// List news sources
    Sources {
        #[arg(short, long)]
        category: Option<Category>,

        #[arg(long)]
        country: Option<String>,
    },
    /// Manage bookmarks
    Bookmarks {
        #[command(subcommand)]
        action: Option<BookmarkAction>,
    },
    /// Share a bookmarked article, or any url
    Share {
        /// Bookmark id or article url
        key: String,
    },
    /// Show or toggle the colour theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Delete all saved bookmarks and preferences
    Reset,
    /// Launch the TUI
    Tui,
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct Paging {
    /// Number of pages to load
    #[arg(short, long, default_value_t = 1)]
    pub pages: u32,
}

#[derive(Subcommand)]
pub enum BookmarkAction {
    /// List bookmarks, newest first
    List,
    /// Bookmark an article by url
    Add {
        url: String,

        #[arg(short, long)]
        title: Option<String>,
    },
    /// Remove a bookmark by id or url
    Remove { key: String },
    /// Remove every bookmark
    Clear,
}

#[derive(Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_headlines_filters() {
        let cli = Cli::parse_from(["newshub", "headlines", "-c", "sports", "--country", "gb"]);
        match cli.command {
            Commands::Headlines {
                category,
                country,
                paging,
            } => {
                assert_eq!(category, Category::Sports);
                assert_eq!(country, "gb");
                assert_eq!(paging.pages, 1);
            }
            _ => panic!("expected headlines"),
        }
    }

    #[test]
    fn test_parse_search_sort() {
        let cli = Cli::parse_from(["newshub", "search", "rust", "--sort", "popular", "-p", "2"]);
        match cli.command {
            Commands::Search { query, sort, paging } => {
                assert_eq!(query, "rust");
                assert_eq!(sort, SortBy::Popularity);
                assert_eq!(paging.pages, 2);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["newshub", "headlines", "-c", "gossip"]).is_err());
    }
}
