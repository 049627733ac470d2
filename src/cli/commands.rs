use chrono::Utc;
use url::Url;

use crate::app::{AppContext, NewsError, Result};
use crate::domain::format::{self, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
use crate::domain::{Article, Category, FilterState, SortBy};
use crate::fetcher::FetchOrchestrator;
use crate::share::{ShareData, ShareMethod};
use crate::store::{BookmarkStore, KeyValueStore};

pub async fn headlines(ctx: &AppContext, category: Category, country: &str, pages: u32) -> Result<()> {
    let mut filters = FilterState::new();
    filters.set_category(category);
    filters.set_country(country.to_lowercase());
    fetch_and_print(ctx, &mut filters, pages).await
}

pub async fn search(ctx: &AppContext, query: &str, sort: SortBy, pages: u32) -> Result<()> {
    let mut filters = FilterState::new();
    filters.set_search_query(query);
    filters.set_sort_by(sort);
    fetch_and_print(ctx, &mut filters, pages).await
}

/// Load up to `pages` pages through the orchestrator and print the accumulated list.
async fn fetch_and_print(ctx: &AppContext, filters: &mut FilterState, pages: u32) -> Result<()> {
    let mut orchestrator = FetchOrchestrator::with_page_size(ctx.config.reader.page_size);
    orchestrator.refresh(filters, ctx.client.as_ref()).await;

    for _ in 1..pages {
        if orchestrator.can_retry() || !orchestrator.load_more(filters) {
            break;
        }
        orchestrator.refresh(filters, ctx.client.as_ref()).await;
    }

    if let Some(notice) = orchestrator.notice() {
        eprintln!("Note: {}", notice);
    }

    let bookmarks = ctx.bookmarks();
    print_articles(orchestrator.articles(), &bookmarks);

    if let Some(error) = orchestrator.error() {
        return Err(NewsError::Other(error.to_string()));
    }

    if !orchestrator.articles().is_empty() {
        println!(
            "\nShowing {} of {} articles",
            orchestrator.articles().len(),
            orchestrator.total_results()
        );
    }
    Ok(())
}

fn print_articles(articles: &[Article], bookmarks: &BookmarkStore) {
    if articles.is_empty() {
        println!("No articles found");
        return;
    }

    let now = Utc::now();
    for (i, article) in articles.iter().enumerate() {
        let marker = if bookmarks.is_bookmarked(&article.url) {
            "★"
        } else {
            " "
        };
        println!(
            "{}{:>3}. {}",
            marker,
            i + 1,
            format::format_title(&article.title, TITLE_MAX_LEN)
        );
        println!(
            "      {} | {} | {}",
            article.source_name(),
            format::format_author(article.author.as_deref()),
            format::format_relative_time(article.published_at, now)
        );
        println!("      {}", article.url);
    }
}

pub async fn sources(ctx: &AppContext, category: Option<Category>, country: Option<&str>) -> Result<()> {
    let category = category.map(|c| c.id());
    let sources = ctx.newsapi.fetch_sources(category, country).await?;

    if sources.is_empty() {
        println!("No sources");
        return Ok(());
    }

    for source in sources {
        let tags: Vec<&str> = [source.category.as_deref(), source.country.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        println!("{} [{}]", source.name, tags.join(", "));
        if let Some(url) = source.url {
            println!("  {}", url);
        }
    }
    Ok(())
}

pub fn list_bookmarks(ctx: &AppContext) -> Result<()> {
    let bookmarks = ctx.bookmarks();

    if bookmarks.is_empty() {
        println!("No bookmarks");
        return Ok(());
    }

    for bookmark in bookmarks.bookmarks() {
        println!(
            "{}  {}  {}",
            bookmark.bookmark_id,
            bookmark.bookmarked_at.format("%Y-%m-%d"),
            format::format_title(&bookmark.article.title, TITLE_MAX_LEN)
        );
        println!(
            "    {}",
            format::format_description(bookmark.article.description.as_deref(), DESCRIPTION_MAX_LEN)
        );
        println!("    {}", bookmark.url());
    }
    Ok(())
}

pub fn add_bookmark(ctx: &AppContext, url: &str, title: Option<&str>) -> Result<()> {
    let parsed = Url::parse(url)?;
    let title = title
        .map(str::to_string)
        .unwrap_or_else(|| format::domain(parsed.as_str()));

    let mut bookmarks = ctx.bookmarks();
    if bookmarks.add(&Article::new(parsed.as_str(), title))? {
        println!("Bookmarked: {}", parsed);
    } else {
        println!("Already bookmarked: {}", parsed);
    }
    Ok(())
}

pub fn remove_bookmark(ctx: &AppContext, key: &str) -> Result<()> {
    let mut bookmarks = ctx.bookmarks();
    if !bookmarks.remove(key)? {
        return Err(NewsError::BookmarkNotFound(key.to_string()));
    }
    println!("Removed bookmark: {}", key);
    Ok(())
}

pub fn clear_bookmarks(ctx: &AppContext) -> Result<()> {
    let mut bookmarks = ctx.bookmarks();
    let count = bookmarks.len();
    bookmarks.clear()?;
    println!("Removed {} bookmarks", count);
    Ok(())
}

/// Share a bookmark by id or url; unknown urls are shared as-is.
pub fn share(ctx: &AppContext, key: &str) -> Result<()> {
    let data = resolve_share(&ctx.bookmarks(), key)?;
    match ctx.sharer().share(&data)? {
        ShareMethod::Command => println!("Shared: {}", data.url),
        ShareMethod::Clipboard => println!("Link copied to clipboard: {}", data.url),
    }
    Ok(())
}

fn resolve_share(bookmarks: &BookmarkStore, key: &str) -> Result<ShareData> {
    if let Some(bookmark) = bookmarks.find(key) {
        return Ok(ShareData::from_article(&bookmark.article));
    }

    let url = Url::parse(key).map_err(|_| NewsError::BookmarkNotFound(key.to_string()))?;
    Ok(ShareData {
        title: format::domain(url.as_str()),
        text: String::new(),
        url: url.to_string(),
    })
}

pub fn show_theme(ctx: &AppContext) -> Result<()> {
    println!("{}", ctx.theme().theme());
    Ok(())
}

pub fn toggle_theme(ctx: &AppContext) -> Result<()> {
    let theme = ctx.theme().toggle()?;
    println!("Theme set to {}", theme);
    Ok(())
}

pub fn reset(ctx: &AppContext) -> Result<()> {
    ctx.store.clear()?;
    println!("Cleared saved bookmarks and preferences");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn context() -> AppContext {
        AppContext::in_memory(Config::default()).unwrap()
    }

    #[test]
    fn test_add_and_remove_bookmark() {
        let ctx = context();
        add_bookmark(&ctx, "https://example.com/story", Some("Story")).unwrap();
        add_bookmark(&ctx, "https://example.com/story", None).unwrap();

        let bookmarks = ctx.bookmarks();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks.bookmarks()[0].article.title, "Story");

        let id = bookmarks.bookmarks()[0].bookmark_id.clone();
        remove_bookmark(&ctx, &id).unwrap();
        assert!(ctx.bookmarks().is_empty());
    }

    #[test]
    fn test_add_bookmark_rejects_invalid_url() {
        let ctx = context();
        assert!(matches!(
            add_bookmark(&ctx, "not a url", None),
            Err(NewsError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_remove_missing_bookmark() {
        let ctx = context();
        assert!(matches!(
            remove_bookmark(&ctx, "deadbeef"),
            Err(NewsError::BookmarkNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_share() {
        let ctx = context();
        add_bookmark(&ctx, "https://example.com/story", Some("Story")).unwrap();
        let bookmarks = ctx.bookmarks();

        let data = resolve_share(&bookmarks, "https://example.com/story").unwrap();
        assert_eq!(data.title, "Story");

        let data = resolve_share(&bookmarks, "https://other.org/x").unwrap();
        assert_eq!(data.url, "https://other.org/x");

        assert!(resolve_share(&bookmarks, "abc123").is_err());
    }

    #[test]
    fn test_reset_clears_bookmarks_and_theme() {
        let ctx = context();
        add_bookmark(&ctx, "https://example.com/story", None).unwrap();
        toggle_theme(&ctx).unwrap();

        reset(&ctx).unwrap();
        assert!(ctx.bookmarks().is_empty());
        assert!(ctx.store.keys().unwrap().is_empty());
    }
}
