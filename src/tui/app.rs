use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use crate::debounce::Debouncer;
use crate::domain::filter::next_country;
use crate::domain::{Article, FilterState};
use crate::fetcher::{FetchOrchestrator, FetchOutcome};
use crate::store::{BookmarkStore, ThemeState};
use crate::tui::toast::Toasts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Articles,
    Preview,
    Bookmarks,
}

impl ActivePane {
    /// Cycle forward; the bookmarks pane is skipped while the sidebar is hidden.
    pub fn next(self, sidebar: bool) -> Self {
        match self {
            ActivePane::Articles => ActivePane::Preview,
            ActivePane::Preview if sidebar => ActivePane::Bookmarks,
            ActivePane::Preview | ActivePane::Bookmarks => ActivePane::Articles,
        }
    }

    pub fn prev(self, sidebar: bool) -> Self {
        match self {
            ActivePane::Articles if sidebar => ActivePane::Bookmarks,
            ActivePane::Articles => ActivePane::Preview,
            ActivePane::Preview => ActivePane::Articles,
            ActivePane::Bookmarks => ActivePane::Preview,
        }
    }
}

pub const PAGE_SIZE: usize = 10;

pub struct TuiApp {
    pub filters: FilterState,
    pub orchestrator: FetchOrchestrator,
    pub bookmarks: BookmarkStore,
    pub theme: ThemeState,
    pub toasts: Toasts,
    pub debouncer: Debouncer,
    pub active_pane: ActivePane,
    pub show_sidebar: bool,
    /// Text being typed into the search box, `None` when not editing.
    pub search_input: Option<String>,
    pub article_index: usize,
    pub bookmark_index: usize,
    pub preview_scroll: u16,
    pub article_list_state: ListState,
    pub bookmark_list_state: ListState,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new(
        bookmarks: BookmarkStore,
        theme: ThemeState,
        page_size: u32,
        search_debounce: Duration,
        toast_duration: Duration,
    ) -> Self {
        let mut article_list_state = ListState::default();
        article_list_state.select(Some(0));
        let mut bookmark_list_state = ListState::default();
        bookmark_list_state.select(Some(0));

        Self {
            filters: FilterState::new(),
            orchestrator: FetchOrchestrator::with_page_size(page_size),
            bookmarks,
            theme,
            toasts: Toasts::new(toast_duration),
            debouncer: Debouncer::new(search_debounce),
            active_pane: ActivePane::Articles,
            show_sidebar: false,
            search_input: None,
            article_index: 0,
            bookmark_index: 0,
            preview_scroll: 0,
            article_list_state,
            bookmark_list_state,
            should_quit: false,
        }
    }

    pub fn articles(&self) -> &[Article] {
        self.orchestrator.articles()
    }

    /// The article under the cursor in the focused list.
    pub fn highlighted_article(&self) -> Option<&Article> {
        match self.active_pane {
            ActivePane::Bookmarks => self
                .bookmarks
                .bookmarks()
                .get(self.bookmark_index)
                .map(|b| &b.article),
            _ => self.articles().get(self.article_index),
        }
    }

    /// What the preview pane shows: the selected article, else the highlighted one.
    pub fn preview_article(&self) -> Option<&Article> {
        self.filters
            .selected_article()
            .or_else(|| self.highlighted_article())
    }

    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        let first_page = outcome.ticket.page() <= 1;
        if !self.orchestrator.apply(outcome) {
            return;
        }
        if first_page {
            self.article_index = 0;
            self.preview_scroll = 0;
        }
        self.clamp_article_index();
    }

    /// Called after a filter change is observed; the list was just cleared.
    pub fn on_filters_changed(&mut self) {
        self.article_index = 0;
        self.preview_scroll = 0;
        self.filters.set_selected_article(None);
        self.article_list_state.select(Some(0));
    }

    fn clamp_article_index(&mut self) {
        let len = self.articles().len();
        if self.article_index >= len {
            self.article_index = len.saturating_sub(1);
        }
        self.article_list_state.select(Some(self.article_index));
    }

    fn clamp_bookmark_index(&mut self) {
        let len = self.bookmarks.len();
        if self.bookmark_index >= len {
            self.bookmark_index = len.saturating_sub(1);
        }
        self.bookmark_list_state.select(Some(self.bookmark_index));
    }

    pub fn move_up(&mut self) {
        self.move_by(-1);
    }

    pub fn move_down(&mut self) {
        self.move_by(1);
    }

    pub fn next_page(&mut self) {
        self.move_by(PAGE_SIZE as isize);
    }

    pub fn prev_page(&mut self) {
        self.move_by(-(PAGE_SIZE as isize));
    }

    fn move_by(&mut self, delta: isize) {
        let step = |index: usize, len: usize| -> usize {
            let max = len.saturating_sub(1) as isize;
            (index as isize + delta).clamp(0, max.max(0)) as usize
        };

        match self.active_pane {
            ActivePane::Articles => {
                let new_index = step(self.article_index, self.articles().len());
                if new_index != self.article_index {
                    self.article_index = new_index;
                    self.article_list_state.select(Some(new_index));
                    self.preview_scroll = 0;
                }
            }
            ActivePane::Bookmarks => {
                let new_index = step(self.bookmark_index, self.bookmarks.len());
                if new_index != self.bookmark_index {
                    self.bookmark_index = new_index;
                    self.bookmark_list_state.select(Some(new_index));
                    self.preview_scroll = 0;
                }
            }
            ActivePane::Preview => {
                self.preview_scroll = if delta < 0 {
                    self.preview_scroll.saturating_sub(delta.unsigned_abs() as u16)
                } else {
                    self.preview_scroll.saturating_add(delta as u16)
                };
            }
        }
    }

    pub fn next_pane(&mut self) {
        self.active_pane = self.active_pane.next(self.show_sidebar);
    }

    pub fn prev_pane(&mut self) {
        self.active_pane = self.active_pane.prev(self.show_sidebar);
    }

    /// Open the highlighted article in the preview pane.
    pub fn select(&mut self) {
        if let Some(article) = self.highlighted_article().cloned() {
            self.filters.set_selected_article(Some(article));
            self.active_pane = ActivePane::Preview;
            self.preview_scroll = 0;
        }
    }

    pub fn back(&mut self) {
        if self.filters.selected_article().is_some() {
            self.filters.set_selected_article(None);
            self.preview_scroll = 0;
        }
        self.active_pane = ActivePane::Articles;
    }

    pub fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
        if !self.show_sidebar && self.active_pane == ActivePane::Bookmarks {
            self.active_pane = ActivePane::Articles;
        }
    }

    pub fn next_category(&mut self) {
        self.filters.set_category(self.filters.category().next());
    }

    pub fn prev_category(&mut self) {
        self.filters.set_category(self.filters.category().prev());
    }

    pub fn cycle_sort(&mut self) {
        self.filters.set_sort_by(self.filters.sort_by().next());
    }

    pub fn cycle_country(&mut self) {
        let next = next_country(self.filters.country());
        self.filters.set_country(next);
    }

    pub fn reset_filters(&mut self) {
        self.debouncer.cancel();
        self.search_input = None;
        self.filters.reset_filters();
        self.toasts.info("Filters reset");
    }

    pub fn load_more(&mut self) {
        if !self.orchestrator.load_more(&mut self.filters) && !self.orchestrator.loading() {
            self.toasts.info("No more articles");
        }
    }

    pub fn toggle_bookmark(&mut self) {
        let Some(article) = self.highlighted_article().cloned() else {
            return;
        };
        match self.bookmarks.toggle(&article) {
            Ok(true) => self.toasts.success("Article bookmarked"),
            Ok(false) => self.toasts.success("Bookmark removed"),
            Err(e) => self.toasts.error(format!("Failed to save bookmarks: {}", e)),
        }
        self.clamp_bookmark_index();
    }

    /// Delete the bookmark under the cursor in the sidebar.
    pub fn remove_bookmark(&mut self) {
        if self.active_pane != ActivePane::Bookmarks {
            return;
        }
        let Some(id) = self
            .bookmarks
            .bookmarks()
            .get(self.bookmark_index)
            .map(|b| b.bookmark_id.clone())
        else {
            return;
        };
        match self.bookmarks.remove(&id) {
            Ok(_) => self.toasts.success("Bookmark removed"),
            Err(e) => self.toasts.error(format!("Failed to save bookmarks: {}", e)),
        }
        self.clamp_bookmark_index();
    }

    pub fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(theme) => self.toasts.info(format!("{} theme", theme)),
            Err(e) => self.toasts.error(format!("Failed to save theme: {}", e)),
        }
    }

    pub fn begin_search(&mut self) {
        self.search_input = Some(self.filters.search_query().to_string());
    }

    pub fn is_searching(&self) -> bool {
        self.search_input.is_some()
    }

    /// Handle a key while the search box is focused.
    pub fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(input) = self.search_input.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Enter => {
                let query = self.debouncer.commit_now().unwrap_or_else(|| input.clone());
                self.filters.set_search_query(query);
                self.search_input = None;
            }
            KeyCode::Esc => {
                self.debouncer.cancel();
                self.search_input = None;
            }
            KeyCode::Backspace => {
                input.pop();
                self.debouncer.push(input.clone(), now);
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.clear();
                self.debouncer.push(String::new(), now);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.push(c);
                self.debouncer.push(input.clone(), now);
            }
            _ => {}
        }
    }

    /// Periodic housekeeping: commit a settled search and expire toasts.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.debouncer.poll(now) {
            self.filters.set_search_query(query);
        }
        self.toasts.prune(now);
    }

    /// "Showing X of Y articles", or `None` before anything is loaded.
    pub fn summary(&self) -> Option<String> {
        let shown = self.articles().len();
        if shown == 0 {
            return None;
        }
        let mut summary = format!(
            "Showing {} of {} articles",
            shown,
            self.orchestrator.total_results()
        );
        if self.orchestrator.has_more() {
            summary.push_str(" (n: load more)");
        }
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{Category, SortBy, Theme};
    use crate::fetcher::{FetchTicket, NewsPage};
    use crate::store::{KeyValueStore, SqliteStore};

    fn app() -> TuiApp {
        let storage: Arc<dyn KeyValueStore + Send + Sync> =
            Arc::new(SqliteStore::in_memory().unwrap());
        TuiApp::new(
            BookmarkStore::load(storage.clone()),
            ThemeState::load(storage, None),
            12,
            Duration::from_millis(500),
            Duration::from_millis(3000),
        )
    }

    fn articles(range: std::ops::Range<usize>) -> Vec<Article> {
        range
            .map(|i| Article::new(format!("https://example.com/{}", i), format!("Story {}", i)))
            .collect()
    }

    fn deliver(app: &mut TuiApp, ticket: FetchTicket, page: NewsPage) {
        app.apply_outcome(FetchOutcome {
            ticket,
            result: Ok(page),
        });
    }

    #[test]
    fn test_pane_cycle_respects_sidebar() {
        assert_eq!(ActivePane::Preview.next(false), ActivePane::Articles);
        assert_eq!(ActivePane::Preview.next(true), ActivePane::Bookmarks);
        assert_eq!(ActivePane::Articles.prev(false), ActivePane::Preview);
        assert_eq!(ActivePane::Articles.prev(true), ActivePane::Bookmarks);
    }

    #[test]
    fn test_navigation_and_select() {
        let mut app = app();
        let ticket = app.orchestrator.observe(&app.filters).unwrap();
        deliver(&mut app, ticket, NewsPage::new(articles(0..12), 50));

        app.move_down();
        app.move_down();
        assert_eq!(app.article_index, 2);
        app.next_page();
        assert_eq!(app.article_index, 11);
        app.prev_page();
        assert_eq!(app.article_index, 1);

        app.select();
        assert_eq!(app.active_pane, ActivePane::Preview);
        assert_eq!(app.preview_article().unwrap().title, "Story 1");

        app.back();
        assert!(app.filters.selected_article().is_none());
        assert_eq!(app.active_pane, ActivePane::Articles);
    }

    #[test]
    fn test_load_more_appends_and_keeps_cursor() {
        let mut app = app();
        let ticket = app.orchestrator.observe(&app.filters).unwrap();
        deliver(&mut app, ticket, NewsPage::new(articles(0..12), 50));
        app.article_index = 5;

        app.load_more();
        assert_eq!(app.filters.current_page(), 2);
        let ticket = app.orchestrator.observe(&app.filters).unwrap();
        deliver(&mut app, ticket, NewsPage::new(articles(12..24), 50));

        assert_eq!(app.articles().len(), 24);
        assert_eq!(app.article_index, 5);
        assert_eq!(
            app.summary().as_deref(),
            Some("Showing 24 of 50 articles (n: load more)")
        );
    }

    #[test]
    fn test_filter_shortcuts_change_filters() {
        let mut app = app();
        app.next_category();
        assert_eq!(app.filters.category(), Category::Business);
        app.prev_category();
        assert_eq!(app.filters.category(), Category::General);
        app.cycle_sort();
        assert_eq!(app.filters.sort_by(), SortBy::Popularity);
        app.cycle_country();
        assert_eq!(app.filters.country(), "gb");

        app.reset_filters();
        assert_eq!(app.filters.category(), Category::General);
        assert_eq!(app.filters.sort_by(), SortBy::PublishedAt);
        assert_eq!(app.filters.country(), "us");
        assert_eq!(app.filters.current_page(), 1);
    }

    #[test]
    fn test_search_is_debounced() {
        let mut app = app();
        let start = Instant::now();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);

        app.begin_search();
        app.handle_search_key(key('a'), start);
        app.handle_search_key(key('i'), start + Duration::from_millis(100));
        app.tick(start + Duration::from_millis(400));
        assert_eq!(app.filters.search_query(), "");

        app.tick(start + Duration::from_millis(600));
        assert_eq!(app.filters.search_query(), "ai");
        assert!(app.is_searching());

        app.handle_search_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), start);
        assert!(!app.is_searching());
    }

    #[test]
    fn test_enter_commits_search_immediately() {
        let mut app = app();
        let now = Instant::now();
        app.begin_search();
        for c in "rust".chars() {
            app.handle_search_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), now);
        }
        app.handle_search_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), now);
        assert_eq!(app.filters.search_query(), "rust");
        assert_eq!(app.debouncer.pending(), None);
    }

    #[test]
    fn test_bookmark_toggle_and_remove() {
        let mut app = app();
        let ticket = app.orchestrator.observe(&app.filters).unwrap();
        deliver(&mut app, ticket, NewsPage::new(articles(0..3), 3));

        app.toggle_bookmark();
        assert!(app.bookmarks.is_bookmarked("https://example.com/0"));

        app.toggle_sidebar();
        app.active_pane = ActivePane::Bookmarks;
        app.remove_bookmark();
        assert!(app.bookmarks.is_empty());

        app.toggle_sidebar();
        assert_eq!(app.active_pane, ActivePane::Articles);
    }

    #[test]
    fn test_toggle_theme() {
        let mut app = app();
        app.toggle_theme();
        assert_eq!(app.theme.theme(), Theme::Dark);
        assert_eq!(app.toasts.len(), 1);
    }
}
