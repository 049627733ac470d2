use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Article;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Business,
    Technology,
    Entertainment,
    Health,
    Science,
    Sports,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Technology,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Science => "Science",
            Category::Sports => "Sports",
        }
    }

    /// The value sent to the remote API. `general` means no category filter.
    pub fn query_value(self) -> &'static str {
        match self {
            Category::General => "",
            other => other.id(),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.id() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "publishedAt")]
    PublishedAt,
    #[serde(rename = "popularity")]
    Popularity,
    #[serde(rename = "relevancy")]
    Relevancy,
}

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::PublishedAt, SortBy::Popularity, SortBy::Relevancy];

    pub fn id(self) -> &'static str {
        match self {
            SortBy::PublishedAt => "publishedAt",
            SortBy::Popularity => "popularity",
            SortBy::Relevancy => "relevancy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortBy::PublishedAt => "Latest",
            SortBy::Popularity => "Popular",
            SortBy::Relevancy => "Relevant",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortBy::PublishedAt => SortBy::Popularity,
            SortBy::Popularity => SortBy::Relevancy,
            SortBy::Relevancy => SortBy::PublishedAt,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "publishedat" | "latest" => Ok(SortBy::PublishedAt),
            "popularity" | "popular" => Ok(SortBy::Popularity),
            "relevancy" | "relevant" => Ok(SortBy::Relevancy),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Countries offered for headline filtering, as (ISO code, display name).
pub const COUNTRIES: &[(&str, &str)] = &[
    ("us", "United States"),
    ("gb", "United Kingdom"),
    ("ca", "Canada"),
    ("au", "Australia"),
    ("in", "India"),
    ("ie", "Ireland"),
    ("nz", "New Zealand"),
    ("de", "Germany"),
    ("fr", "France"),
    ("jp", "Japan"),
];

pub const DEFAULT_COUNTRY: &str = "us";

pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Next country in [`COUNTRIES`]; unknown codes wrap to the first entry.
pub fn next_country(code: &str) -> &'static str {
    let idx = COUNTRIES.iter().position(|(c, _)| c.eq_ignore_ascii_case(code));
    match idx {
        Some(i) => COUNTRIES[(i + 1) % COUNTRIES.len()].0,
        None => COUNTRIES[0].0,
    }
}

/// Query parameters and selection for the article list.
///
/// Changing the search text, category, sort order or country bumps the
/// filter generation and resets the page to 1. Observers compare
/// [`generation`](FilterState::generation) to know that any accumulated
/// articles belong to a previous filter combination.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    search_query: String,
    category: Category,
    sort_by: SortBy,
    country: String,
    current_page: u32,
    selected_article: Option<Article>,
    generation: u64,
}

impl FilterState {
    pub fn new() -> Self {
        Self {
            search_query: String::new(),
            category: Category::General,
            sort_by: SortBy::PublishedAt,
            country: DEFAULT_COUNTRY.to_string(),
            current_page: 1,
            selected_article: None,
            generation: 0,
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.selected_article.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search_query {
            self.search_query = query;
            self.filters_changed();
        }
    }

    pub fn set_category(&mut self, category: Category) {
        if category != self.category {
            self.category = category;
            self.filters_changed();
        }
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        if sort_by != self.sort_by {
            self.sort_by = sort_by;
            self.filters_changed();
        }
    }

    pub fn set_country(&mut self, country: impl Into<String>) {
        let country = country.into();
        if country != self.country {
            self.country = country;
            self.filters_changed();
        }
    }

    /// Move to another page without touching the filters. Pages start at 1.
    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn set_selected_article(&mut self, article: Option<Article>) {
        self.selected_article = article;
    }

    /// Restore every field to its default and force the article list to clear.
    pub fn reset_filters(&mut self) {
        let generation = self.generation;
        *self = Self::new();
        self.generation = generation + 1;
    }

    fn filters_changed(&mut self) {
        self.current_page = 1;
        self.generation += 1;
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}
