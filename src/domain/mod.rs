pub mod article;
pub mod bookmark;
pub mod filter;
pub mod format;
pub mod theme;

pub use article::{Article, Source};
pub use bookmark::Bookmark;
pub use filter::{Category, FilterState, SortBy};
pub use theme::Theme;
