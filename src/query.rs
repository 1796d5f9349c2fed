//! Derived view: search, category filter and sort over the blog collection.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! demand.
use crate::blog::{Blog, SortBy, ALL_CATEGORIES};
use crate::store::State;

/// Inputs that shape the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewQuery<'a> {
    pub search_term: &'a str,
    pub category: &'a str,
    pub sort_by: SortBy,
}

impl Default for ViewQuery<'_> {
    fn default() -> Self {
        Self {
            search_term: "",
            category: ALL_CATEGORIES,
            sort_by: SortBy::Newest,
        }
    }
}

impl<'a> ViewQuery<'a> {
    pub fn from_state(state: &'a State) -> Self {
        Self {
            search_term: &state.search_term,
            category: &state.selected_category,
            sort_by: state.sort_by,
        }
    }
}

/// Case-insensitive match of `term` against title, content or author.
/// An empty term matches everything.
pub fn matches_search(blog: &Blog, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    [&blog.title, &blog.content, &blog.author]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// `"all"` matches every post; anything else must equal the category exactly.
pub fn matches_category(blog: &Blog, category: &str) -> bool {
    category == ALL_CATEGORIES || blog.category == category
}

/// Stable descending sort. Equal keys keep their collection order.
pub fn sort_blogs(blogs: &mut [&Blog], sort_by: SortBy) {
    match sort_by {
        SortBy::Newest => blogs.sort_by(|a, b| b.date.cmp(&a.date)),
        SortBy::Likes => blogs.sort_by(|a, b| b.likes.cmp(&a.likes)),
        SortBy::Trending => blogs.sort_by_key(|b| std::cmp::Reverse(b.engagement())),
    }
}

/// Filter then sort `blogs` according to `query`.
pub fn visible_blogs<'b>(blogs: &'b [Blog], query: &ViewQuery<'_>) -> Vec<&'b Blog> {
    let needle = query.search_term.to_lowercase();
    let mut visible: Vec<&Blog> = blogs
        .iter()
        .filter(|b| matches_search(b, &needle) && matches_category(b, query.category))
        .collect();
    sort_blogs(&mut visible, query.sort_by);
    visible
}

/// Filter options: `"all"` followed by each distinct category in first-seen order.
pub fn categories(blogs: &[Blog]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for blog in blogs {
        if !out.contains(&blog.category) {
            out.push(blog.category.clone());
        }
    }
    out
}

impl State {
    /// The list a renderer should display for the current inputs.
    pub fn visible(&self) -> Vec<&Blog> {
        visible_blogs(&self.blogs, &ViewQuery::from_state(self))
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.blogs)
    }
}
