//! Blog and comment entities, the like-set invariant, and creation drafts.
//!
//! Entities are plain value snapshots. The only mutation helpers live here so
//! that `likes` and `liked_by` are always updated together.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::util::{clean_text, excerpt_of, placeholder_thumbnail};

/// Category sentinel that matches every post.
pub const ALL_CATEGORIES: &str = "all";

/// Categories offered when composing a new post.
pub const CREATE_CATEGORIES: [&str; 6] = [
    "Web Development",
    "Technology",
    "Lifestyle",
    "Business",
    "Health",
    "Travel",
];

/// Default excerpt length in characters (before the trailing ellipsis).
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

// ============================================================================
// Error Types
// ============================================================================

/// Rejections raised by the creation flow before any action is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields: {0} is empty")]
    MissingField(&'static str),

    #[error("Comment cannot be empty")]
    EmptyComment,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sort mode '{0}' (expected newest, likes or trending)")]
pub struct ParseSortByError(pub String);

// ============================================================================
// Entities
// ============================================================================

/// A comment on a blog post. Immutable once added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub content: String,
    pub date: NaiveDate,
}

/// A published post with its engagement data.
///
/// Field names serialize in camelCase (`likedBy`) so the persisted blob keeps
/// the same shape across versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub author: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub likes: u32,
    #[serde(default)]
    pub liked_by: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Blog {
    /// Whether `user_id` is in the like-set.
    pub fn has_liked(&self, user_id: &str) -> bool {
        self.liked_by.iter().any(|u| u == user_id)
    }

    /// Toggle `user_id` in the like-set, keeping `likes == liked_by.len()`.
    ///
    /// Returns `true` if the user now likes the post.
    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        if let Some(pos) = self.liked_by.iter().position(|u| u == user_id) {
            self.liked_by.remove(pos);
            self.likes = self.likes.saturating_sub(1);
            false
        } else {
            self.liked_by.push(user_id.to_owned());
            self.likes = self.likes.saturating_add(1);
            true
        }
    }

    /// Trending score: likes plus comment count.
    pub fn engagement(&self) -> u64 {
        u64::from(self.likes) + self.comments.len() as u64
    }

    /// Whether the cached counter agrees with the like-set.
    pub fn likes_consistent(&self) -> bool {
        self.likes as usize == self.liked_by.len()
    }

    /// Drop duplicate user ids and reset `likes` to the like-set cardinality.
    ///
    /// Returns `true` if anything changed. First occurrence of each id wins.
    pub fn repair_likes(&mut self) -> bool {
        let before = self.liked_by.len();
        let mut seen = std::collections::HashSet::with_capacity(before);
        self.liked_by.retain(|u| seen.insert(u.clone()));

        let deduped = self.liked_by.len() != before;
        let counted = u32::try_from(self.liked_by.len()).unwrap_or(u32::MAX);
        let recount = self.likes != counted;
        self.likes = counted;
        deduped || recount
    }
}

// ============================================================================
// Sort Mode
// ============================================================================

/// Ordering applied to the visible post list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Newest,
    Likes,
    Trending,
}

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::Newest, SortBy::Likes, SortBy::Trending];

    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Likes => "likes",
            SortBy::Trending => "trending",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = ParseSortByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortBy::Newest),
            "likes" => Ok(SortBy::Likes),
            "trending" => Ok(SortBy::Trending),
            _ => Err(ParseSortByError(s.to_owned())),
        }
    }
}

// ============================================================================
// Creation Drafts
// ============================================================================

/// User input for a new post, validated before `ADD_BLOG` is built.
#[derive(Debug, Clone, Default)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub category: String,
    pub thumbnail: Option<String>,
}

impl NewBlog {
    /// Validate the draft and build a fully-populated [`Blog`].
    ///
    /// The result has zero likes, an empty like-set and no comments. A blank
    /// thumbnail is replaced by a placeholder derived from the title.
    pub fn into_blog(
        self,
        id: String,
        author: &str,
        date: NaiveDate,
        excerpt_length: usize,
    ) -> Result<Blog, ValidationError> {
        let title = clean_text(&self.title).trim().to_owned();
        let content = clean_text(&self.content).trim().to_owned();
        let category = clean_text(&self.category).trim().to_owned();

        if title.is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if content.is_empty() {
            return Err(ValidationError::MissingField("content"));
        }
        if category.is_empty() {
            return Err(ValidationError::MissingField("category"));
        }

        let thumbnail = match self.thumbnail.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_owned(),
            _ => placeholder_thumbnail(&title),
        };

        Ok(Blog {
            id,
            excerpt: excerpt_of(&content, excerpt_length),
            title,
            content,
            category,
            author: author.to_owned(),
            date,
            thumbnail: Some(thumbnail),
            likes: 0,
            liked_by: Vec::new(),
            comments: Vec::new(),
        })
    }
}

/// User input for a new comment.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub content: String,
}

impl NewComment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Trim the text and build a [`Comment`]; whitespace-only input is rejected.
    pub fn into_comment(
        self,
        id: String,
        author: &str,
        date: NaiveDate,
    ) -> Result<Comment, ValidationError> {
        let content = clean_text(&self.content).trim().to_owned();
        if content.is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        Ok(Comment {
            id,
            author: author.to_owned(),
            content,
            date,
        })
    }
}

// ============================================================================
// Id Generation
// ============================================================================

/// Mints millisecond-timestamp ids that are strictly increasing.
///
/// Two ids requested within the same millisecond still differ: the second one
/// is bumped past the first.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never mint an id at or below `floor`.
    pub fn advance_past(&mut self, floor: i64) {
        self.last = self.last.max(floor);
    }

    /// Advance past every numeric id already used by `blogs` or their comments.
    ///
    /// An id of `i64::MAX` leaves nothing to advance to and is skipped; fresh
    /// timestamps never reach it.
    pub fn advance_past_blogs(&mut self, blogs: &[Blog]) {
        let max = blogs
            .iter()
            .flat_map(|b| std::iter::once(&b.id).chain(b.comments.iter().map(|c| &c.id)))
            .filter_map(|id| id.parse::<i64>().ok())
            .filter(|&id| id < i64::MAX)
            .max();
        if let Some(max) = max {
            self.advance_past(max);
        }
    }

    pub fn next_id(&mut self) -> String {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    fn next_at(&mut self, now_millis: i64) -> String {
        let id = now_millis.max(self.last.saturating_add(1));
        self.last = id;
        id.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
