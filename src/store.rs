//! Application state and the pure reducer that drives every transition.
//!
//! `reduce` consumes the current [`State`] and returns the next one. It does no
//! I/O and holds no hidden state; persistence is wired around it by
//! [`crate::persistence::Session`].
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::blog::{Blog, Comment, SortBy, ALL_CATEGORIES};

/// Identity used when no user is configured. There is no login flow.
pub const DEFAULT_USER: &str = "John Doe";

// ============================================================================
// State
// ============================================================================

/// Everything the reducer owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Newest first.
    pub blogs: Vec<Blog>,
    pub current_user: String,
    /// Transient search input; never persisted.
    pub search_term: String,
    /// `"all"` or an exact category.
    pub selected_category: String,
    pub sort_by: SortBy,
}

impl State {
    pub fn new(current_user: impl Into<String>) -> Self {
        Self {
            blogs: Vec::new(),
            current_user: current_user.into(),
            search_term: String::new(),
            selected_category: ALL_CATEGORIES.to_string(),
            sort_by: SortBy::Newest,
        }
    }

    pub fn find(&self, blog_id: &str) -> Option<&Blog> {
        self.blogs.iter().find(|b| b.id == blog_id)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(DEFAULT_USER)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// A requested state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Prepend a fully-populated post.
    AddBlog(Blog),
    /// Toggle `user_id` in the post's like-set.
    LikeBlog { blog_id: String, user_id: String },
    /// Append a comment to the post.
    AddComment { blog_id: String, comment: Comment },
    SetSearchTerm(String),
    SetCategory(String),
    SetSortBy(SortBy),
    /// Replace the whole collection. Used at startup.
    LoadBlogs(Vec<Blog>),
    /// An action type this version does not know. Leaves state untouched.
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Malformed action envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("Malformed payload for {kind}: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Wire form of an action: `{"type": "LIKE_BLOG", "payload": {...}}`.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikePayload {
    blog_id: String,
    user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentPayload {
    blog_id: String,
    comment: Comment,
}

impl Action {
    /// Decode an action from its JSON envelope.
    ///
    /// Unrecognized types decode to [`Action::Unknown`] rather than failing, so
    /// the reducer can ignore them. A known type with a bad payload is an error.
    pub fn from_json(json: &str) -> Result<Self, ActionError> {
        let Envelope { kind, payload } =
            serde_json::from_str(json).map_err(ActionError::Envelope)?;

        fn decode<T: DeserializeOwned>(kind: &str, v: serde_json::Value) -> Result<T, ActionError> {
            serde_json::from_value(v).map_err(|source| ActionError::Payload {
                kind: kind.to_owned(),
                source,
            })
        }

        let action = match kind.as_str() {
            "ADD_BLOG" => Action::AddBlog(decode(&kind, payload)?),
            "LIKE_BLOG" => {
                let p: LikePayload = decode(&kind, payload)?;
                Action::LikeBlog {
                    blog_id: p.blog_id,
                    user_id: p.user_id,
                }
            }
            "ADD_COMMENT" => {
                let p: CommentPayload = decode(&kind, payload)?;
                Action::AddComment {
                    blog_id: p.blog_id,
                    comment: p.comment,
                }
            }
            "SET_SEARCH_TERM" => Action::SetSearchTerm(decode(&kind, payload)?),
            "SET_CATEGORY" => Action::SetCategory(decode(&kind, payload)?),
            "SET_SORT_BY" => Action::SetSortBy(decode(&kind, payload)?),
            "LOAD_BLOGS" => Action::LoadBlogs(decode(&kind, payload)?),
            other => Action::Unknown(other.to_owned()),
        };
        Ok(action)
    }

    /// Wire name of the action type.
    pub fn kind(&self) -> &str {
        match self {
            Action::AddBlog(_) => "ADD_BLOG",
            Action::LikeBlog { .. } => "LIKE_BLOG",
            Action::AddComment { .. } => "ADD_COMMENT",
            Action::SetSearchTerm(_) => "SET_SEARCH_TERM",
            Action::SetCategory(_) => "SET_CATEGORY",
            Action::SetSortBy(_) => "SET_SORT_BY",
            Action::LoadBlogs(_) => "LOAD_BLOGS",
            Action::Unknown(kind) => kind,
        }
    }

    /// Whether this action replaces the blog collection and must be persisted.
    pub fn touches_blogs(&self) -> bool {
        matches!(
            self,
            Action::AddBlog(_)
                | Action::LikeBlog { .. }
                | Action::AddComment { .. }
                | Action::LoadBlogs(_)
        )
    }

    /// Whether this action changes a persisted view preference.
    pub fn touches_view(&self) -> bool {
        matches!(self, Action::SetCategory(_) | Action::SetSortBy(_))
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Map `(state, action)` to the next state.
///
/// Actions that reference a missing blog id, and unknown actions, return the
/// input state unchanged.
pub fn reduce(mut state: State, action: Action) -> State {
    match action {
        Action::AddBlog(blog) => {
            state.blogs.insert(0, blog);
        }
        Action::LikeBlog { blog_id, user_id } => {
            if let Some(blog) = state.blogs.iter_mut().find(|b| b.id == blog_id) {
                blog.toggle_like(&user_id);
            }
        }
        Action::AddComment { blog_id, comment } => {
            if let Some(blog) = state.blogs.iter_mut().find(|b| b.id == blog_id) {
                blog.comments.push(comment);
            }
        }
        Action::SetSearchTerm(term) => state.search_term = term,
        Action::SetCategory(category) => state.selected_category = category,
        Action::SetSortBy(mode) => state.sort_by = mode,
        Action::LoadBlogs(blogs) => state.blogs = blogs,
        Action::Unknown(_) => {}
    }
    state
}

// ============================================================================
// Tests
// ============================================================================
