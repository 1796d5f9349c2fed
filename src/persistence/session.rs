use chrono::{NaiveDate, Utc};
use thiserror::Error;

use super::{
    load_blogs, load_view, repair_blogs, save_blogs, save_view, LoadOutcome, PersistError,
    ViewSnapshot, BLOGS_KEY,
};
use crate::blog::{
    Blog, IdGenerator, NewBlog, NewComment, SortBy, ValidationError, DEFAULT_EXCERPT_LENGTH,
};
use crate::config::Config;
use crate::store::{reduce, Action, State, DEFAULT_USER};
use crate::storage::KeyValueStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The transition was applied in memory but could not be stored.
    #[error("Change applied but not saved: {0}")]
    Persist(#[from] PersistError),
}

/// Settings the host passes when opening a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub current_user: String,
    pub storage_key: String,
    /// Used when no view preferences are stored.
    pub default_sort: SortBy,
    pub excerpt_length: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            current_user: DEFAULT_USER.to_string(),
            storage_key: BLOGS_KEY.to_string(),
            default_sort: SortBy::Newest,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            current_user: config.current_user.clone(),
            storage_key: config.storage_key.clone(),
            default_sort: config.default_sort,
            excerpt_length: config.excerpt_length,
        }
    }
}

/// The reducer wired to a key-value store.
///
/// `open` loads or seeds the collection; every `dispatch` runs the reducer to
/// completion and then writes whatever it changed before returning. Because
/// `dispatch` takes `&mut self`, writes land in dispatch order.
pub struct Session<S> {
    state: State,
    store: S,
    options: SessionOptions,
    ids: IdGenerator,
    load_outcome: LoadOutcome,
}

impl<S: KeyValueStore> Session<S> {
    /// Load state from `store` (seeding on first run) and restore view
    /// preferences.
    ///
    /// Never fails. If writing the initial collection back fails, the session
    /// still opens with the loaded state in memory.
    pub async fn open(store: S, options: SessionOptions) -> Self {
        let (blogs, load_outcome) = load_blogs(&store, &options.storage_key).await;

        let mut ids = IdGenerator::new();
        ids.advance_past_blogs(&blogs);

        let mut session = Self {
            state: State::new(options.current_user.clone()),
            store,
            options,
            ids,
            load_outcome,
        };

        let view = load_view(&session.store).await.unwrap_or_else(|| ViewSnapshot {
            sort_by: session.options.default_sort,
            ..ViewSnapshot::default()
        });
        session.apply(Action::SetCategory(view.selected_category));
        session.apply(Action::SetSortBy(view.sort_by));

        if let Err(e) = session.dispatch(Action::LoadBlogs(blogs)).await {
            tracing::warn!(error = %e, "Failed to write initial blogs; continuing in memory");
        }

        tracing::info!(
            blogs = session.state.blogs.len(),
            seeded = load_outcome.is_seeded(),
            user = %session.state.current_user,
            "Session opened"
        );
        session
    }

    /// Run `action` through the reducer, then persist what it touched.
    ///
    /// On a storage failure the new state is kept in memory and the error is
    /// returned.
    pub async fn dispatch(&mut self, action: Action) -> Result<(), PersistError> {
        let persist_blogs = action.touches_blogs();
        let persist_view = action.touches_view();

        self.apply(action);

        if persist_blogs {
            save_blogs(&self.store, &self.options.storage_key, &self.state.blogs).await?;
        }
        if persist_view {
            save_view(&self.store, &self.view_snapshot()).await?;
        }
        Ok(())
    }

    fn apply(&mut self, mut action: Action) {
        if let Action::LoadBlogs(blogs) = &mut action {
            repair_blogs(blogs);
        }
        match &action {
            Action::LikeBlog { blog_id, .. } | Action::AddComment { blog_id, .. }
                if self.state.find(blog_id).is_none() =>
            {
                tracing::debug!(blog_id = %blog_id, action = action.kind(), "No such blog, ignoring");
            }
            Action::Unknown(kind) => {
                tracing::debug!(action = %kind, "Unknown action, ignoring");
            }
            _ => {}
        }
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    // ========================================================================
    // Creation Flows
    // ========================================================================

    /// Validate `draft`, build the post for the current user and add it.
    ///
    /// Returns the new post's id. Validation failures leave state untouched.
    pub async fn create_blog(&mut self, draft: NewBlog) -> Result<String, SessionError> {
        let id = self.ids.next_id();
        let blog = draft.into_blog(
            id.clone(),
            &self.state.current_user,
            today(),
            self.options.excerpt_length,
        )?;
        tracing::info!(blog_id = %id, category = %blog.category, "Creating blog");
        self.dispatch(Action::AddBlog(blog)).await?;
        Ok(id)
    }

    /// Toggle the current user's like on `blog_id`.
    pub async fn toggle_like(&mut self, blog_id: &str) -> Result<(), PersistError> {
        let user_id = self.state.current_user.clone();
        self.dispatch(Action::LikeBlog {
            blog_id: blog_id.to_owned(),
            user_id,
        })
        .await
    }

    /// Add a comment by the current user. Returns the comment's id.
    pub async fn add_comment(
        &mut self,
        blog_id: &str,
        draft: NewComment,
    ) -> Result<String, SessionError> {
        let id = self.ids.next_id();
        let comment = draft.into_comment(id.clone(), &self.state.current_user, today())?;
        self.dispatch(Action::AddComment {
            blog_id: blog_id.to_owned(),
            comment,
        })
        .await?;
        Ok(id)
    }

    // ========================================================================
    // Read Access
    // ========================================================================

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    pub fn find(&self, blog_id: &str) -> Option<&Blog> {
        self.state.find(blog_id)
    }

    /// Visible posts for the current search, category and sort.
    pub fn visible(&self) -> Vec<&Blog> {
        self.state.visible()
    }

    pub fn categories(&self) -> Vec<String> {
        self.state.categories()
    }

    pub fn view_snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            selected_category: self.state.selected_category.clone(),
            sort_by: self.state.sort_by,
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
