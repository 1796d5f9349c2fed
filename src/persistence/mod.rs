//! Bridge between the reducer and the key-value store.
//!
//! - Startup: read the blog collection under a fixed key, or fall back to the
//!   seed set when it is absent, unreadable or malformed.
//! - After every change to `blogs`: serialize the whole collection and
//!   overwrite the key. No diffing, last write wins.
//! - View preferences (category filter and sort mode) live under their own key.
//!   The search term is never stored.
mod seed;
mod session;

pub use seed::seed_blogs;
pub use session::{Session, SessionError, SessionOptions};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blog::{Blog, SortBy, ALL_CATEGORIES};
use crate::storage::{KeyValueStore, StorageError};

/// Key holding the serialized blog collection.
pub const BLOGS_KEY: &str = "blogs";

/// Key holding the serialized [`ViewSnapshot`].
pub const VIEW_KEY: &str = "view";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to serialize state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

// ============================================================================
// Codec
// ============================================================================

/// Serialize the collection in the persisted JSON format.
pub fn encode_blogs(blogs: &[Blog]) -> Result<String, serde_json::Error> {
    serde_json::to_string(blogs)
}

pub fn decode_blogs(raw: &str) -> Result<Vec<Blog>, serde_json::Error> {
    serde_json::from_str(raw)
}

// ============================================================================
// Blog Collection
// ============================================================================

/// Where the startup collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Decoded from storage.
    Restored,
    /// Nothing stored yet; seeded.
    Missing,
    /// Stored value failed to decode; seeded.
    Corrupt,
    /// Storage read failed; seeded.
    Unreadable,
}

impl LoadOutcome {
    pub fn is_seeded(self) -> bool {
        self != LoadOutcome::Restored
    }
}

/// Load the collection stored under `key`.
///
/// Never fails: a missing, unreadable or malformed value yields the seed set.
/// Restored posts whose like counter disagrees with their like-set are repaired.
pub async fn load_blogs<S: KeyValueStore>(store: &S, key: &str) -> (Vec<Blog>, LoadOutcome) {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::info!(key = %key, "No stored blogs, loading sample data");
            return (seed_blogs(), LoadOutcome::Missing);
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read stored blogs, loading sample data");
            return (seed_blogs(), LoadOutcome::Unreadable);
        }
    };

    match decode_blogs(&raw) {
        Ok(mut blogs) => {
            repair_blogs(&mut blogs);
            tracing::debug!(key = %key, count = blogs.len(), "Restored blogs from storage");
            (blogs, LoadOutcome::Restored)
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Stored blogs are malformed, loading sample data");
            (seed_blogs(), LoadOutcome::Corrupt)
        }
    }
}

/// Bring every post's like counter in line with its like-set.
///
/// Returns how many posts were repaired.
pub fn repair_blogs(blogs: &mut [Blog]) -> usize {
    let mut repaired = 0;
    for blog in blogs.iter_mut() {
        if blog.repair_likes() {
            tracing::warn!(blog_id = %blog.id, likes = blog.likes, "Repaired like counter");
            repaired += 1;
        }
    }
    repaired
}

/// Overwrite `key` with the full collection.
pub async fn save_blogs<S: KeyValueStore>(
    store: &S,
    key: &str,
    blogs: &[Blog],
) -> Result<(), PersistError> {
    let raw = encode_blogs(blogs)?;
    store.set(key, &raw).await?;
    tracing::debug!(key = %key, count = blogs.len(), bytes = raw.len(), "Persisted blogs");
    Ok(())
}

// ============================================================================
// View Preferences
// ============================================================================

/// Persisted filter and sort choices.
///
/// Missing fields fall back to defaults so older snapshots still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub selected_category: String,
    pub sort_by: SortBy,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            selected_category: ALL_CATEGORIES.to_string(),
            sort_by: SortBy::Newest,
        }
    }
}

/// Load the stored view snapshot. Absent, unreadable or corrupt -> `None`.
pub async fn load_view<S: KeyValueStore>(store: &S) -> Option<ViewSnapshot> {
    let raw = match store.get(VIEW_KEY).await {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read view preferences");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(view) => Some(view),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring corrupt view preferences");
            None
        }
    }
}

pub async fn save_view<S: KeyValueStore>(
    store: &S,
    view: &ViewSnapshot,
) -> Result<(), PersistError> {
    let raw = serde_json::to_string(view)?;
    store.set(VIEW_KEY, &raw).await?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::Comment;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sample_blog(id: &str) -> Blog {
        Blog {
            id: id.to_string(),
            title: "T".into(),
            content: "C".into(),
            excerpt: "C...".into(),
            category: "Travel".into(),
            author: "A".into(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            thumbnail: None,
            likes: 0,
            liked_by: vec![],
            comments: vec![],
        }
    }

    #[tokio::test]
    async fn test_load_missing_seeds() {
        let store = MemoryStore::new();
        let (blogs, outcome) = load_blogs(&store, BLOGS_KEY).await;
        assert_eq!(outcome, LoadOutcome::Missing);
        assert_eq!(blogs, seed_blogs());
    }

    #[tokio::test]
    async fn test_load_corrupt_seeds() {
        let store = MemoryStore::new();
        store.insert(BLOGS_KEY, "not valid json {{");
        let (blogs, outcome) = load_blogs(&store, BLOGS_KEY).await;
        assert_eq!(outcome, LoadOutcome::Corrupt);
        assert!(outcome.is_seeded());
        assert_eq!(blogs.len(), 3);
    }

    #[tokio::test]
    async fn test_load_wrong_shape_seeds() {
        let store = MemoryStore::new();
        store.insert(BLOGS_KEY, r#"{"blogs": []}"#);
        let (_, outcome) = load_blogs(&store, BLOGS_KEY).await;
        assert_eq!(outcome, LoadOutcome::Corrupt);
    }

    #[tokio::test]
    async fn test_load_empty_array_is_restored() {
        let store = MemoryStore::new();
        store.insert(BLOGS_KEY, "[]");
        let (blogs, outcome) = load_blogs(&store, BLOGS_KEY).await;
        assert_eq!(outcome, LoadOutcome::Restored);
        assert!(blogs.is_empty());
    }

    #[tokio::test]
    async fn test_load_repairs_like_counter() {
        let store = MemoryStore::new();
        let mut b = sample_blog("1");
        b.likes = 24;
        store.insert(BLOGS_KEY, encode_blogs(&[b]).unwrap());

        let (blogs, _) = load_blogs(&store, BLOGS_KEY).await;
        assert_eq!(blogs[0].likes, 0);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let store = MemoryStore::new();
        let mut b = sample_blog("1");
        b.toggle_like("u1");
        b.comments.push(Comment {
            id: "c".into(),
            author: "x".into(),
            content: "y".into(),
            date: b.date,
        });
        save_blogs(&store, BLOGS_KEY, &[b.clone()]).await.unwrap();

        let (blogs, outcome) = load_blogs(&store, BLOGS_KEY).await;
        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(blogs, vec![b]);
    }

    #[tokio::test]
    async fn test_save_surfaces_quota_error() {
        let store = MemoryStore::with_quota(16);
        let err = save_blogs(&store, BLOGS_KEY, &seed_blogs()).await.unwrap_err();
        assert!(matches!(
            err,
            PersistError::Storage(StorageError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn test_persisted_format_field_names() {
        let raw = encode_blogs(&seed_blogs()[..1]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value[0];
        for field in [
            "id", "title", "content", "excerpt", "category", "author", "date", "thumbnail",
            "likes", "likedBy", "comments",
        ] {
            assert!(first.get(field).is_some(), "missing {field}");
        }
        assert_eq!(first["comments"][0]["author"], "Mike Johnson");
    }

    #[tokio::test]
    async fn test_view_snapshot_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(load_view(&store).await, None);

        let view = ViewSnapshot {
            selected_category: "Lifestyle".into(),
            sort_by: SortBy::Trending,
        };
        save_view(&store, &view).await.unwrap();
        assert_eq!(load_view(&store).await, Some(view));
    }

    #[tokio::test]
    async fn test_view_snapshot_corrupt_or_partial() {
        let store = MemoryStore::new();
        store.insert(VIEW_KEY, "{{");
        assert_eq!(load_view(&store).await, None);

        store.insert(VIEW_KEY, r#"{"sortBy":"likes"}"#);
        let view = load_view(&store).await.unwrap();
        assert_eq!(view.selected_category, "all");
        assert_eq!(view.sort_by, SortBy::Likes);
    }

    fn arb_comment() -> impl Strategy<Value = Comment> {
        ("[0-9]{1,4}", "[A-Za-z ]{0,12}", ".{0,40}", 0i64..20_000).prop_map(
            |(id, author, content, day)| Comment {
                id,
                author,
                content,
                date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Days::new(day as u64),
            },
        )
    }

    fn arb_blog() -> impl Strategy<Value = Blog> {
        (
            "[a-z0-9]{1,8}",
            ".{0,30}",
            ".{0,80}",
            prop::option::of("/[a-z]{1,10}\\.png"),
            prop::collection::btree_set("[a-z]{1,6}", 0..5),
            prop::collection::vec(arb_comment(), 0..4),
        )
            .prop_map(|(id, title, content, thumbnail, liked, comments)| {
                let liked_by: Vec<String> = liked.into_iter().collect();
                Blog {
                    id,
                    excerpt: crate::util::excerpt_of(&content, 150),
                    title,
                    content,
                    category: "Technology".into(),
                    author: "Jane Smith".into(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                    thumbnail,
                    likes: liked_by.len() as u32,
                    liked_by,
                    comments,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_encode_decode_round_trip(blogs in prop::collection::vec(arb_blog(), 0..5)) {
            let raw = encode_blogs(&blogs).unwrap();
            prop_assert_eq!(decode_blogs(&raw).unwrap(), blogs);
        }
    }
}
