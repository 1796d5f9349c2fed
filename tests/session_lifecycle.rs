//! Integration tests for the session lifecycle: seed, mutate, persist, reopen.
//!
//! Each test opens its own in-memory SQLite database. Reopening a session over
//! a clone of the same `Database` shares the pool, so it sees exactly what the
//! previous session wrote.

use blogroll::persistence::{decode_blogs, LoadOutcome, BLOGS_KEY};
use blogroll::{
    Action, Database, NewBlog, NewComment, PersistError, Session, SessionError,
    SessionOptions, SortBy, StorageError,
};
use pretty_assertions::assert_eq;

async fn test_db() -> Database {
    Database::open(":memory:").await.unwrap()
}

fn draft(title: &str, category: &str) -> NewBlog {
    NewBlog {
        title: title.to_string(),
        content: format!("All about {title}"),
        category: category.to_string(),
        thumbnail: None,
    }
}

// ============================================================================
// Startup
// ============================================================================

#[tokio::test]
async fn test_first_run_seeds_and_writes_back() {
    let db = test_db().await;
    let session = Session::open(db.clone(), SessionOptions::default()).await;

    assert_eq!(session.load_outcome(), LoadOutcome::Missing);
    let titles: Vec<_> = session.state().blogs.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Getting Started with React and Tailwind CSS",
            "The Future of Artificial Intelligence",
            "Sustainable Living: Small Changes, Big Impact",
        ]
    );

    let raw = db.get_item(BLOGS_KEY).await.unwrap().unwrap();
    assert_eq!(decode_blogs(&raw).unwrap(), session.state().blogs);
}

#[tokio::test]
async fn test_corrupt_storage_falls_back_to_seed() {
    let db = test_db().await;
    db.set_item(BLOGS_KEY, "{\"not\": \"an array\"").await.unwrap();

    let session = Session::open(db.clone(), SessionOptions::default()).await;
    assert_eq!(session.load_outcome(), LoadOutcome::Corrupt);
    assert_eq!(session.state().blogs.len(), 3);

    // The seed replaced the corrupt blob
    let raw = db.get_item(BLOGS_KEY).await.unwrap().unwrap();
    assert!(decode_blogs(&raw).is_ok());
}

#[tokio::test]
async fn test_empty_collection_is_not_reseeded() {
    let db = test_db().await;
    let mut session = Session::open(db.clone(), SessionOptions::default()).await;
    session.dispatch(Action::LoadBlogs(vec![])).await.unwrap();

    let reopened = Session::open(db, SessionOptions::default()).await;
    assert_eq!(reopened.load_outcome(), LoadOutcome::Restored);
    assert!(reopened.state().blogs.is_empty());
}

#[tokio::test]
async fn test_reset_clears_and_reseeds() {
    let db = test_db().await;
    let mut session = Session::open(db.clone(), SessionOptions::default()).await;
    session.create_blog(draft("Gone soon", "Travel")).await.unwrap();
    session
        .dispatch(Action::SetSortBy(SortBy::Likes))
        .await
        .unwrap();

    assert_eq!(db.clear().await.unwrap(), 2);

    let reopened = Session::open(db, SessionOptions::default()).await;
    assert_eq!(reopened.load_outcome(), LoadOutcome::Missing);
    assert_eq!(reopened.state().blogs.len(), 3);
    assert_eq!(reopened.state().sort_by, SortBy::Newest);
}

// ============================================================================
// Mutations Survive Reopen
// ============================================================================

#[tokio::test]
async fn test_create_like_comment_survive_reopen() {
    let db = test_db().await;
    let mut session = Session::open(db.clone(), SessionOptions::default()).await;

    let id = session.create_blog(draft("Rust in Practice", "Technology")).await.unwrap();
    session.toggle_like(&id).await.unwrap();
    session
        .add_comment(&id, NewComment::new("First!"))
        .await
        .unwrap();
    session.toggle_like("3").await.unwrap();

    let reopened = Session::open(db, SessionOptions::default()).await;
    assert_eq!(reopened.load_outcome(), LoadOutcome::Restored);
    assert_eq!(reopened.state().blogs, session.state().blogs);

    let created = reopened.find(&id).unwrap();
    assert_eq!(reopened.state().blogs[0].id, id);
    assert_eq!(created.likes, 1);
    assert_eq!(created.liked_by, vec!["John Doe".to_string()]);
    assert_eq!(created.comments.len(), 1);
    assert_eq!(created.comments[0].author, "John Doe");

    let sustainable = reopened.find("3").unwrap();
    assert_eq!(sustainable.likes, 32);
    assert!(sustainable.has_liked("John Doe"));
}

#[tokio::test]
async fn test_new_ids_do_not_collide_after_reopen() {
    let db = test_db().await;
    let mut session = Session::open(db.clone(), SessionOptions::default()).await;
    let first = session.create_blog(draft("One", "Travel")).await.unwrap();

    let mut reopened = Session::open(db, SessionOptions::default()).await;
    let second = reopened.create_blog(draft("Two", "Travel")).await.unwrap();

    assert_ne!(first, second);
    assert!(second.parse::<i64>().unwrap() > first.parse::<i64>().unwrap());
}

#[tokio::test]
async fn test_view_preferences_survive_reopen() {
    let db = test_db().await;
    let mut session = Session::open(db.clone(), SessionOptions::default()).await;
    session
        .dispatch(Action::SetCategory("Technology".into()))
        .await
        .unwrap();
    session
        .dispatch(Action::SetSortBy(SortBy::Trending))
        .await
        .unwrap();

    let reopened = Session::open(db, SessionOptions::default()).await;
    assert_eq!(reopened.state().selected_category, "Technology");
    assert_eq!(reopened.state().sort_by, SortBy::Trending);
    let ids: Vec<_> = reopened.visible().iter().map(|b| b.id.clone()).collect();
    assert_eq!(ids, vec!["2"]);
}

#[tokio::test]
async fn test_json_dispatch_round_trip() {
    let db = test_db().await;
    let mut session = Session::open(db.clone(), SessionOptions::default()).await;

    let action = Action::from_json(
        r#"{"type":"LIKE_BLOG","payload":{"blogId":"1","userId":"someone-else"}}"#,
    )
    .unwrap();
    session.dispatch(action).await.unwrap();

    let unknown = Action::from_json(r#"{"type":"DELETE_BLOG","payload":"1"}"#).unwrap();
    let before = session.state().clone();
    session.dispatch(unknown).await.unwrap();
    assert_eq!(session.state(), &before);

    let reopened = Session::open(db, SessionOptions::default()).await;
    assert_eq!(reopened.find("1").unwrap().likes, 25);
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn test_quota_failure_surfaces_and_keeps_memory() {
    let db = test_db().await.with_quota(Some(6_000));
    let mut session = Session::open(db.clone(), SessionOptions::default()).await;

    let huge = NewBlog {
        content: "lorem ipsum ".repeat(1_000),
        ..draft("Too big", "Lifestyle")
    };
    let err = session.create_blog(huge).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Persist(PersistError::Storage(StorageError::QuotaExceeded { .. }))
    ));

    // In memory the post exists; on disk the previous collection remains
    assert_eq!(session.state().blogs[0].title, "Too big");
    let raw = db.get_item(BLOGS_KEY).await.unwrap().unwrap();
    assert_eq!(decode_blogs(&raw).unwrap().len(), 3);
}

#[tokio::test]
async fn test_validation_rejects_before_dispatch() {
    let db = test_db().await;
    let mut session = Session::open(db.clone(), SessionOptions::default()).await;
    let before = db.get_item(BLOGS_KEY).await.unwrap();

    let err = session
        .create_blog(draft("Title", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));
    assert!(err.to_string().contains("category"));

    let err = session
        .add_comment("1", NewComment::new("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));

    assert_eq!(session.state().blogs.len(), 3);
    assert_eq!(db.get_item(BLOGS_KEY).await.unwrap(), before);
}
