//! Single-user blogging state model.
//!
//! - [`blog`]: entities, the like-set invariant and creation drafts
//! - [`store`]: application state and the pure `reduce` function
//! - [`query`]: search, category filter and sort over the collection
//! - [`persistence`]: load-or-seed, persist-on-change and the [`Session`] host wiring
//! - [`storage`]: the key-value facility (in-memory and SQLite backends)
//!
//! ```no_run
//! use blogroll::{Action, MemoryStore, Session, SessionOptions, SortBy};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut session = Session::open(MemoryStore::new(), SessionOptions::default()).await;
//! session.toggle_like("1").await?;
//! session.dispatch(Action::SetSortBy(SortBy::Likes)).await?;
//! for blog in session.visible() {
//!     println!("{} ({} likes)", blog.title, blog.likes);
//! }
//! # Ok(())
//! # }
//! ```
pub mod blog;
pub mod config;
pub mod persistence;
pub mod query;
pub mod render;
pub mod storage;
pub mod store;
pub mod util;

pub use blog::{Blog, Comment, NewBlog, NewComment, SortBy, ValidationError};
pub use persistence::{PersistError, Session, SessionError, SessionOptions};
pub use storage::{Database, KeyValueStore, MemoryStore, StorageError};
pub use store::{reduce, Action, State};
