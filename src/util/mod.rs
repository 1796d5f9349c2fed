//! Utility functions shared by the entity model and the renderer.
//!
//! - **Text processing**: control-character stripping, excerpts and
//!   Unicode-aware truncation for terminal output
//! - **Thumbnails**: placeholder image references for posts without one
//!
//! # Examples
//!
//! ```
//! use blogroll::util::{excerpt_of, placeholder_thumbnail, truncate_to_width};
//!
//! assert_eq!(excerpt_of("Short body", 150), "Short body...");
//! assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
//! assert!(placeholder_thumbnail("My Post").ends_with("query=My%20Post"));
//! ```

mod text;
mod thumbnail;

pub use text::{clean_text, display_width, excerpt_of, truncate_to_width};
pub use thumbnail::placeholder_thumbnail;
