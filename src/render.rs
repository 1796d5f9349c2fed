//! Plain-text rendering of the derived view for the command-line host.
//!
//! Nothing here touches state; every function formats what it is given.
use std::fmt::Write;

use crate::blog::{Blog, ALL_CATEGORIES};
use crate::query::ViewQuery;
use crate::util::{display_width, truncate_to_width};

/// Default terminal width when none is known.
pub const DEFAULT_WIDTH: usize = 80;

const LIKED: char = '♥';
const NOT_LIKED: char = '♡';

fn like_marker(blog: &Blog, user: &str) -> char {
    if blog.has_liked(user) {
        LIKED
    } else {
        NOT_LIKED
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Label shown for a category filter value.
pub fn category_label(category: &str) -> &str {
    if category == ALL_CATEGORIES {
        "All Categories"
    } else {
        category
    }
}

/// One-line card: likes, date, id, title and category.
pub fn card_line(blog: &Blog, user: &str, width: usize) -> String {
    let prefix = format!(
        "{} {:>3}  {}  #{}  ",
        like_marker(blog, user),
        blog.likes,
        blog.date,
        blog.id
    );
    let suffix = format!("  [{}]", blog.category);
    let room = width.saturating_sub(display_width(&prefix) + display_width(&suffix));
    format!("{prefix}{}{suffix}", truncate_to_width(&blog.title, room))
}

/// The filtered list with a summary header.
pub fn render_list(blogs: &[&Blog], query: &ViewQuery<'_>, user: &str, width: usize) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "{} · {} · sorted by {}",
        plural(blogs.len(), "post", "posts"),
        category_label(query.category),
        query.sort_by
    );
    if !query.search_term.is_empty() {
        let _ = write!(out, " · matching \"{}\"", query.search_term);
    }
    out.push('\n');

    if blogs.is_empty() {
        out.push_str("No blogs found. Try adjusting your search or filters.\n");
        return out;
    }
    for blog in blogs {
        out.push_str(&card_line(blog, user, width));
        out.push('\n');
        let excerpt = truncate_to_width(&blog.excerpt, width.saturating_sub(4));
        let _ = writeln!(
            out,
            "    {excerpt}\n    by {} · {}",
            blog.author,
            plural(blog.comments.len(), "comment", "comments")
        );
    }
    out
}

/// A full post with its comments.
pub fn render_post(blog: &Blog, user: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", blog.title);
    let _ = writeln!(
        out,
        "{} · {} · {} · #{}",
        blog.category, blog.author, blog.date, blog.id
    );
    if let Some(thumbnail) = &blog.thumbnail {
        let _ = writeln!(out, "thumbnail: {thumbnail}");
    }
    let _ = writeln!(out, "\n{}\n", blog.content);
    let _ = writeln!(
        out,
        "{} {} · {}",
        like_marker(blog, user),
        plural(blog.likes as usize, "like", "likes"),
        plural(blog.comments.len(), "comment", "comments")
    );

    if blog.comments.is_empty() {
        out.push_str("\nNo comments yet. Be the first to comment!\n");
    } else {
        out.push('\n');
        for comment in &blog.comments {
            let _ = writeln!(out, "  {} ({}): {}", comment.author, comment.date, comment.content);
        }
    }
    out
}

/// Filter options, marking the selected one with `*`.
pub fn render_categories(categories: &[String], selected: &str) -> String {
    categories
        .iter()
        .map(|c| {
            let mark = if c == selected { '*' } else { ' ' };
            format!("{mark} {}\n", category_label(c))
        })
        .collect()
}
