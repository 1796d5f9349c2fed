//! Sample posts shown on first run.
use chrono::NaiveDate;

use crate::blog::{Blog, Comment};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Synthetic like-set of `n` demo readers, so `likes == liked_by.len()` holds
/// for the sample counts.
fn demo_readers(n: u32) -> Vec<String> {
    (1..=n).map(|i| format!("reader-{i}")).collect()
}

#[allow(clippy::too_many_arguments)]
fn seeded(
    id: &str,
    title: &str,
    content: &str,
    excerpt: &str,
    category: &str,
    author: &str,
    date: NaiveDate,
    thumbnail: &str,
    likes: u32,
    comments: Vec<Comment>,
) -> Blog {
    Blog {
        id: id.to_owned(),
        title: title.to_owned(),
        content: content.to_owned(),
        excerpt: excerpt.to_owned(),
        category: category.to_owned(),
        author: author.to_owned(),
        date,
        thumbnail: Some(thumbnail.to_owned()),
        likes,
        liked_by: demo_readers(likes),
        comments,
    }
}

fn comment(id: &str, author: &str, content: &str, date: NaiveDate) -> Comment {
    Comment {
        id: id.to_owned(),
        author: author.to_owned(),
        content: content.to_owned(),
        date,
    }
}

/// The fixed demo set, newest first.
pub fn seed_blogs() -> Vec<Blog> {
    vec![
        seeded(
            "1",
            "Getting Started with React and Tailwind CSS",
            "React and Tailwind CSS make a powerful combination for building modern web \
             applications. In this comprehensive guide, we'll explore how to set up your \
             development environment and create beautiful, responsive user interfaces.",
            "Learn how to combine React and Tailwind CSS for modern web development.",
            "Web Development",
            "Jane Smith",
            ymd(2024, 1, 15),
            "/react.png?height=200&width=400",
            24,
            vec![comment(
                "1",
                "Mike Johnson",
                "Great tutorial! Very helpful for beginners.",
                ymd(2024, 1, 16),
            )],
        ),
        seeded(
            "2",
            "The Future of Artificial Intelligence",
            "Artificial Intelligence is rapidly evolving and transforming industries across \
             the globe. From machine learning to natural language processing, AI technologies \
             are becoming more sophisticated and accessible.",
            "Exploring the latest trends and developments in AI technology.",
            "Technology",
            "Alex Chen",
            ymd(2024, 1, 14),
            "/ai.avif?height=200&width=400",
            18,
            vec![],
        ),
        seeded(
            "3",
            "Sustainable Living: Small Changes, Big Impact",
            "Making sustainable choices doesn't have to be overwhelming. This article explores \
             simple lifestyle changes that can make a significant difference for our environment.",
            "Discover practical tips for living more sustainably.",
            "Lifestyle",
            "Sarah Green",
            ymd(2024, 1, 13),
            "/life.jpg?height=200&width=400",
            31,
            vec![
                comment(
                    "2",
                    "Emma Wilson",
                    "Love these practical tips! Already started implementing some.",
                    ymd(2024, 1, 14),
                ),
                comment(
                    "3",
                    "David Brown",
                    "Very inspiring article. We all need to do our part.",
                    ymd(2024, 1, 14),
                ),
            ],
        ),
    ]
}
