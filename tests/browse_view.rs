//! Integration tests for the derived view over the sample posts: search,
//! category filter, sort modes and the category list.

use blogroll::persistence::seed_blogs;
use blogroll::query::{categories, visible_blogs, ViewQuery};
use blogroll::{reduce, Action, Blog, SortBy, State};
use pretty_assertions::assert_eq;

fn seeded_state() -> State {
    reduce(State::default(), Action::LoadBlogs(seed_blogs()))
}

fn ids(blogs: &[&Blog]) -> Vec<String> {
    blogs.iter().map(|b| b.id.clone()).collect()
}

#[test]
fn test_default_view_is_newest_first() {
    let state = seeded_state();
    assert_eq!(ids(&state.visible()), vec!["1", "2", "3"]);
}

#[test]
fn test_sort_modes_over_seed() {
    let state = reduce(seeded_state(), Action::SetSortBy(SortBy::Likes));
    // 31, 24, 18
    assert_eq!(ids(&state.visible()), vec!["3", "1", "2"]);

    let state = reduce(state, Action::SetSortBy(SortBy::Trending));
    // 33, 25, 18
    assert_eq!(ids(&state.visible()), vec!["3", "1", "2"]);
}

#[test]
fn test_liking_changes_ranking() {
    let mut state = reduce(seeded_state(), Action::SetSortBy(SortBy::Likes));
    for i in 0..7 {
        state = reduce(
            state,
            Action::LikeBlog {
                blog_id: "2".into(),
                user_id: format!("fan-{i}"),
            },
        );
    }
    // 18 + 7 = 25 > 24
    assert_eq!(ids(&state.visible()), vec!["3", "2", "1"]);
}

#[test]
fn test_search_react_excludes_sustainable_living() {
    let state = reduce(seeded_state(), Action::SetSearchTerm("react".into()));
    assert_eq!(ids(&state.visible()), vec!["1"]);
}

#[test]
fn test_search_by_author() {
    let state = reduce(seeded_state(), Action::SetSearchTerm("sarah".into()));
    assert_eq!(ids(&state.visible()), vec!["3"]);
}

#[test]
fn test_category_filter_and_reset() {
    let state = reduce(seeded_state(), Action::SetCategory("Technology".into()));
    assert_eq!(ids(&state.visible()), vec!["2"]);

    let state = reduce(state, Action::SetCategory("all".into()));
    assert_eq!(state.visible().len(), 3);
}

#[test]
fn test_unknown_category_shows_nothing() {
    let state = reduce(seeded_state(), Action::SetCategory("Cooking".into()));
    assert!(state.visible().is_empty());
}

#[test]
fn test_category_list_over_seed() {
    let blogs = seed_blogs();
    assert_eq!(
        categories(&blogs),
        vec!["all", "Web Development", "Technology", "Lifestyle"]
    );
}

#[test]
fn test_view_query_borrowed_inputs() {
    let blogs = seed_blogs();
    let term = String::from("ARTIFICIAL");
    let query = ViewQuery {
        search_term: &term,
        category: "all",
        sort_by: SortBy::Newest,
    };
    assert_eq!(ids(&visible_blogs(&blogs, &query)), vec!["2"]);
}
