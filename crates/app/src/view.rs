//! Plain-text rendering of the search and trending state.

use std::fmt::Write;

use marquee_core::types::NOT_AVAILABLE;
use marquee_core::{Movie, SearchEntry};

use crate::state::{SearchState, SearchStatus};

/// Render the movie list section. Poster paths are joined to `image_base`.
pub fn render_search(state: &SearchState, image_base: &str) -> String {
    let mut out = String::new();
    let heading = if state.is_browse() {
        "All Movies".to_string()
    } else {
        format!("Results for \"{}\"", state.query)
    };
    let _ = writeln!(out, "== {heading} ==");

    if state.is_fetching || state.status == SearchStatus::Loading {
        let _ = writeln!(out, "Loading...");
        return out;
    }
    if let Some(message) = &state.error_message {
        let _ = writeln!(out, "{message}");
        return out;
    }
    match state.status {
        SearchStatus::Idle => {}
        _ if state.movies.is_empty() => {
            let _ = writeln!(out, "No movies found.");
        }
        _ => {
            for movie in &state.movies {
                let _ = writeln!(out, "{}", movie_line(movie, image_base));
            }
        }
    }
    out
}

/// One movie card: title, rating, language, release year and poster.
pub fn movie_line(movie: &Movie, image_base: &str) -> String {
    let language = if movie.original_language.is_empty() {
        NOT_AVAILABLE
    } else {
        movie.original_language.as_str()
    };
    let poster = movie.poster_url(image_base);
    format!(
        "{} | * {} | {} | {} | {}",
        movie.title,
        movie.rating_label(),
        language,
        movie.release_year().unwrap_or(NOT_AVAILABLE),
        poster.as_deref().unwrap_or(NOT_AVAILABLE),
    )
}

/// Render the trending section; empty when there is nothing to show.
pub fn render_trending(entries: &[SearchEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut out = String::from("== Trending Movies ==\n");
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({} searches)", rank + 1, entry.search_term, entry.count);
    }
    out
}
