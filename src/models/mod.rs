//! Catalog entities served by the list endpoints.

pub mod director;
pub mod movie;

pub use director::{Director, DirectorColumn, DirectorFilter};
pub use movie::{Movie, MovieColumn, MovieFilter, Runtime};

/// Lowercased alphanumeric words, the way the `simple` text-search
/// configuration splits text.
pub(crate) fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// True when every word of `query` appears in `text`. An empty query
/// matches everything; a non-empty query with no words matches nothing.
pub(crate) fn text_matches(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let mut terms = words(query).peekable();
    if terms.peek().is_none() {
        return false;
    }

    let haystack: Vec<String> = words(text).collect();
    terms.all(|w| haystack.contains(&w))
}

/// True when `values` contains every entry of `required`.
pub(crate) fn contains_all(values: &[String], required: &[String]) -> bool {
    required.iter().all(|r| values.contains(r))
}
