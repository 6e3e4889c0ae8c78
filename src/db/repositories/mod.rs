//! Query/command layer. Every write runs in its own transaction; returning
//! early with `?` drops the transaction, which rolls it back.

mod artist;
mod show;
mod venue;

pub use artist::ArtistRepository;
pub use show::{ShowListing, ShowRepository};
pub use venue::{CityGroup, VenueRepository};

use serde::Serialize;

/// Matching records plus how many there were.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for SearchResults<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Case-insensitive "contains". Folding happens here rather than in SQL
/// because SQLite's `LOWER` only folds ASCII. An empty term matches every
/// name.
pub(crate) fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}
