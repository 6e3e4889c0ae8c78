pub mod artists;
pub mod extract;
pub mod outcome;
pub mod pages;
pub mod shows;
pub mod venues;

use axum::{
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;

use crate::{db::repositories::SearchResults, state::AppState};

pub use outcome::{Flash, Outcome, Severity};

/// Search page data: the term echoed back with what it matched.
#[derive(Serialize)]
pub struct SearchView<T> {
    pub search_term: String,
    pub results: SearchResults<T>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health))

        // Venues
        .route("/venues", get(venues::list_venues))
        .route("/venues/search", post(venues::search_venues))
        .route(
            "/venues/create",
            get(venues::create_venue_form).post(venues::create_venue_submission),
        )
        .route("/venues/:venue_id", get(venues::show_venue))
        .route(
            "/venues/:venue_id/edit",
            get(venues::edit_venue).post(venues::edit_venue_submission),
        )
        .route("/venues/:venue_id/delete", delete(venues::delete_venue))

        // Artists
        .route("/artists", get(artists::list_artists))
        .route("/artists/search", post(artists::search_artists))
        .route(
            "/artists/create",
            get(artists::create_artist_form).post(artists::create_artist_submission),
        )
        .route("/artists/:artist_id", get(artists::show_artist))
        .route(
            "/artists/:artist_id/edit",
            get(artists::edit_artist).post(artists::edit_artist_submission),
        )

        // Shows
        .route("/shows", get(shows::list_shows))
        .route(
            "/shows/create",
            get(shows::create_show_form).post(shows::create_show_submission),
        )

        .fallback(pages::not_found)
}
