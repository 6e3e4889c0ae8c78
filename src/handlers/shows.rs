use axum::extract::State;
use serde::Serialize;
use serde_json::json;

use super::{
    extract::FormBody,
    outcome::{Flash, Outcome},
};
use crate::{
    db::repositories::ShowListing,
    error::Result,
    forms::ShowFields,
    state::AppState,
};

#[derive(Serialize)]
pub struct ShowView {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl From<ShowListing> for ShowView {
    fn from(listing: ShowListing) -> Self {
        Self {
            venue_id: listing.venue.id,
            venue_name: listing.venue.name,
            artist_id: listing.artist.id,
            artist_name: listing.artist.name,
            artist_image_link: listing.artist.image_link,
            start_time: listing.show.start_time.to_rfc3339(),
        }
    }
}

/// Every show, earliest first
pub async fn list_shows(State(state): State<AppState>) -> Result<Outcome> {
    let shows: Vec<ShowView> = state
        .shows()
        .list_all()
        .await?
        .into_iter()
        .map(ShowView::from)
        .collect();

    Outcome::render("pages/shows", &json!({ "shows": shows }))
}

pub async fn create_show_form() -> Result<Outcome> {
    Outcome::render("forms/new_show", &json!({ "fields": ShowFields::FIELDS }))
}

pub async fn create_show_submission(
    State(state): State<AppState>,
    FormBody(form): FormBody,
) -> Result<Outcome> {
    let created = match ShowFields::from_form(&form) {
        Ok(fields) => state.shows().create(fields).await,
        Err(e) => Err(e),
    };

    match created {
        Ok(_) => Ok(Outcome::redirect("/shows").with_flash(Flash::success("Show was successfully listed!"))),
        Err(e) if e.is_command_failure() => {
            tracing::warn!("Show could not be listed: {}", e);
            Ok(Outcome::home()
                .with_flash(Flash::error("An error occurred. Show could not be listed.")))
        }
        Err(e) => Err(e),
    }
}
