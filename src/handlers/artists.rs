use axum::extract::State;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::{
    extract::{FormBody, RecordId},
    outcome::{Flash, Outcome},
    SearchView,
};
use crate::{
    db::{
        entities::{artist, venue},
        schedule::ShowWith,
    },
    error::{AppError, Result},
    forms::ArtistFields,
    state::AppState,
};

#[derive(Serialize)]
pub struct ArtistListItem {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize)]
pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Serialize)]
pub struct ArtistShowView {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

impl From<&ShowWith<venue::Model>> for ArtistShowView {
    fn from(booking: &ShowWith<venue::Model>) -> Self {
        Self {
            venue_id: booking.counterpart.id,
            venue_name: booking.counterpart.name.clone(),
            venue_image_link: booking.counterpart.image_link.clone(),
            start_time: booking.show.start_time.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct ArtistDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub past_shows: Vec<ArtistShowView>,
    pub upcoming_shows: Vec<ArtistShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Serialize)]
pub struct ArtistFormValues {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<artist::Model> for ArtistFormValues {
    fn from(artist: artist::Model) -> Self {
        let genres = artist.genre_list();
        Self {
            id: artist.id,
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            genres,
            image_link: artist.image_link,
            facebook_link: artist.facebook_link,
            website_link: artist.website_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
        }
    }
}

pub async fn list_artists(State(state): State<AppState>) -> Result<Outcome> {
    let artists: Vec<ArtistListItem> = state
        .artists()
        .list_all()
        .await?
        .into_iter()
        .map(|a| ArtistListItem { id: a.id, name: a.name })
        .collect();

    Outcome::render("pages/artists", &json!({ "artists": artists }))
}

pub async fn search_artists(
    State(state): State<AppState>,
    FormBody(form): FormBody,
) -> Result<Outcome> {
    let search_term = form.get("search_term").unwrap_or_default().to_string();
    let results = state.artists().search(&search_term).await?;

    let now = Utc::now();
    let data: Vec<ArtistSummary> = results
        .data
        .iter()
        .map(|a| ArtistSummary {
            id: a.record.id,
            name: a.record.name.clone(),
            num_upcoming_shows: a.num_upcoming_shows_at(now),
        })
        .collect();

    Outcome::render(
        "pages/search_artists",
        &SearchView {
            search_term,
            results: data.into(),
        },
    )
}

pub async fn show_artist(
    State(state): State<AppState>,
    RecordId(artist_id): RecordId,
) -> Result<Outcome> {
    let schedule = state
        .artists()
        .find_schedule(artist_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", artist_id)))?;

    let now = Utc::now();
    let past_shows: Vec<ArtistShowView> = schedule
        .past_shows_at(now)
        .into_iter()
        .map(ArtistShowView::from)
        .collect();
    let upcoming_shows: Vec<ArtistShowView> = schedule
        .upcoming_shows_at(now)
        .into_iter()
        .map(ArtistShowView::from)
        .collect();

    let artist = schedule.record;
    let detail = ArtistDetail {
        id: artist.id,
        genres: artist.genre_list(),
        name: artist.name,
        city: artist.city,
        state: artist.state,
        phone: artist.phone,
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description,
        image_link: artist.image_link,
        facebook_link: artist.facebook_link,
        website_link: artist.website_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    };

    Outcome::render("pages/show_artist", &json!({ "artist": detail }))
}

pub async fn create_artist_form() -> Result<Outcome> {
    Outcome::render("forms/new_artist", &json!({ "fields": ArtistFields::FIELDS }))
}

pub async fn create_artist_submission(
    State(state): State<AppState>,
    FormBody(form): FormBody,
) -> Result<Outcome> {
    let display_name = form.get("name").unwrap_or_default().to_string();

    match state.artists().create(ArtistFields::from_form(&form)).await {
        Ok(_) => Ok(Outcome::redirect("/artists").with_flash(Flash::success(format!(
            "Artist {} was successfully listed!",
            display_name
        )))),
        Err(e) if e.is_command_failure() => {
            tracing::warn!("Artist {} could not be listed: {}", display_name, e);
            Ok(Outcome::home().with_flash(Flash::error(format!(
                "An error occurred. Artist {} could not be listed.",
                display_name
            ))))
        }
        Err(e) => Err(e),
    }
}

pub async fn edit_artist(
    State(state): State<AppState>,
    RecordId(artist_id): RecordId,
) -> Result<Outcome> {
    let artist = state
        .artists()
        .find_by_id(artist_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", artist_id)))?;

    Outcome::render(
        "forms/edit_artist",
        &json!({
            "fields": ArtistFields::FIELDS,
            "artist": ArtistFormValues::from(artist),
        }),
    )
}

pub async fn edit_artist_submission(
    State(state): State<AppState>,
    RecordId(artist_id): RecordId,
    FormBody(form): FormBody,
) -> Result<Outcome> {
    let display_name = form.get("name").unwrap_or_default().to_string();

    match state.artists().update(artist_id, ArtistFields::from_form(&form)).await {
        Ok(artist) => Ok(Outcome::redirect(format!("/artists/{}", artist_id)).with_flash(
            Flash::success(format!("Artist {} was successfully updated!", artist.name)),
        )),
        Err(e) if e.is_command_failure() => {
            tracing::warn!("Artist {} could not be updated: {}", artist_id, e);
            Ok(Outcome::home().with_flash(Flash::error(format!(
                "An error occurred. Artist {} could not be updated.",
                display_name
            ))))
        }
        Err(e) => Err(e),
    }
}
