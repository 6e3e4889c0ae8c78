use axum::extract::State;
use chrono::{DateTime, Utc};
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
        repositories::CityGroup,
        schedule::{ShowWith, VenueWithShows},
    },
    error::{AppError, Result},
    forms::VenueFields,
    state::AppState,
};

#[derive(Serialize)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

impl VenueSummary {
    fn at(venue: &VenueWithShows, now: DateTime<Utc>) -> Self {
        Self {
            id: venue.record.id,
            name: venue.record.name.clone(),
            num_upcoming_shows: venue.num_upcoming_shows_at(now),
        }
    }
}

#[derive(Serialize)]
pub struct AreaView {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Serialize)]
pub struct VenueShowView {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl From<&ShowWith<artist::Model>> for VenueShowView {
    fn from(booking: &ShowWith<artist::Model>) -> Self {
        Self {
            artist_id: booking.counterpart.id,
            artist_name: booking.counterpart.name.clone(),
            artist_image_link: booking.counterpart.image_link.clone(),
            start_time: booking.show.start_time.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct VenueDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: String,
    pub past_shows: Vec<VenueShowView>,
    pub upcoming_shows: Vec<VenueShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Current values for the edit form.
#[derive(Serialize)]
pub struct VenueFormValues {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<venue::Model> for VenueFormValues {
    fn from(venue: venue::Model) -> Self {
        let genres = venue.genre_list();
        Self {
            id: venue.id,
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone,
            image_link: venue.image_link,
            facebook_link: venue.facebook_link,
            website_link: venue.website_link,
            genres,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
        }
    }
}

/// Venues grouped by city and state
pub async fn list_venues(State(state): State<AppState>) -> Result<Outcome> {
    let now = Utc::now();
    let areas: Vec<AreaView> = state
        .venues()
        .list_grouped_by_city()
        .await?
        .into_iter()
        .map(|group: CityGroup| AreaView {
            venues: group.venues.iter().map(|v| VenueSummary::at(v, now)).collect(),
            city: group.city,
            state: group.state,
        })
        .collect();

    Outcome::render("pages/venues", &json!({ "areas": areas }))
}

pub async fn search_venues(
    State(state): State<AppState>,
    FormBody(form): FormBody,
) -> Result<Outcome> {
    let search_term = form.get("search_term").unwrap_or_default().to_string();
    let results = state.venues().search(&search_term).await?;

    let now = Utc::now();
    let data: Vec<VenueSummary> = results.data.iter().map(|v| VenueSummary::at(v, now)).collect();

    Outcome::render(
        "pages/search_venues",
        &SearchView {
            search_term,
            results: data.into(),
        },
    )
}

pub async fn show_venue(
    State(state): State<AppState>,
    RecordId(venue_id): RecordId,
) -> Result<Outcome> {
    let schedule = state
        .venues()
        .find_schedule(venue_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", venue_id)))?;

    let now = Utc::now();
    let past_shows: Vec<VenueShowView> = schedule
        .past_shows_at(now)
        .into_iter()
        .map(VenueShowView::from)
        .collect();
    let upcoming_shows: Vec<VenueShowView> = schedule
        .upcoming_shows_at(now)
        .into_iter()
        .map(VenueShowView::from)
        .collect();

    let venue = schedule.record;
    let detail = VenueDetail {
        id: venue.id,
        genres: venue.genre_list(),
        name: venue.name,
        address: venue.address,
        city: venue.city,
        state: venue.state,
        phone: venue.phone,
        website_link: venue.website_link,
        facebook_link: venue.facebook_link,
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description,
        image_link: venue.image_link.unwrap_or_default(),
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    };

    Outcome::render("pages/show_venue", &json!({ "venue": detail }))
}

pub async fn create_venue_form() -> Result<Outcome> {
    Outcome::render("forms/new_venue", &json!({ "fields": VenueFields::FIELDS }))
}

pub async fn create_venue_submission(
    State(state): State<AppState>,
    FormBody(form): FormBody,
) -> Result<Outcome> {
    let display_name = form.get("name").unwrap_or_default().to_string();

    match state.venues().create(VenueFields::from_form(&form)).await {
        Ok(_) => Ok(Outcome::redirect("/venues").with_flash(Flash::success(format!(
            "Venue {} was successfully listed!",
            display_name
        )))),
        Err(e) if e.is_command_failure() => {
            tracing::warn!("Venue {} could not be listed: {}", display_name, e);
            Ok(Outcome::home().with_flash(Flash::error(format!(
                "An error occurred. Venue {} could not be listed.",
                display_name
            ))))
        }
        Err(e) => Err(e),
    }
}

pub async fn edit_venue(
    State(state): State<AppState>,
    RecordId(venue_id): RecordId,
) -> Result<Outcome> {
    let venue = state
        .venues()
        .find_by_id(venue_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", venue_id)))?;

    Outcome::render(
        "forms/edit_venue",
        &json!({
            "fields": VenueFields::FIELDS,
            "venue": VenueFormValues::from(venue),
        }),
    )
}

pub async fn edit_venue_submission(
    State(state): State<AppState>,
    RecordId(venue_id): RecordId,
    FormBody(form): FormBody,
) -> Result<Outcome> {
    let display_name = form.get("name").unwrap_or_default().to_string();

    match state.venues().update(venue_id, VenueFields::from_form(&form)).await {
        Ok(venue) => Ok(Outcome::redirect(format!("/venues/{}", venue_id)).with_flash(
            Flash::success(format!("Venue {} was successfully updated!", venue.name)),
        )),
        Err(e) if e.is_command_failure() => {
            tracing::warn!("Venue {} could not be updated: {}", venue_id, e);
            Ok(Outcome::home().with_flash(Flash::error(format!(
                "An error occurred. Venue {} could not be updated.",
                display_name
            ))))
        }
        Err(e) => Err(e),
    }
}

/// Deletes without redirecting; the page removes the venue itself.
pub async fn delete_venue(
    State(state): State<AppState>,
    RecordId(venue_id): RecordId,
) -> Result<Outcome> {
    let display_name = state
        .venues()
        .find_by_id(venue_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", venue_id)))?
        .name;

    match state.venues().delete(venue_id).await {
        Ok(_) => Ok(Outcome::empty().with_flash(Flash::success(format!(
            "Venue {} was successfully deleted!",
            display_name
        )))),
        Err(e) if e.is_command_failure() => {
            tracing::warn!("Venue {} could not be deleted: {}", venue_id, e);
            Ok(Outcome::empty().with_flash(Flash::error(format!(
                "An error occurred. Venue {} could not be deleted.",
                display_name
            ))))
        }
        Err(e) => Err(e),
    }
}
