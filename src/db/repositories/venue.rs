use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    LoaderTrait, ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;

use super::{name_matches, SearchResults};
use crate::{
    db::{
        entities::{artist, show, venue},
        schedule::{ShowWith, VenueSchedule, VenueWithShows, WithShows},
    },
    error::{AppError, Result},
    forms::VenueFields,
};

/// Venues sharing one (city, state) pair.
#[derive(Debug, Clone, Serialize)]
pub struct CityGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueWithShows>,
}

pub struct VenueRepository {
    db: DatabaseConnection,
}

impl VenueRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<VenueWithShows>> {
        let venues = venue::Entity::find()
            .order_by_asc(venue::Column::Id)
            .all(&self.db)
            .await?;

        attach_shows(&self.db, venues).await
    }

    /// One ordered query, grouped in a single pass.
    pub async fn list_grouped_by_city(&self) -> Result<Vec<CityGroup>> {
        let venues = venue::Entity::find()
            .order_by_asc(venue::Column::City)
            .order_by_asc(venue::Column::State)
            .order_by_asc(venue::Column::Id)
            .all(&self.db)
            .await?;

        let mut groups: Vec<CityGroup> = Vec::new();
        for venue in attach_shows(&self.db, venues).await? {
            if let Some(group) = groups
                .last_mut()
                .filter(|g| g.city == venue.record.city && g.state == venue.record.state)
            {
                group.venues.push(venue);
                continue;
            }

            groups.push(CityGroup {
                city: venue.record.city.clone(),
                state: venue.record.state.clone(),
                venues: vec![venue],
            });
        }

        Ok(groups)
    }

    pub async fn search(&self, term: &str) -> Result<SearchResults<VenueWithShows>> {
        let venues: Vec<venue::Model> = venue::Entity::find()
            .order_by_asc(venue::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|venue| name_matches(&venue.name, term))
            .collect();

        Ok(attach_shows(&self.db, venues).await?.into())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<venue::Model>> {
        Ok(venue::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// The venue with every show booked there and the artist playing it.
    pub async fn find_schedule(&self, id: i32) -> Result<Option<VenueSchedule>> {
        let Some(venue) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let shows = venue
            .find_related(show::Entity)
            .order_by_asc(show::Column::StartTime)
            .all(&self.db)
            .await?;
        let artists = shows.load_one(artist::Entity, &self.db).await?;

        let shows = shows
            .into_iter()
            .zip(artists)
            .filter_map(|(show, artist)| {
                artist.map(|counterpart| ShowWith { show, counterpart })
            })
            .collect();

        Ok(Some(WithShows::new(venue, shows)))
    }

    pub async fn create(&self, fields: VenueFields) -> Result<venue::Model> {
        let mut active = venue::ActiveModel {
            ..Default::default()
        };
        fields.apply(&mut active)?;

        let txn = self.db.begin().await?;
        let venue = active.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!("Created venue {} ({})", venue.id, venue.name);
        Ok(venue)
    }

    /// Overwrites the submitted fields only.
    pub async fn update(&self, id: i32, fields: VenueFields) -> Result<venue::Model> {
        let txn = self.db.begin().await?;

        let existing = venue::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))?;

        let mut active: venue::ActiveModel = existing.clone().into();
        fields.apply(&mut active)?;

        let venue = if active.is_changed() {
            active.update(&txn).await?
        } else {
            existing
        };
        txn.commit().await?;

        tracing::info!("Updated venue {} ({})", venue.id, venue.name);
        Ok(venue)
    }

    /// Deletes the venue and every show booked there.
    pub async fn delete(&self, id: i32) -> Result<venue::Model> {
        let txn = self.db.begin().await?;

        let existing = venue::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))?;

        let removed = show::Entity::delete_many()
            .filter(show::Column::VenueId.eq(id))
            .exec(&txn)
            .await?;
        venue::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            "Deleted venue {} ({}) and {} show(s)",
            existing.id,
            existing.name,
            removed.rows_affected
        );
        Ok(existing)
    }
}

async fn attach_shows<C: ConnectionTrait>(
    db: &C,
    venues: Vec<venue::Model>,
) -> Result<Vec<VenueWithShows>> {
    let shows = venues.load_many(show::Entity, db).await?;

    Ok(venues
        .into_iter()
        .zip(shows)
        .map(|(venue, shows)| WithShows::new(venue, shows))
        .collect())
}
