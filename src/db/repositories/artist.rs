use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, LoaderTrait, ModelTrait,
    QueryOrder, TransactionTrait,
};

use super::{name_matches, SearchResults};
use crate::{
    db::{
        entities::{artist, show, venue},
        schedule::{ArtistSchedule, ArtistWithShows, ShowWith, WithShows},
    },
    error::{AppError, Result},
    forms::ArtistFields,
};

pub struct ArtistRepository {
    db: DatabaseConnection,
}

impl ArtistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<artist::Model>> {
        Ok(artist::Entity::find()
            .order_by_asc(artist::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn search(&self, term: &str) -> Result<SearchResults<ArtistWithShows>> {
        let artists: Vec<artist::Model> = artist::Entity::find()
            .order_by_asc(artist::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|artist| name_matches(&artist.name, term))
            .collect();
        let shows = artists.load_many(show::Entity, &self.db).await?;

        let data: Vec<ArtistWithShows> = artists
            .into_iter()
            .zip(shows)
            .map(|(artist, shows)| WithShows::new(artist, shows))
            .collect();

        Ok(data.into())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<artist::Model>> {
        Ok(artist::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// The artist with every show they play and the venue hosting it.
    pub async fn find_schedule(&self, id: i32) -> Result<Option<ArtistSchedule>> {
        let Some(artist) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let shows = artist
            .find_related(show::Entity)
            .order_by_asc(show::Column::StartTime)
            .all(&self.db)
            .await?;
        let venues = shows.load_one(venue::Entity, &self.db).await?;

        let shows = shows
            .into_iter()
            .zip(venues)
            .filter_map(|(show, venue)| venue.map(|counterpart| ShowWith { show, counterpart }))
            .collect();

        Ok(Some(WithShows::new(artist, shows)))
    }

    pub async fn create(&self, fields: ArtistFields) -> Result<artist::Model> {
        let mut active = artist::ActiveModel {
            ..Default::default()
        };
        fields.apply(&mut active)?;

        let txn = self.db.begin().await?;
        let artist = active.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!("Created artist {} ({})", artist.id, artist.name);
        Ok(artist)
    }

    pub async fn update(&self, id: i32, fields: ArtistFields) -> Result<artist::Model> {
        let txn = self.db.begin().await?;

        let existing = artist::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))?;

        let mut active: artist::ActiveModel = existing.clone().into();
        fields.apply(&mut active)?;

        let artist = if active.is_changed() {
            active.update(&txn).await?
        } else {
            existing
        };
        txn.commit().await?;

        tracing::info!("Updated artist {} ({})", artist.id, artist.name);
        Ok(artist)
    }

    /// Shows are never removed with their artist: while an artist still has
    /// bookings the storage engine rejects the delete.
    pub async fn delete(&self, id: i32) -> Result<artist::Model> {
        let txn = self.db.begin().await?;

        let existing = artist::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))?;

        artist::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!("Deleted artist {} ({})", existing.id, existing.name);
        Ok(existing)
    }
}
