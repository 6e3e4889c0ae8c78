use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryOrder, TransactionTrait,
};
use serde::Serialize;

use crate::{
    db::entities::{artist, show, venue},
    error::Result,
    forms::ShowFields,
};

/// A show with both sides of the booking loaded.
#[derive(Debug, Clone, Serialize)]
pub struct ShowListing {
    pub show: show::Model,
    pub venue: venue::Model,
    pub artist: artist::Model,
}

pub struct ShowRepository {
    db: DatabaseConnection,
}

impl ShowRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<ShowListing>> {
        let shows = show::Entity::find()
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .all(&self.db)
            .await?;

        let venues = shows.load_one(venue::Entity, &self.db).await?;
        let artists = shows.load_one(artist::Entity, &self.db).await?;

        Ok(shows
            .into_iter()
            .zip(venues.into_iter().zip(artists))
            .filter_map(|(show, pair)| match pair {
                (Some(venue), Some(artist)) => Some(ShowListing { show, venue, artist }),
                _ => {
                    tracing::warn!("Show {} references a missing venue or artist", show.id);
                    None
                }
            })
            .collect())
    }

    pub async fn create(&self, fields: ShowFields) -> Result<show::Model> {
        let mut active = show::ActiveModel {
            ..Default::default()
        };
        fields.apply(&mut active);

        let txn = self.db.begin().await?;
        let show = active.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            "Created show {} (artist {} at venue {})",
            show.id,
            show.artist_id,
            show.venue_id
        );
        Ok(show)
    }
}
