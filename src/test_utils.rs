//! Test utilities for Fyyur
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory SQLite databases (one per test)
//! - AppState factories
//! - Test data generators

use chrono::{DateTime, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::{
    config::{Config, LogFormat},
    db::{
        entities::{artist, show, venue},
        genres,
    },
    state::AppState,
};

/// Setup an in-memory SQLite database with all migrations applied
///
/// Each call creates a fresh, isolated database perfect for parallel testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test configuration with sensible defaults
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 5000,
        log_format: LogFormat::Pretty,
        run_migrations: true,
    }
}

/// Create a complete test AppState with an isolated database
pub async fn setup_test_app_state() -> AppState {
    AppState::new(setup_test_db().await, test_config())
}

// ============================================================================
// Test Data Factories
// ============================================================================

/// Create a test venue in the database
pub async fn create_test_venue(
    db: &DatabaseConnection,
    name: &str,
    city: &str,
    state: &str,
) -> venue::Model {
    let venue = venue::ActiveModel {
        name: Set(name.to_string()),
        city: Set(city.to_string()),
        state: Set(state.to_string()),
        address: Set("1015 Folsom St".to_string()),
        phone: Set(Some("123-123-1234".to_string())),
        genres: Set(genres::encode(&["Jazz".to_string()]).expect("Failed to encode genres")),
        seeking_talent: Set(false),
        ..Default::default()
    };

    venue.insert(db).await.expect("Failed to insert test venue")
}

/// Create a test artist in the database
pub async fn create_test_artist(db: &DatabaseConnection, name: &str) -> artist::Model {
    let artist = artist::ActiveModel {
        name: Set(name.to_string()),
        city: Set("San Francisco".to_string()),
        state: Set("CA".to_string()),
        phone: Set("326-123-5000".to_string()),
        genres: Set(genres::encode(&["Rock n Roll".to_string()]).expect("Failed to encode genres")),
        image_link: Set(Some(format!(
            "https://images.example.com/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        ))),
        seeking_venue: Set(false),
        ..Default::default()
    };

    artist.insert(db).await.expect("Failed to insert test artist")
}

/// Create a test show in the database
pub async fn create_test_show(
    db: &DatabaseConnection,
    artist_id: i32,
    venue_id: i32,
    start_time: DateTime<Utc>,
) -> show::Model {
    let show = show::ActiveModel {
        artist_id: Set(artist_id),
        venue_id: Set(venue_id),
        start_time: Set(start_time.fixed_offset()),
        ..Default::default()
    };

    show.insert(db).await.expect("Failed to insert test show")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        // Verify we can query the database (it has tables from migrations)
        let venues = venue::Entity::find().all(&db).await.unwrap();
        assert_eq!(venues.len(), 0);
    }

    #[tokio::test]
    async fn test_create_test_show() {
        let db = setup_test_db().await;
        let venue = create_test_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;
        let artist = create_test_artist(&db, "Matt Quevedo").await;
        let start = Utc::now() + Duration::days(7);

        let show = create_test_show(&db, artist.id, venue.id, start).await;

        assert_eq!(show.artist_id, artist.id);
        assert_eq!(show.venue_id, venue.id);
        assert_eq!(show.start_time.timestamp(), start.timestamp());
    }

    #[tokio::test]
    async fn test_parallel_databases() {
        // Run two database setups in parallel - they should not interfere
        let (db1, db2) = tokio::join!(setup_test_db(), setup_test_db());

        let venue1 = create_test_venue(&db1, "Venue 1", "San Francisco", "CA").await;
        let venue2 = create_test_venue(&db2, "Venue 2", "New York", "NY").await;

        // Both should be ID 1 (separate databases)
        assert_eq!(venue1.id, 1);
        assert_eq!(venue2.id, 1);

        let db1_venues = venue::Entity::find().all(&db1).await.unwrap();
        let db2_venues = venue::Entity::find().all(&db2).await.unwrap();

        assert_eq!(db1_venues.len(), 1);
        assert_eq!(db2_venues.len(), 1);
        assert_eq!(db1_venues[0].name, "Venue 1");
        assert_eq!(db2_venues[0].name, "Venue 2");
    }
}
