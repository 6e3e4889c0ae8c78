//! Repository integration tests
//!
//! Exercises the query/command layer against a migrated in-memory database:
//! - Create/update/delete commit atomically and roll back on constraint errors
//! - Search is a case-insensitive substring match
//! - Grouped listings bucket venues by (city, state)
//! - Deleting a venue takes its shows with it; deleting an artist never does

use chrono::{Duration, TimeZone, Utc};
use fake::{
    faker::{address::en::CityName, phone_number::en::PhoneNumber},
    Fake,
};
use pretty_assertions::assert_eq;
use sea_orm::{EntityTrait, PaginatorTrait};

use fyyur::db::entities::{artist, show, venue};
use fyyur::db::repositories::{ArtistRepository, ShowRepository, VenueRepository};
use fyyur::error::AppError;
use fyyur::forms::{ArtistFields, ShowFields, VenueFields};
use fyyur::test_utils::*;

fn musical_hop() -> VenueFields {
    VenueFields {
        name: Some("The Musical Hop".to_string()),
        city: Some("San Francisco".to_string()),
        state: Some("CA".to_string()),
        address: Some("1015 Folsom St".to_string()),
        genres: Some(vec!["Jazz".to_string(), "Reggae".to_string()]),
        ..Default::default()
    }
}

fn artist_named(name: &str) -> ArtistFields {
    ArtistFields {
        name: Some(name.to_string()),
        city: Some(CityName().fake()),
        state: Some("CA".to_string()),
        phone: Some(PhoneNumber().fake()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_venue_is_retrievable_and_grouped() {
    let db = setup_test_db().await;
    let repo = VenueRepository::new(db.clone());

    let created = repo.create(musical_hop()).await.expect("create should succeed");

    let found = repo.find_by_id(created.id).await.unwrap().expect("venue should exist");
    assert_eq!(found, created);
    assert_eq!(found.genre_list(), vec!["Jazz".to_string(), "Reggae".to_string()]);
    assert!(!found.seeking_talent);

    let groups = repo.list_grouped_by_city().await.unwrap();
    let group = groups
        .iter()
        .find(|g| g.city == "San Francisco" && g.state == "CA")
        .expect("San Francisco group should exist");
    assert!(group.venues.iter().any(|v| v.record.id == created.id));
}

#[tokio::test]
async fn test_duplicate_venue_tuple_is_rejected() {
    let db = setup_test_db().await;
    let repo = VenueRepository::new(db.clone());

    repo.create(musical_hop()).await.unwrap();
    let before = venue::Entity::find().count(&db).await.unwrap();

    let result = repo.create(musical_hop()).await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(venue::Entity::find().count(&db).await.unwrap(), before);
}

#[tokio::test]
async fn test_same_name_at_another_address_is_allowed() {
    let db = setup_test_db().await;
    let repo = VenueRepository::new(db.clone());

    repo.create(musical_hop()).await.unwrap();
    let second = repo
        .create(VenueFields {
            address: Some("34 Whiskey Moore Ave".to_string()),
            ..musical_hop()
        })
        .await;

    assert!(second.is_ok());
    assert_eq!(venue::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_create_venue_without_address_fails() {
    let db = setup_test_db().await;
    let repo = VenueRepository::new(db.clone());

    let result = repo
        .create(VenueFields {
            address: None,
            ..musical_hop()
        })
        .await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(venue::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_grouped_listing_buckets_by_city_and_state() {
    let db = setup_test_db().await;
    create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;
    create_test_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;

    let groups = VenueRepository::new(db).list_grouped_by_city().await.unwrap();

    let summary: Vec<(String, String, usize)> = groups
        .iter()
        .map(|g| (g.city.clone(), g.state.clone(), g.venues.len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("New York".to_string(), "NY".to_string(), 1),
            ("San Francisco".to_string(), "CA".to_string(), 2),
        ]
    );
}

#[tokio::test]
async fn test_same_city_in_different_states_are_separate_groups() {
    let db = setup_test_db().await;
    create_test_venue(&db, "Portland Hall", "Portland", "OR").await;
    create_test_venue(&db, "Portland Barn", "Portland", "ME").await;

    let groups = VenueRepository::new(db).list_grouped_by_city().await.unwrap();

    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.venues.len() == 1));
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let db = setup_test_db().await;
    create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;

    let repo = VenueRepository::new(db);

    let results = repo.search("musical").await.unwrap();
    assert_eq!(results.count, 1);
    assert_eq!(results.data[0].record.name, "The Musical Hop");

    let results = repo.search("MUSIC").await.unwrap();
    assert_eq!(results.count, 2);

    let results = repo.search("jazz club").await.unwrap();
    assert_eq!(results.count, 0);
    assert!(results.data.is_empty());
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let db = setup_test_db().await;
    create_test_venue(&db, "Café Élan", "Montréal", "QC").await;
    create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;

    let repo = VenueRepository::new(db);

    let results = repo.search("élan").await.unwrap();
    assert_eq!(results.count, 1);
    assert_eq!(results.data[0].record.name, "Café Élan");

    assert_eq!(repo.search("CAFÉ").await.unwrap().count, 1);
}

#[tokio::test]
async fn test_empty_search_term_matches_everything() {
    let db = setup_test_db().await;
    create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;
    create_test_artist(&db, "Guns N Petals").await;

    let venues = VenueRepository::new(db.clone()).search("").await.unwrap();
    assert_eq!(venues.count as u64, venue::Entity::find().count(&db).await.unwrap());

    let artists = ArtistRepository::new(db.clone()).search("").await.unwrap();
    assert_eq!(artists.count, 1);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let db = setup_test_db().await;
    create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&db, "100% Jazz", "New Orleans", "LA").await;

    let repo = VenueRepository::new(db);

    let results = repo.search("%").await.unwrap();
    assert_eq!(results.count, 1);
    assert_eq!(results.data[0].record.name, "100% Jazz");

    assert_eq!(repo.search("_").await.unwrap().count, 0);
}

#[tokio::test]
async fn test_update_overwrites_only_submitted_fields() {
    let db = setup_test_db().await;
    let repo = VenueRepository::new(db.clone());
    let created = repo.create(musical_hop()).await.unwrap();

    let updated = repo
        .update(
            created.id,
            VenueFields {
                phone: Some("123-123-1234".to_string()),
                seeking_talent: Some(true),
                genres: Some(vec!["Swing".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "The Musical Hop");
    assert_eq!(updated.address, "1015 Folsom St");
    assert_eq!(updated.phone.as_deref(), Some("123-123-1234"));
    assert!(updated.seeking_talent);
    assert_eq!(updated.genre_list(), vec!["Swing".to_string()]);
}

#[tokio::test]
async fn test_update_with_nothing_submitted_keeps_record() {
    let db = setup_test_db().await;
    let repo = VenueRepository::new(db.clone());
    let created = repo.create(musical_hop()).await.unwrap();

    let updated = repo.update(created.id, VenueFields::default()).await.unwrap();

    assert_eq!(updated, created);
}

#[tokio::test]
async fn test_update_into_duplicate_rolls_back() {
    let db = setup_test_db().await;
    let repo = VenueRepository::new(db.clone());
    repo.create(musical_hop()).await.unwrap();
    let other = repo
        .create(VenueFields {
            name: Some("The Dueling Pianos Bar".to_string()),
            ..musical_hop()
        })
        .await
        .unwrap();

    let result = repo
        .update(
            other.id,
            VenueFields {
                name: Some("The Musical Hop".to_string()),
                phone: Some("914-003-1132".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Database(_))));
    let reloaded = repo.find_by_id(other.id).await.unwrap().unwrap();
    assert_eq!(reloaded, other);
}

#[tokio::test]
async fn test_update_missing_venue_is_not_found() {
    let db = setup_test_db().await;

    let result = VenueRepository::new(db).update(404, musical_hop()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_venue_removes_its_shows() {
    let db = setup_test_db().await;
    let doomed = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    let kept = create_test_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;
    let artist = create_test_artist(&db, "Guns N Petals").await;
    let now = Utc::now();
    create_test_show(&db, artist.id, doomed.id, now - Duration::days(10)).await;
    create_test_show(&db, artist.id, doomed.id, now + Duration::days(10)).await;
    create_test_show(&db, artist.id, kept.id, now + Duration::days(3)).await;

    let deleted = VenueRepository::new(db.clone()).delete(doomed.id).await.unwrap();

    assert_eq!(deleted.id, doomed.id);
    assert!(venue::Entity::find_by_id(doomed.id).one(&db).await.unwrap().is_none());
    let remaining = show::Entity::find().all(&db).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].venue_id, kept.id);
}

#[tokio::test]
async fn test_delete_missing_venue_is_not_found() {
    let db = setup_test_db().await;

    let result = VenueRepository::new(db).delete(7).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_artist_never_removes_shows() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    let booked = create_test_artist(&db, "Guns N Petals").await;
    let idle = create_test_artist(&db, "The Wild Sax Band").await;
    create_test_show(&db, booked.id, venue.id, Utc::now() + Duration::days(1)).await;

    let repo = ArtistRepository::new(db.clone());

    let result = repo.delete(booked.id).await;
    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(show::Entity::find().count(&db).await.unwrap(), 1);
    assert!(repo.find_by_id(booked.id).await.unwrap().is_some());

    repo.delete(idle.id).await.expect("artist without shows can be deleted");
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_artist_name_is_unique() {
    let db = setup_test_db().await;
    let repo = ArtistRepository::new(db.clone());

    repo.create(artist_named("Guns N Petals")).await.unwrap();
    let result = repo.create(artist_named("Guns N Petals")).await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_artist_requires_phone() {
    let db = setup_test_db().await;

    let result = ArtistRepository::new(db.clone())
        .create(ArtistFields {
            phone: None,
            ..artist_named("Matt Quevedo")
        })
        .await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_show_requires_existing_artist_and_venue() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;

    let result = ShowRepository::new(db.clone())
        .create(ShowFields {
            artist_id: Some(99),
            venue_id: Some(venue.id),
            start_time: Some(Utc::now().fixed_offset()),
        })
        .await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(show::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_future_show_is_upcoming_for_venue_and_artist() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&db, "Guns N Petals").await;

    let show = ShowRepository::new(db.clone())
        .create(ShowFields {
            artist_id: Some(artist.id),
            venue_id: Some(venue.id),
            start_time: Some((Utc::now() + Duration::days(30)).fixed_offset()),
        })
        .await
        .unwrap();

    let venue_schedule = VenueRepository::new(db.clone())
        .find_schedule(venue.id)
        .await
        .unwrap()
        .unwrap();
    let artist_schedule = ArtistRepository::new(db.clone())
        .find_schedule(artist.id)
        .await
        .unwrap()
        .unwrap();

    let upcoming: Vec<i32> = venue_schedule.upcoming_shows().iter().map(|s| s.show.id).collect();
    assert_eq!(upcoming, vec![show.id]);
    assert!(venue_schedule.past_shows().is_empty());
    assert_eq!(venue_schedule.shows[0].counterpart.id, artist.id);

    let upcoming: Vec<i32> = artist_schedule.upcoming_shows().iter().map(|s| s.show.id).collect();
    assert_eq!(upcoming, vec![show.id]);
    assert!(artist_schedule.past_shows().is_empty());
    assert_eq!(artist_schedule.shows[0].counterpart.id, venue.id);
}

#[tokio::test]
async fn test_upcoming_plus_past_equals_total_at_fixed_instant() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
    let artist = create_test_artist(&db, "The Wild Sax Band").await;
    let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    for offset in [-400, -3, 2, 90, 365] {
        create_test_show(&db, artist.id, venue.id, now + Duration::days(offset)).await;
    }

    let venues = VenueRepository::new(db).list_all().await.unwrap();
    let listed = &venues[0];

    assert_eq!(listed.num_upcoming_shows_at(now), 3);
    assert_eq!(listed.num_past_shows_at(now), 2);
    assert_eq!(
        listed.num_upcoming_shows_at(now) + listed.num_past_shows_at(now),
        listed.shows.len()
    );
}

#[tokio::test]
async fn test_show_listing_joins_both_sides() {
    let db = setup_test_db().await;
    let venue = create_test_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&db, "Guns N Petals").await;
    let now = Utc::now();
    create_test_show(&db, artist.id, venue.id, now + Duration::days(5)).await;
    create_test_show(&db, artist.id, venue.id, now - Duration::days(5)).await;

    let listings = ShowRepository::new(db).list_all().await.unwrap();

    assert_eq!(listings.len(), 2);
    assert!(listings[0].show.start_time < listings[1].show.start_time);
    assert!(listings
        .iter()
        .all(|l| l.venue.name == "The Musical Hop" && l.artist.name == "Guns N Petals"));
}
