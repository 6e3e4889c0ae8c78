//! Upcoming and past shows, derived at read time.
//!
//! A show is upcoming when it starts strictly after `now` and past when it
//! started strictly before. A show starting exactly at `now` is neither.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::entities::{artist, show, venue};

/// Anything that has a scheduled start.
pub trait StartsAt {
    fn start_time(&self) -> DateTime<Utc>;
}

impl StartsAt for show::Model {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time.with_timezone(&Utc)
    }
}

/// A show joined with the record on the other side of the booking: the artist
/// when listing a venue's shows, the venue when listing an artist's.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShowWith<T> {
    pub show: show::Model,
    pub counterpart: T,
}

impl<T> StartsAt for ShowWith<T> {
    fn start_time(&self) -> DateTime<Utc> {
        self.show.start_time()
    }
}

/// A venue or artist together with its shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WithShows<T, S = show::Model> {
    pub record: T,
    pub shows: Vec<S>,
}

pub type VenueWithShows = WithShows<venue::Model>;
pub type ArtistWithShows = WithShows<artist::Model>;
pub type VenueSchedule = WithShows<venue::Model, ShowWith<artist::Model>>;
pub type ArtistSchedule = WithShows<artist::Model, ShowWith<venue::Model>>;

impl<T, S: StartsAt> WithShows<T, S> {
    pub fn new(record: T, shows: Vec<S>) -> Self {
        Self { record, shows }
    }

    pub fn upcoming_shows_at(&self, now: DateTime<Utc>) -> Vec<&S> {
        self.shows.iter().filter(|s| s.start_time() > now).collect()
    }

    pub fn past_shows_at(&self, now: DateTime<Utc>) -> Vec<&S> {
        self.shows.iter().filter(|s| s.start_time() < now).collect()
    }

    pub fn num_upcoming_shows_at(&self, now: DateTime<Utc>) -> usize {
        self.upcoming_shows_at(now).len()
    }

    pub fn num_past_shows_at(&self, now: DateTime<Utc>) -> usize {
        self.past_shows_at(now).len()
    }

    pub fn upcoming_shows(&self) -> Vec<&S> {
        self.upcoming_shows_at(Utc::now())
    }

    pub fn past_shows(&self) -> Vec<&S> {
        self.past_shows_at(Utc::now())
    }

    pub fn num_upcoming_shows(&self) -> usize {
        self.num_upcoming_shows_at(Utc::now())
    }

    pub fn num_past_shows(&self) -> usize {
        self.num_past_shows_at(Utc::now())
    }
}
