//! Form submissions and the allow-listed mapping from form fields onto
//! entity columns.
//!
//! Only the field names listed in each `*Fields::FIELDS` are ever written.
//! Anything else a client submits is ignored (and logged at debug level).

use chrono::{DateTime, NaiveDateTime};
use sea_orm::{prelude::DateTimeWithTimeZone, Set};
use serde::Deserialize;

use crate::{
    db::{
        entities::{artist, show, venue},
        genres,
    },
    error::{AppError, Result},
};

/// Values a checked box is submitted as.
pub const TRUE_TOKENS: [&str; 3] = ["y", "t", "True"];

/// Boolean coercion for the `seeking_*` fields. Exactly the values in
/// [`TRUE_TOKENS`] are true; everything else, including an empty value, is
/// false.
pub fn coerce_boolean(raw: &str) -> bool {
    TRUE_TOKENS.contains(&raw)
}

/// An urlencoded form body, kept as ordered pairs so that repeated fields
/// (`genres=Jazz&genres=Reggae`) survive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl From<Vec<(String, String)>> for FormData {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FormData {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl FormData {
    /// First submitted value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every submitted value for `name`, in submission order.
    pub fn get_all(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    fn owned(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    fn genres(&self) -> Option<Vec<String>> {
        self.contains("genres").then(|| self.get_all("genres"))
    }

    fn log_ignored(&self, entity: &str, allowed: &[&str]) {
        for (name, _) in &self.pairs {
            if !allowed.contains(&name.as_str()) && name != "csrf_token" {
                tracing::debug!("Ignoring unknown {} field {:?}", entity, name);
            }
        }
    }
}

/// Writable venue fields. `None` means "not submitted" and leaves the column
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueFields {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub genres: Option<Vec<String>>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<String>,
}

impl VenueFields {
    pub const FIELDS: &'static [&'static str] = &[
        "name",
        "city",
        "state",
        "address",
        "phone",
        "image_link",
        "facebook_link",
        "website_link",
        "genres",
        "seeking_talent",
        "seeking_description",
    ];

    pub fn from_form(form: &FormData) -> Self {
        form.log_ignored("venue", Self::FIELDS);

        Self {
            name: form.owned("name"),
            city: form.owned("city"),
            state: form.owned("state"),
            address: form.owned("address"),
            phone: form.owned("phone"),
            image_link: form.owned("image_link"),
            facebook_link: form.owned("facebook_link"),
            website_link: form.owned("website_link"),
            genres: form.genres(),
            seeking_talent: form.get("seeking_talent").map(coerce_boolean),
            seeking_description: form.owned("seeking_description"),
        }
    }

    pub fn apply(self, model: &mut venue::ActiveModel) -> Result<()> {
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(city) = self.city {
            model.city = Set(city);
        }
        if let Some(state) = self.state {
            model.state = Set(state);
        }
        if let Some(address) = self.address {
            model.address = Set(address);
        }
        if let Some(phone) = self.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(link) = self.image_link {
            model.image_link = Set(Some(link));
        }
        if let Some(link) = self.facebook_link {
            model.facebook_link = Set(Some(link));
        }
        if let Some(link) = self.website_link {
            model.website_link = Set(Some(link));
        }
        if let Some(list) = self.genres {
            model.genres = Set(genres::encode(&list)?);
        }
        if let Some(seeking) = self.seeking_talent {
            model.seeking_talent = Set(seeking);
        }
        if let Some(description) = self.seeking_description {
            model.seeking_description = Set(Some(description));
        }
        Ok(())
    }
}

/// Writable artist fields, same rules as [`VenueFields`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistFields {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<Vec<String>>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<String>,
}

impl ArtistFields {
    pub const FIELDS: &'static [&'static str] = &[
        "name",
        "city",
        "state",
        "phone",
        "genres",
        "image_link",
        "facebook_link",
        "website_link",
        "seeking_venue",
        "seeking_description",
    ];

    pub fn from_form(form: &FormData) -> Self {
        form.log_ignored("artist", Self::FIELDS);

        Self {
            name: form.owned("name"),
            city: form.owned("city"),
            state: form.owned("state"),
            phone: form.owned("phone"),
            genres: form.genres(),
            image_link: form.owned("image_link"),
            facebook_link: form.owned("facebook_link"),
            website_link: form.owned("website_link"),
            seeking_venue: form.get("seeking_venue").map(coerce_boolean),
            seeking_description: form.owned("seeking_description"),
        }
    }

    pub fn apply(self, model: &mut artist::ActiveModel) -> Result<()> {
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(city) = self.city {
            model.city = Set(city);
        }
        if let Some(state) = self.state {
            model.state = Set(state);
        }
        if let Some(phone) = self.phone {
            model.phone = Set(phone);
        }
        if let Some(list) = self.genres {
            model.genres = Set(genres::encode(&list)?);
        }
        if let Some(link) = self.image_link {
            model.image_link = Set(Some(link));
        }
        if let Some(link) = self.facebook_link {
            model.facebook_link = Set(Some(link));
        }
        if let Some(link) = self.website_link {
            model.website_link = Set(Some(link));
        }
        if let Some(seeking) = self.seeking_venue {
            model.seeking_venue = Set(seeking);
        }
        if let Some(description) = self.seeking_description {
            model.seeking_description = Set(Some(description));
        }
        Ok(())
    }
}

/// Writable show fields. Unlike venues and artists these are typed, so a
/// value that does not parse is rejected before anything reaches storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowFields {
    pub artist_id: Option<i32>,
    pub venue_id: Option<i32>,
    pub start_time: Option<DateTimeWithTimeZone>,
}

impl ShowFields {
    pub const FIELDS: &'static [&'static str] = &["artist_id", "venue_id", "start_time"];

    pub fn from_form(form: &FormData) -> Result<Self> {
        form.log_ignored("show", Self::FIELDS);

        Ok(Self {
            artist_id: form.get("artist_id").map(|v| parse_id("artist_id", v)).transpose()?,
            venue_id: form.get("venue_id").map(|v| parse_id("venue_id", v)).transpose()?,
            start_time: form.get("start_time").map(parse_start_time).transpose()?,
        })
    }

    pub fn apply(self, model: &mut show::ActiveModel) {
        if let Some(id) = self.artist_id {
            model.artist_id = Set(id);
        }
        if let Some(id) = self.venue_id {
            model.venue_id = Set(id);
        }
        if let Some(start) = self.start_time {
            model.start_time = Set(start);
        }
    }
}

fn parse_id(field: &'static str, raw: &str) -> Result<i32> {
    raw.trim().parse().map_err(|_| AppError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// RFC 3339, or a zone-less `YYYY-MM-DD HH:MM[:SS]` read as UTC.
pub fn parse_start_time(raw: &str) -> Result<DateTimeWithTimeZone> {
    let raw_trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw_trimmed) {
        return Ok(parsed);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw_trimmed, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| AppError::InvalidField {
            field: "start_time",
            value: raw.to_string(),
        })
}
