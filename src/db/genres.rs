//! Genres are stored as a JSON array in a text column so the schema stays the
//! same on PostgreSQL and SQLite.

pub fn encode(genres: &[String]) -> serde_json::Result<String> {
    serde_json::to_string(genres)
}

/// Malformed or empty columns decode to no genres.
pub fn decode(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed genres column {:?}: {}", raw, e);
        Vec::new()
    })
}
