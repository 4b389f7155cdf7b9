//! Catalog validation of extracted entities
//!
//! Converts model-extracted names into seeds the catalog is known to accept.
//! Lookup failures drop the entity; they never fail validation.

use crate::types::{CatalogClient, CatalogSession, Entities, Seeds};
use std::sync::Arc;
use tracing::{debug, warn};

/// Catalog genre tokens accepted as recommendation seeds
pub const GENRE_ALLOW_LIST: &[&str] = &[
    "acoustic",
    "alternative",
    "ambient",
    "blues",
    "chill",
    "classical",
    "country",
    "dance",
    "disco",
    "drum-and-bass",
    "dubstep",
    "edm",
    "electronic",
    "folk",
    "funk",
    "gospel",
    "hard-rock",
    "hip-hop",
    "house",
    "indie",
    "jazz",
    "k-pop",
    "latin",
    "metal",
    "piano",
    "pop",
    "punk",
    "r-n-b",
    "reggae",
    "rock",
    "sleep",
    "soul",
    "study",
    "techno",
];

const ARTIST_SEARCH_LIMIT: u32 = 5;

/// Map a keyword onto the allow-list, if it names a known genre
///
/// Case-insensitive; inner whitespace is read as a hyphen.
pub fn allowed_genre(keyword: &str) -> Option<&'static str> {
    let normalized = keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    GENRE_ALLOW_LIST
        .iter()
        .copied()
        .find(|genre| *genre == normalized)
}

pub struct SeedValidator {
    catalog: Arc<dyn CatalogClient>,
}

impl SeedValidator {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Validate entities against the catalog
    pub async fn validate(&self, entities: &Entities, session: &CatalogSession) -> Seeds {
        let mut seeds = Seeds::default();

        for name in &entities.artists {
            if let Some(id) = self.validate_artist(name, session).await {
                if !seeds.artist_ids.contains(&id) {
                    seeds.artist_ids.push(id);
                }
            }
        }

        for song in &entities.songs {
            if let Some(id) = self.validate_song(song, session).await {
                if !seeds.track_ids.contains(&id) {
                    seeds.track_ids.push(id);
                }
            }
        }

        for keyword in &entities.keywords {
            if let Some(genre) = allowed_genre(keyword) {
                if !seeds.genres.iter().any(|g| g == genre) {
                    seeds.genres.push(genre.to_string());
                }
            }
        }

        debug!(
            artists = seeds.artist_ids.len(),
            tracks = seeds.track_ids.len(),
            genres = seeds.genres.len(),
            "Validated recommendation seeds"
        );
        seeds
    }

    /// Exact-name artist match, confirmed by fetching the artist by id
    async fn validate_artist(&self, name: &str, session: &CatalogSession) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let artists = match self
            .catalog
            .search_artists(session, name, ARTIST_SEARCH_LIMIT)
            .await
        {
            Ok(artists) => artists,
            Err(e) => {
                warn!(artist = %name, error = %e, "Artist search failed");
                return None;
            }
        };

        let matched = artists
            .into_iter()
            .find(|artist| artist.name.to_lowercase() == name.to_lowercase())?;

        match self.catalog.get_artist(session, &matched.id).await {
            Ok(artist) => Some(artist.id),
            Err(e) => {
                warn!(artist = %name, id = %matched.id, error = %e, "Artist id did not resolve");
                None
            }
        }
    }

    async fn validate_song(&self, song: &str, session: &CatalogSession) -> Option<String> {
        let song = song.trim();
        if song.is_empty() {
            return None;
        }

        match self.catalog.search_tracks(session, song, 1).await {
            Ok(tracks) => tracks.into_iter().next().map(|t| t.id),
            Err(e) => {
                warn!(song = %song, error = %e, "Track search failed");
                None
            }
        }
    }
}
