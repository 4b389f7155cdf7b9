//! Seed-based catalog recommendations
//!
//! # Seed Budget
//! The catalog accepts at most 5 seeds per request. Requests built here use
//! at most 1 artist, 2 tracks and 1 genre; extra seeds are dropped.
//!
//! # Fallback
//! - No seeds at all: one random fallback genre is the sole seed.
//! - Zero tracks returned: one retry with a fresh random fallback genre only.
//! - Transport failure: empty result, no retry.

use crate::types::{
    CatalogClient, CatalogError, CatalogSession, CatalogTrack, SeedParams, Seeds, MAX_TARGET_SIZE,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub const MAX_ARTIST_SEEDS: usize = 1;
pub const MAX_TRACK_SEEDS: usize = 2;
pub const MAX_GENRE_SEEDS: usize = 1;

/// Genres used when no validated seed is available
pub const FALLBACK_GENRES: &[&str] = &["pop", "rock", "hip-hop", "indie", "electronic"];

/// Truncate validated seeds to the per-request budget
pub fn bounded_seeds(seeds: &Seeds) -> SeedParams {
    SeedParams {
        artist_ids: seeds.artist_ids.iter().take(MAX_ARTIST_SEEDS).cloned().collect(),
        track_ids: seeds.track_ids.iter().take(MAX_TRACK_SEEDS).cloned().collect(),
        genres: seeds.genres.iter().take(MAX_GENRE_SEEDS).cloned().collect(),
    }
}

pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogClient>,
    rng: Mutex<StdRng>,
}

impl RecommendationEngine {
    /// Create an engine with an explicit random source
    pub fn new(catalog: Arc<dyn CatalogClient>, rng: StdRng) -> Self {
        Self {
            catalog,
            rng: Mutex::new(rng),
        }
    }

    /// Fixed seed when given, OS entropy otherwise
    pub fn with_seed(catalog: Arc<dyn CatalogClient>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(catalog, rng)
    }

    /// Pick one fallback genre uniformly at random
    pub fn random_fallback_genre(&self) -> &'static str {
        // A poisoned lock still holds a usable RNG
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        FALLBACK_GENRES.choose(&mut *rng).copied().unwrap_or("pop")
    }

    /// Request recommendations for `seeds`, never failing
    pub async fn recommend(
        &self,
        seeds: &Seeds,
        target_size: usize,
        session: &CatalogSession,
    ) -> Vec<CatalogTrack> {
        let limit = target_size.clamp(1, MAX_TARGET_SIZE) as u32;

        let params = if seeds.is_empty() {
            let genre = self.random_fallback_genre();
            info!(genre, "No recommendation seeds, using fallback genre");
            SeedParams::only_genre(genre)
        } else {
            bounded_seeds(seeds)
        };

        match self.request(&params, limit, session).await {
            Ok(tracks) if !tracks.is_empty() => return tracks,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Recommendation request failed");
                return Vec::new();
            }
        }

        let genre = self.random_fallback_genre();
        info!(genre, "Recommendations came back empty, retrying with fallback genre");
        self.request(&SeedParams::only_genre(genre), limit, session)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Fallback recommendation request failed");
                Vec::new()
            })
    }

    async fn request(
        &self,
        params: &SeedParams,
        limit: u32,
        session: &CatalogSession,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        debug!(
            artists = ?params.artist_ids,
            tracks = ?params.track_ids,
            genres = ?params.genres,
            limit,
            "Requesting recommendations"
        );
        self.catalog.get_recommendations(session, params, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_bounded_seeds_truncates() {
        let seeds = Seeds {
            artist_ids: ids("a", 3),
            track_ids: ids("t", 4),
            genres: vec!["jazz".into(), "soul".into()],
        };
        let params = bounded_seeds(&seeds);
        assert_eq!(params.artist_ids, vec!["a0"]);
        assert_eq!(params.track_ids, vec!["t0", "t1"]);
        assert_eq!(params.genres, vec!["jazz"]);
        assert!(params.total() <= 5);
    }

    #[test]
    fn test_bounded_seeds_keeps_empty_categories_empty() {
        let seeds = Seeds {
            track_ids: ids("t", 1),
            ..Default::default()
        };
        let params = bounded_seeds(&seeds);
        assert_eq!(params.total(), 1);
        assert!(params.artist_ids.is_empty());
        assert!(params.genres.is_empty());
    }
}
