//! In-memory catalog
//!
//! Search hits are keyed by the exact query string. Every call is logged so
//! tests can assert on what the engine asked for.

use async_trait::async_trait;
use moodlist_synth::synthesis::TrackResolver;
use moodlist_synth::types::{
    Candidate, CatalogArtist, CatalogArtistRef, CatalogClient, CatalogError, CatalogPlaylist,
    CatalogSession, CatalogTrack, CatalogUser, NewPlaylist, SeedParams,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

pub const TEST_USER_ID: &str = "test-user";

/// Catalog track with a predictable uri
pub fn track(id: &str) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        name: id.to_string(),
        artists: vec![CatalogArtistRef {
            id: format!("artist-{}", id),
            name: "Artist".to_string(),
        }],
    }
}

/// Search query the resolver issues for a title/artist pair
pub fn query_for(title: &str, artist: &str) -> String {
    TrackResolver::search_query(&Candidate::new(title, artist))
}

/// Playlist created through the fake
#[derive(Debug, Clone)]
pub struct CreatedPlaylist {
    pub user_id: String,
    pub request: NewPlaylist,
    pub uris: Vec<String>,
    pub add_calls: usize,
}

#[derive(Default)]
pub struct FakeCatalog {
    tracks: HashMap<String, Vec<CatalogTrack>>,
    failing_queries: HashSet<String>,
    artists: HashMap<String, Vec<CatalogArtist>>,
    known_artist_ids: HashSet<String>,
    recommendations: Mutex<VecDeque<Result<Vec<CatalogTrack>, CatalogError>>>,
    fail_get_me: bool,
    fail_create: bool,

    track_queries: Mutex<Vec<String>>,
    artist_queries: Mutex<Vec<String>>,
    recommendation_requests: Mutex<Vec<SeedParams>>,
    playlists: Mutex<Vec<CreatedPlaylist>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the resolver's query for `title`/`artist` return track `id`
    pub fn with_song(self, title: &str, artist: &str, id: &str) -> Self {
        self.with_search(&query_for(title, artist), vec![track(id)])
    }

    pub fn with_search(mut self, query: &str, hits: Vec<CatalogTrack>) -> Self {
        self.tracks.insert(query.to_string(), hits);
        self
    }

    pub fn with_failing_search(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_string());
        self
    }

    /// Artist search results for `query`; ids listed in results are
    /// fetchable unless `fetchable` is false
    pub fn with_artists(mut self, query: &str, artists: Vec<CatalogArtist>, fetchable: bool) -> Self {
        if fetchable {
            self.known_artist_ids
                .extend(artists.iter().map(|a| a.id.clone()));
        }
        self.artists.insert(query.to_string(), artists);
        self
    }

    /// Queue one recommendations response; an empty queue returns no tracks
    pub fn with_recommendations(self, result: Result<Vec<CatalogTrack>, CatalogError>) -> Self {
        self.recommendations.lock().unwrap().push_back(result);
        self
    }

    pub fn failing_get_me(mut self) -> Self {
        self.fail_get_me = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn track_queries(&self) -> Vec<String> {
        self.track_queries.lock().unwrap().clone()
    }

    pub fn query_count(&self, query: &str) -> usize {
        self.track_queries
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.as_str() == query)
            .count()
    }

    pub fn artist_queries(&self) -> Vec<String> {
        self.artist_queries.lock().unwrap().clone()
    }

    pub fn recommendation_requests(&self) -> Vec<SeedParams> {
        self.recommendation_requests.lock().unwrap().clone()
    }

    pub fn playlists(&self) -> Vec<CreatedPlaylist> {
        self.playlists.lock().unwrap().clone()
    }

    /// Total catalog calls of any kind
    pub fn total_calls(&self) -> usize {
        self.track_queries.lock().unwrap().len()
            + self.artist_queries.lock().unwrap().len()
            + self.recommendation_requests.lock().unwrap().len()
            + self.playlists.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search_tracks(
        &self,
        _session: &CatalogSession,
        query: &str,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.track_queries.lock().unwrap().push(query.to_string());
        if self.failing_queries.contains(query) {
            return Err(CatalogError::Network("connection reset".to_string()));
        }
        Ok(self
            .tracks
            .get(query)
            .map(|hits| hits.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn search_artists(
        &self,
        _session: &CatalogSession,
        query: &str,
        limit: u32,
    ) -> Result<Vec<CatalogArtist>, CatalogError> {
        self.artist_queries.lock().unwrap().push(query.to_string());
        Ok(self
            .artists
            .get(query)
            .map(|hits| hits.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_artist(
        &self,
        _session: &CatalogSession,
        artist_id: &str,
    ) -> Result<CatalogArtist, CatalogError> {
        if !self.known_artist_ids.contains(artist_id) {
            return Err(CatalogError::NotFound(format!("/artists/{}", artist_id)));
        }
        self.artists
            .values()
            .flatten()
            .find(|a| a.id == artist_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("/artists/{}", artist_id)))
    }

    async fn get_recommendations(
        &self,
        _session: &CatalogSession,
        seeds: &SeedParams,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.recommendation_requests.lock().unwrap().push(seeds.clone());
        let next = self.recommendations.lock().unwrap().pop_front();
        match next {
            Some(Ok(tracks)) => Ok(tracks.into_iter().take(limit as usize).collect()),
            Some(Err(e)) => Err(e),
            None => Ok(Vec::new()),
        }
    }

    async fn get_me(&self, _session: &CatalogSession) -> Result<CatalogUser, CatalogError> {
        if self.fail_get_me {
            return Err(CatalogError::Unauthorized);
        }
        Ok(CatalogUser {
            id: TEST_USER_ID.to_string(),
            display_name: Some("Test User".to_string()),
        })
    }

    async fn create_playlist(
        &self,
        _session: &CatalogSession,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<CatalogPlaylist, CatalogError> {
        if self.fail_create {
            return Err(CatalogError::Api(403, "Insufficient client scope".to_string()));
        }
        let mut playlists = self.playlists.lock().unwrap();
        let id = format!("playlist-{}", playlists.len() + 1);
        playlists.push(CreatedPlaylist {
            user_id: user_id.to_string(),
            request: playlist.clone(),
            uris: Vec::new(),
            add_calls: 0,
        });
        Ok(CatalogPlaylist {
            share_url: format!("https://open.spotify.com/playlist/{}", id),
            id,
        })
    }

    async fn add_tracks_to_playlist(
        &self,
        _session: &CatalogSession,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), CatalogError> {
        let mut playlists = self.playlists.lock().unwrap();
        let index = playlist_id
            .strip_prefix("playlist-")
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| CatalogError::NotFound(playlist_id.to_string()))?;
        let playlist = playlists
            .get_mut(index)
            .ok_or_else(|| CatalogError::NotFound(playlist_id.to_string()))?;
        playlist.uris.extend_from_slice(uris);
        playlist.add_calls += 1;
        Ok(())
    }
}
