//! Music catalog API client
//!
//! Spotify Web API adapter for [`CatalogClient`]. The bearer token comes
//! from the caller's [`CatalogSession`] on every request, so token refresh
//! stays with the login flow.
//!
//! # Rate Limiting
//! A minimum interval between requests is enforced across all callers of
//! one client. HTTP 429 surfaces as `CatalogError::RateLimited`.

use crate::types::{
    CatalogArtist, CatalogClient, CatalogError, CatalogPlaylist, CatalogSession, CatalogTrack,
    CatalogUser, NewPlaylist, SeedParams,
};
use async_trait::async_trait;
use moodlist_common::config::CatalogConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Rate limiter enforcing a minimum request interval
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Paged result list; the API occasionally returns `null` items
#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<Option<T>>,
}

impl<T> Paging<T> {
    fn into_items(self) -> Vec<T> {
        self.items.into_iter().flatten().collect()
    }
}

#[derive(Debug, Deserialize)]
struct TrackSearchResponse {
    tracks: Paging<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
struct ArtistSearchResponse {
    artists: Paging<CatalogArtist>,
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    id: String,
    external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Serialize)]
struct AddTracksRequest<'a> {
    uris: &'a [String],
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl SpotifyClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::new(config.min_request_interval_ms)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send an authorized request and map error statuses
    async fn send(
        &self,
        session: &CatalogSession,
        request: RequestBuilder,
        path: &str,
    ) -> Result<Response, CatalogError> {
        self.rate_limiter.wait().await;

        tracing::debug!(path = %path, "Catalog request");

        let response = request
            .bearer_auth(session.access_token())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout
                } else {
                    CatalogError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => Err(CatalogError::Unauthorized),
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(path.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(CatalogError::RateLimited),
            s if !s.is_success() => {
                let error_text = response.text().await.unwrap_or_default();
                Err(CatalogError::Api(s.as_u16(), error_text))
            }
            _ => Ok(response),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &CatalogSession,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let request = self.http_client.get(self.url(path)).query(query);
        self.send(session, request, path)
            .await?
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Build the recommendation query; empty seed categories are omitted
    fn recommendation_query(seeds: &SeedParams, limit: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", limit.to_string())];
        if !seeds.artist_ids.is_empty() {
            query.push(("seed_artists", seeds.artist_ids.join(",")));
        }
        if !seeds.track_ids.is_empty() {
            query.push(("seed_tracks", seeds.track_ids.join(",")));
        }
        if !seeds.genres.is_empty() {
            query.push(("seed_genres", seeds.genres.join(",")));
        }
        query
    }
}

#[async_trait]
impl CatalogClient for SpotifyClient {
    async fn search_tracks(
        &self,
        session: &CatalogSession,
        query: &str,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        let params = [
            ("q", query.to_string()),
            ("type", "track".to_string()),
            ("limit", limit.to_string()),
        ];
        let response: TrackSearchResponse = self.get_json(session, "/search", &params).await?;
        Ok(response.tracks.into_items())
    }

    async fn search_artists(
        &self,
        session: &CatalogSession,
        query: &str,
        limit: u32,
    ) -> Result<Vec<CatalogArtist>, CatalogError> {
        let params = [
            ("q", query.to_string()),
            ("type", "artist".to_string()),
            ("limit", limit.to_string()),
        ];
        let response: ArtistSearchResponse = self.get_json(session, "/search", &params).await?;
        Ok(response.artists.into_items())
    }

    async fn get_artist(
        &self,
        session: &CatalogSession,
        artist_id: &str,
    ) -> Result<CatalogArtist, CatalogError> {
        self.get_json(session, &format!("/artists/{}", artist_id), &[])
            .await
    }

    async fn get_recommendations(
        &self,
        session: &CatalogSession,
        seeds: &SeedParams,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        let query = Self::recommendation_query(seeds, limit);
        let response: RecommendationsResponse =
            self.get_json(session, "/recommendations", &query).await?;
        Ok(response.tracks)
    }

    async fn get_me(&self, session: &CatalogSession) -> Result<CatalogUser, CatalogError> {
        self.get_json(session, "/me", &[]).await
    }

    async fn create_playlist(
        &self,
        session: &CatalogSession,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<CatalogPlaylist, CatalogError> {
        let path = format!("/users/{}/playlists", user_id);
        let request = self.http_client.post(self.url(&path)).json(playlist);
        let created: PlaylistResponse = self
            .send(session, request, &path)
            .await?
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        let share_url = created
            .external_urls
            .and_then(|urls| urls.spotify)
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", created.id));

        Ok(CatalogPlaylist {
            id: created.id,
            share_url,
        })
    }

    async fn add_tracks_to_playlist(
        &self,
        session: &CatalogSession,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), CatalogError> {
        let path = format!("/playlists/{}/tracks", playlist_id);
        let request = self
            .http_client
            .post(self.url(&path))
            .json(&AddTracksRequest { uris });
        self.send(session, request, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(1000);
        assert_eq!(limiter.min_interval, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_rate_limiter_timing() {
        let limiter = RateLimiter::new(200);

        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::new(0);

        let start = Instant::now();
        for _ in 0..5 {
            limiter.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_recommendation_query_omits_empty_categories() {
        let seeds = SeedParams {
            artist_ids: vec![],
            track_ids: vec!["t1".into(), "t2".into()],
            genres: vec!["jazz".into()],
        };
        let query = SpotifyClient::recommendation_query(&seeds, 10);
        assert_eq!(
            query,
            vec![
                ("limit", "10".to_string()),
                ("seed_tracks", "t1,t2".to_string()),
                ("seed_genres", "jazz".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_response_skips_null_items() {
        let body = r#"{"tracks":{"items":[null,{"id":"1","uri":"spotify:track:1","name":"Song","artists":[{"id":"a","name":"Artist"}]}]}}"#;
        let response: TrackSearchResponse = serde_json::from_str(body).unwrap();
        let items = response.tracks.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].uri, "spotify:track:1");
    }

    #[test]
    fn test_client_creation_trims_base_url() {
        let config = CatalogConfig {
            api_url: "http://localhost:9000/v1/".to_string(),
            ..Default::default()
        };
        let client = SpotifyClient::new(&config).unwrap();
        assert_eq!(client.url("/me"), "http://localhost:9000/v1/me");
    }
}
