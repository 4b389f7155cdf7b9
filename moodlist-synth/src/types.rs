//! Core Types and Trait Definitions for moodlist-synth
//!
//! Defines the data model shared by the synthesis engine and the two
//! external collaborator traits it drives:
//! - **ModelClient:** prompt text in, free-form text out
//! - **CatalogClient:** search, recommendations, playlist mutation
//!
//! Both traits are implemented over HTTP in [`crate::services`] and by
//! scripted fakes in the integration tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest playlist a single synthesis call may request
///
/// Matches the catalog's per-request limit for recommendations and
/// playlist appends.
pub const MAX_TARGET_SIZE: usize = 100;

// ============================================================================
// Synthesis Data Model
// ============================================================================

/// Immutable input to one synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRequest {
    theme: String,
    target_size: usize,
}

impl ThemeRequest {
    /// Create a request, rejecting an empty theme or zero target size
    ///
    /// Target sizes above [`MAX_TARGET_SIZE`] are capped.
    pub fn new(theme: impl Into<String>, target_size: usize) -> Result<Self, RequestError> {
        let theme = theme.into().trim().to_string();
        if theme.is_empty() {
            return Err(RequestError::EmptyTheme);
        }
        if target_size == 0 {
            return Err(RequestError::ZeroTargetSize);
        }
        Ok(Self {
            theme,
            target_size: target_size.min(MAX_TARGET_SIZE),
        })
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }
}

/// Invalid synthesis input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("theme must not be empty")]
    EmptyTheme,

    #[error("target size must be at least 1")]
    ZeroTargetSize,
}

/// Unresolved (title, artist) pair extracted from model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub artist: String,
}

impl Candidate {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Human-readable `"Title - Artist"` form used in prompts
    pub fn display_key(&self) -> String {
        format!("{} - {}", self.title.trim(), self.artist.trim())
    }

    /// Normalized `"title - artist"` key used for exclusion membership
    ///
    /// Trimmed, inner whitespace collapsed, lowercased.
    pub fn key(&self) -> String {
        self.display_key()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Candidate matched to a concrete catalog track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTrack {
    pub catalog_id: String,
    pub uri: String,
}

impl From<&CatalogTrack> for ResolvedTrack {
    fn from(track: &CatalogTrack) -> Self {
        Self {
            catalog_id: track.id.clone(),
            uri: track.uri.clone(),
        }
    }
}

/// Structured entities extracted from a free-text sentence
///
/// Any field may be empty. Missing JSON keys deserialize as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub songs: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.songs.is_empty() && self.keywords.is_empty()
    }
}

/// Catalog-validated recommendation seeds
///
/// Holds every validated seed. The recommendation engine truncates to the
/// catalog seed budget when it builds a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seeds {
    pub artist_ids: Vec<String>,
    pub track_ids: Vec<String>,
    pub genres: Vec<String>,
}

impl Seeds {
    pub fn is_empty(&self) -> bool {
        self.artist_ids.is_empty() && self.track_ids.is_empty() && self.genres.is_empty()
    }
}

/// Seed parameters of one recommendation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedParams {
    pub artist_ids: Vec<String>,
    pub track_ids: Vec<String>,
    pub genres: Vec<String>,
}

impl SeedParams {
    /// Total seeds across all categories
    pub fn total(&self) -> usize {
        self.artist_ids.len() + self.track_ids.len() + self.genres.len()
    }

    pub fn only_genre(genre: impl Into<String>) -> Self {
        Self {
            genres: vec![genre.into()],
            ..Default::default()
        }
    }
}

/// Terminal result of a successful synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistResult {
    pub id: String,
    pub share_url: String,
    pub tracks: Vec<ResolvedTrack>,
    /// Generation attempts used (0 for the recommendation path)
    pub attempts: u32,
}

// ============================================================================
// Catalog Collaborator
// ============================================================================

/// Bearer credential for catalog calls
///
/// Issued and refreshed by the login flow. Every catalog call receives the
/// session explicitly so a refreshed token takes effect on the next call.
#[derive(Clone)]
pub struct CatalogSession {
    access_token: String,
}

impl CatalogSession {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for CatalogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSession")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Artist reference embedded in a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogArtistRef {
    pub id: String,
    pub name: String,
}

/// Catalog track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtistRef>,
}

/// Catalog artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Current catalog user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Playlist creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub public: bool,
}

/// Playlist as created by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPlaylist {
    pub id: String,
    pub share_url: String,
}

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Access token rejected")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Music catalog operations used by the synthesis engine
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search tracks, best match first
    async fn search_tracks(
        &self,
        session: &CatalogSession,
        query: &str,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError>;

    /// Search artists, best match first
    async fn search_artists(
        &self,
        session: &CatalogSession,
        query: &str,
        limit: u32,
    ) -> Result<Vec<CatalogArtist>, CatalogError>;

    /// Fetch one artist by id
    async fn get_artist(
        &self,
        session: &CatalogSession,
        artist_id: &str,
    ) -> Result<CatalogArtist, CatalogError>;

    /// Request recommendations for a seed set
    async fn get_recommendations(
        &self,
        session: &CatalogSession,
        seeds: &SeedParams,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError>;

    /// Profile of the session's user
    async fn get_me(&self, session: &CatalogSession) -> Result<CatalogUser, CatalogError>;

    async fn create_playlist(
        &self,
        session: &CatalogSession,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<CatalogPlaylist, CatalogError>;

    /// Append tracks in order
    async fn add_tracks_to_playlist(
        &self,
        session: &CatalogSession,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), CatalogError>;
}

// ============================================================================
// Model Collaborator
// ============================================================================

/// Model client errors
///
/// Every variant is a transport failure from the engine's point of view.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Response has no message")]
    MissingMessage,

    #[error("Response content is empty")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Generative text model
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one prompt and return the model's text
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}
