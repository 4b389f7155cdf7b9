//! Playlist creation for resolved tracks

use crate::error::SynthesisError;
use crate::types::{CatalogClient, CatalogSession, NewPlaylist, PlaylistResult, ResolvedTrack};
use std::sync::Arc;
use tracing::info;

/// Most URIs the catalog accepts per append request
pub const ADD_TRACKS_CHUNK: usize = 100;

const DESCRIPTION_MAX_LEN: usize = 300;

/// Truncate to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect::<String>().trim_end().to_string()
}

pub struct PlaylistMaterializer {
    catalog: Arc<dyn CatalogClient>,
    name_max_len: usize,
}

impl PlaylistMaterializer {
    pub fn new(catalog: Arc<dyn CatalogClient>, name_max_len: usize) -> Self {
        Self {
            catalog,
            name_max_len: name_max_len.max(1),
        }
    }

    /// Playlist name derived from the theme
    pub fn playlist_name(&self, theme: &str) -> String {
        truncate_chars(theme, self.name_max_len)
    }

    /// Create a private playlist and append `tracks` in order
    ///
    /// # Errors
    /// Every catalog failure is a `SynthesisError::MaterializeFailure`.
    pub async fn materialize(
        &self,
        user_id: &str,
        theme: &str,
        tracks: Vec<ResolvedTrack>,
        session: &CatalogSession,
    ) -> Result<PlaylistResult, SynthesisError> {
        let request = NewPlaylist {
            name: self.playlist_name(theme),
            description: truncate_chars(
                &format!("Generated by Moodlist from the theme: {}", theme),
                DESCRIPTION_MAX_LEN,
            ),
            public: false,
        };

        let playlist = self
            .catalog
            .create_playlist(session, user_id, &request)
            .await
            .map_err(SynthesisError::MaterializeFailure)?;

        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
        for chunk in uris.chunks(ADD_TRACKS_CHUNK) {
            self.catalog
                .add_tracks_to_playlist(session, &playlist.id, chunk)
                .await
                .map_err(SynthesisError::MaterializeFailure)?;
        }

        info!(
            playlist_id = %playlist.id,
            playlist_name = %request.name,
            tracks = tracks.len(),
            "Playlist created"
        );

        Ok(PlaylistResult {
            id: playlist.id,
            share_url: playlist.share_url,
            tracks,
            attempts: 0,
        })
    }
}
