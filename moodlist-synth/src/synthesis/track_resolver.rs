//! Candidate → catalog track resolution

use super::exclusion::ExclusionSet;
use crate::types::{Candidate, CatalogClient, CatalogSession, ResolvedTrack};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct TrackResolver {
    catalog: Arc<dyn CatalogClient>,
}

impl TrackResolver {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Structured catalog search query for a candidate
    pub fn search_query(candidate: &Candidate) -> String {
        format!("track:{} artist:{}", candidate.title, candidate.artist)
    }

    /// Resolve one candidate to its top catalog hit
    ///
    /// Already-excluded candidates are skipped without a catalog call.
    /// Otherwise the candidate is added to `exclusions` whether or not the
    /// search finds anything.
    pub async fn resolve(
        &self,
        candidate: &Candidate,
        exclusions: &mut ExclusionSet,
        session: &CatalogSession,
    ) -> Option<ResolvedTrack> {
        if exclusions.contains(candidate) {
            debug!(key = %candidate.key(), "Skipping excluded candidate");
            return None;
        }

        let query = Self::search_query(candidate);
        let hit = match self.catalog.search_tracks(session, &query, 1).await {
            Ok(tracks) => tracks.first().map(ResolvedTrack::from),
            Err(e) => {
                warn!(query = %query, error = %e, "Track search failed, treating as no match");
                None
            }
        };

        exclusions.insert(candidate);

        match &hit {
            Some(track) => debug!(query = %query, uri = %track.uri, "Resolved candidate"),
            None => debug!(query = %query, "No catalog match"),
        }
        hit
    }
}
