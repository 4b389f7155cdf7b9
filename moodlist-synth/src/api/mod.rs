//! HTTP API handlers for moodlist-synth

pub mod health;
pub mod playlists;

pub use health::health_routes;
pub use playlists::playlist_routes;
