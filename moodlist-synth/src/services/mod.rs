//! HTTP adapters for the external collaborators
//!
//! - `model_client`: chat-completions text generation
//! - `catalog_client`: music catalog search, recommendations and playlists

pub mod catalog_client;
pub mod model_client;

pub use catalog_client::SpotifyClient;
pub use model_client::OpenRouterClient;
