//! # Moodlist Common Library
//!
//! Shared code for the Moodlist services:
//! - Error and result types
//! - TOML bootstrap configuration and config file resolution

pub mod config;
pub mod error;

pub use config::TomlConfig;
pub use error::{Error, Result};
