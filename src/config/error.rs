//! Configuration error types.

use crate::nostr::PubkeyError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("[relay.pubkeys] {0}")]
    Pubkey(#[from] PubkeyError),

    #[error("Config validation error: {0}")]
    Validation(String),
}
