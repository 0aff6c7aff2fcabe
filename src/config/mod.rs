//! Sync configuration management for `feedsync.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                         |
//! |-------------|-------------------------------------------------|
//! | `[relay]`   | Relay address and followed authors              |
//! | `[content]` | Article file folder and naming                  |
//! | `[feed]`    | Atom feed, link prefix, sitemap and anchor list |
//!
//! Relative paths are resolved against the directory holding the config
//! file, and a leading `~` is expanded.
//!
//! # Example
//!
//! ```toml
//! [relay]
//! url = "wss://relay.example.com"
//! pubkeys = ["b8aafafe72f7cd06ae8c337f93147f65fe2d34c0065b52696123982438cf06fe"]
//!
//! [content]
//! dir = "content/posts"
//!
//! [feed]
//! path = "public/atom.xml"
//! title = "My Articles"
//! link_prefix = "https://example.com/posts"
//! sitemap = "public/sitemap.xml"
//! ```

mod content;
pub mod defaults;
mod error;
mod feed;
mod relay;

use content::ContentConfig;
use error::ConfigError;
use feed::FeedConfig;
use relay::RelayConfig;

use crate::{
    cli::{Cli, Commands},
    nostr::{Filter, KIND_LONG_FORM, validate_pubkeys},
};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing feedsync.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Relay and authors
    pub relay: RelayConfig,

    /// Article files
    #[serde(default)]
    pub content: ContentConfig,

    /// Feed and derived outputs
    #[serde(default)]
    pub feed: FeedConfig,
}

impl SyncConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Load, apply CLI overrides, resolve paths and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = Self::from_path(&cli.config)?;
        config.update_with_cli(cli);

        let root = config
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        config.update_path_with_root(&root);

        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Commands::Sync { relay: Some(url) } = &cli.command {
            self.relay.url = url.clone();
        }
    }

    /// Resolve all paths relative to `root`
    fn update_path_with_root(&mut self, root: &Path) {
        self.content.dir = Self::resolve_path(root, &self.content.dir);
        self.feed.path = Self::resolve_path(root, &self.feed.path);
        if let Some(path) = &self.feed.sitemap {
            self.feed.sitemap = Some(Self::resolve_path(root, path));
        }
        if let Some(path) = &self.feed.anchors {
            self.feed.anchors = Some(Self::resolve_path(root, path));
        }
    }

    /// Expand `~` and join relative paths onto `root`
    fn resolve_path(root: &Path, path: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);
        if path.is_relative() {
            root.join(path)
        } else {
            path
        }
    }

    /// Validate configuration before touching the network or the disk
    pub fn validate(&self) -> Result<()> {
        let url = &self.relay.url;
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            bail!(ConfigError::Validation(format!(
                "[relay.url] must start with ws:// or wss://, got `{url}`"
            )));
        }

        validate_pubkeys(&self.relay.pubkeys).map_err(ConfigError::from)?;

        let extension = &self.content.extension;
        if extension.is_empty() || extension.contains(['/', '\\', '.']) {
            bail!(ConfigError::Validation(format!(
                "[content.extension] must be a bare extension like `md`, got `{extension}`"
            )));
        }

        if self.feed.path.as_os_str().is_empty() {
            bail!(ConfigError::Validation("[feed.path] must not be empty".into()));
        }

        Ok(())
    }

    /// Subscription filter for long-form articles by the configured authors
    pub fn filter(&self) -> Filter {
        Filter::new(self.relay.pubkeys.clone(), KIND_LONG_FORM)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nostr::PubkeyError;
    use clap::Parser;
    use tempfile::TempDir;

    const PUBKEY: &str = "b8aafafe72f7cd06ae8c337f93147f65fe2d34c0065b52696123982438cf06fe";

    fn valid_config() -> SyncConfig {
        SyncConfig::from_str(&format!(
            r#"
            [relay]
            url = "wss://relay.example.com"
            pubkeys = ["{PUBKEY}"]
            "#
        ))
        .unwrap()
    }

    fn validation_error(config: &SyncConfig) -> ConfigError {
        config
            .validate()
            .unwrap_err()
            .downcast::<ConfigError>()
            .unwrap()
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_relay_url_scheme() {
        let mut config = valid_config();
        config.relay.url = "https://relay.example.com".into();

        assert!(matches!(validation_error(&config), ConfigError::Validation(_)));
    }

    #[test]
    fn test_validate_pubkeys() {
        let mut config = valid_config();
        config.relay.pubkeys.clear();
        assert!(matches!(
            validation_error(&config),
            ConfigError::Pubkey(PubkeyError::Missing)
        ));

        config.relay.pubkeys = vec!["npub1hz404lnj7lxsdt5vxdlex9rlvhlz6dxqqed4y6tpywvzgwx0qmlqfpl6sm".into()];
        assert!(matches!(
            validation_error(&config),
            ConfigError::Pubkey(PubkeyError::Bech32(_))
        ));
    }

    #[test]
    fn test_validate_extension() {
        let mut config = valid_config();
        for bad in ["", ".md", "a/b"] {
            config.content.extension = bad.into();
            assert!(matches!(validation_error(&config), ConfigError::Validation(_)));
        }
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SyncConfig::from_path(Path::new("/nonexistent/feedsync.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let err = SyncConfig::from_str("[relay\nurl =").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/srv/site");
        assert_eq!(
            SyncConfig::resolve_path(root, Path::new("public/feed.xml")),
            PathBuf::from("/srv/site/public/feed.xml")
        );
        assert_eq!(
            SyncConfig::resolve_path(root, Path::new("/var/feed.xml")),
            PathBuf::from("/var/feed.xml")
        );
    }

    #[test]
    fn test_load_resolves_paths_and_cli_override() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("feedsync.toml");
        fs::write(
            &config_path,
            format!(
                r#"
                [relay]
                url = "wss://relay.example.com"
                pubkeys = ["{PUBKEY}"]

                [content]
                dir = "posts"

                [feed]
                path = "public/atom.xml"
                sitemap = "public/sitemap.xml"
                "#
            ),
        )
        .unwrap();

        let cli = Cli::parse_from([
            "feedsync",
            "-C",
            config_path.to_str().unwrap(),
            "sync",
            "--relay",
            "ws://localhost:7777",
        ]);
        let config = SyncConfig::load(&cli).unwrap();

        assert_eq!(config.relay.url, "ws://localhost:7777");
        assert_eq!(config.content.dir, dir.path().join("posts"));
        assert_eq!(config.feed.path, dir.path().join("public/atom.xml"));
        assert_eq!(config.feed.sitemap, Some(dir.path().join("public/sitemap.xml")));
        assert_eq!(config.feed.anchors, None);
    }

    #[test]
    fn test_filter() {
        let filter = valid_config().filter();
        assert_eq!(filter.authors, [PUBKEY]);
        assert_eq!(filter.kinds, [KIND_LONG_FORM]);
    }
}
