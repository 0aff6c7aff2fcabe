//! `[relay]` section configuration.

use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[relay]` section in feedsync.toml - where articles come from.
///
/// # Example
/// ```toml
/// [relay]
/// url = "wss://relay.example.com"
/// pubkeys = ["b8aafafe72f7cd06ae8c337f93147f65fe2d34c0065b52696123982438cf06fe"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Relay WebSocket address (`ws://` or `wss://`).
    pub url: String,

    /// Hex encoded public keys of the followed authors.
    pub pubkeys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::super::SyncConfig;

    #[test]
    fn test_relay_config() {
        let config: SyncConfig = toml::from_str(
            r#"
            [relay]
            url = "wss://relay.example.com"
            pubkeys = ["abc", "def"]
            "#,
        )
        .unwrap();

        assert_eq!(config.relay.url, "wss://relay.example.com");
        assert_eq!(config.relay.pubkeys, ["abc", "def"]);
    }

    #[test]
    fn test_relay_config_rejects_kind() {
        let result: Result<SyncConfig, _> = toml::from_str(
            r#"
            [relay]
            url = "ws://localhost:7777"
            pubkeys = []
            kind = 1
            "#,
        );

        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn test_relay_config_requires_url() {
        let result: Result<SyncConfig, _> = toml::from_str(
            r#"
            [relay]
            pubkeys = []
            "#,
        );
        assert!(result.is_err());
    }
}
