//! Author public key validation.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static RE_PUBKEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-f0-9]{64}$").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PubkeyError {
    #[error("no pubkey configured")]
    Missing,

    #[error("bech32 encoded pubkeys are not supported: {0}")]
    Bech32(String),

    #[error("invalid pubkey: {0}")]
    Invalid(String),
}

/// Check that every key is a 64 character lowercase hex string.
pub fn validate_pubkeys<S: AsRef<str>>(pubkeys: &[S]) -> Result<(), PubkeyError> {
    if pubkeys.is_empty() {
        return Err(PubkeyError::Missing);
    }
    for pubkey in pubkeys {
        let pubkey: &str = pubkey.as_ref();
        if pubkey.starts_with("npub") {
            return Err(PubkeyError::Bech32(pubkey.to_string()));
        }
        if !RE_PUBKEY.is_match(pubkey) {
            return Err(PubkeyError::Invalid(pubkey.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "b8aafafe72f7cd06ae8c337f93147f65fe2d34c0065b52696123982438cf06fe";
    const NPUB: &str = "npub1hz404lnj7lxsdt5vxdlex9rlvhlz6dxqqed4y6tpywvzgwx0qmlqfpl6sm";

    #[test]
    fn test_valid_hex() {
        assert_eq!(validate_pubkeys(&[HEX, HEX]), Ok(()));
    }

    #[test]
    fn test_npub_rejected() {
        assert_eq!(
            validate_pubkeys(&[HEX, NPUB]),
            Err(PubkeyError::Bech32(NPUB.to_string()))
        );
    }

    #[test]
    fn test_empty_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(validate_pubkeys(&empty), Err(PubkeyError::Missing));
    }

    #[test]
    fn test_malformed_rejected() {
        let upper = HEX.to_uppercase();
        let short = &HEX[..63];
        let long = format!("{HEX}0");

        for key in [upper.as_str(), short, long.as_str(), ""] {
            assert!(matches!(
                validate_pubkeys(&[key]),
                Err(PubkeyError::Invalid(_))
            ));
        }
    }
}
