//! Nostr events and subscription filters.
//!
//! Only the parts of NIP-01 needed to read long-form articles are modeled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Long-form content (NIP-23).
pub const KIND_LONG_FORM: u16 = 30023;

/// Tag carrying the stable article identifier.
pub const TAG_IDENTIFIER: &str = "d";
pub const TAG_TITLE: &str = "title";
pub const TAG_SUMMARY: &str = "summary";
pub const TAG_PUBLISHED_AT: &str = "published_at";

/// A signed event as delivered by a relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub pubkey: String,
    pub created_at: i64,
    pub kind: u16,
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sig: String,
}

impl Event {
    /// Value of the first tag named `name`, trimmed.
    ///
    /// Returns `None` when no tag matches, the tag has no value, or the value
    /// is blank.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        let tag = self.tags.iter().find(|tag| tag.first().is_some_and(|n| n == name))?;
        let value = tag.get(1)?.trim();
        (!value.is_empty()).then_some(value)
    }

    /// Tag value interpreted as Unix seconds. Malformed values count as absent.
    pub fn tag_time(&self, name: &str) -> Option<DateTime<Utc>> {
        let secs = self.tag_value(name)?.parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// `created_at` as a timestamp, `None` if out of range.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    /// Event id recomputed from the NIP-01 canonical serialization.
    pub fn compute_id(&self) -> String {
        let canonical = serde_json::json!([
            0,
            self.pubkey,
            self.created_at,
            self.kind,
            self.tags,
            self.content
        ]);
        hex::encode(Sha256::digest(canonical.to_string().as_bytes()))
    }

    /// Whether the declared id matches the content it claims to identify.
    pub fn has_valid_id(&self) -> bool {
        self.id == self.compute_id()
    }
}

/// Subscription filter sent with `REQ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub authors: Vec<String>,
    pub kinds: Vec<u16>,
}

impl Filter {
    pub fn new(authors: Vec<String>, kind: u16) -> Self {
        Self {
            authors,
            kinds: vec![kind],
        }
    }

    /// Relays are not trusted to apply the filter; events are re-checked.
    pub fn matches(&self, event: &Event) -> bool {
        (self.authors.is_empty() || self.authors.iter().any(|a| *a == event.pubkey))
            && (self.kinds.is_empty() || self.kinds.contains(&event.kind))
    }
}
