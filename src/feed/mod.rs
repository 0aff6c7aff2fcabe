//! Article index backed by an Atom feed file.
//!
//! The feed file is both the published artifact and the state carried between
//! runs: it is loaded at startup, updated in memory one event at a time and
//! rewritten after every effective change, together with the optional sitemap
//! and anchor list derived from it.
//!
//! # Update rule
//!
//! Entries are keyed by their link. An incoming revision replaces the stored
//! one only when its timestamp is strictly newer, so redelivered or out of
//! order revisions never overwrite newer content.
//!
//! ```text
//! upsert(link, t) ──► no entry ─────────────► append       (changed)
//!                     entry, t >  updated ──► overwrite    (changed)
//!                     entry, t <= updated ──► keep as is   (unchanged)
//! ```

mod anchors;
mod atom;
mod sitemap;

use crate::{log, utils::fs::write_atomic};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Declaration line preceding the feed and sitemap documents.
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("malformed feed XML")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed feed document")]
    De(#[from] quick_xml::DeError),

    #[error("expected a <feed> root element, found {0}")]
    UnexpectedRoot(String),

    #[error("duplicate entry for link `{0}`")]
    DuplicateLocator(String),

    #[error("invalid timestamp `{0}`")]
    Timestamp(String, #[source] chrono::ParseError),
}

/// One article as recorded in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Public link, unique within the feed
    pub locator: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub published: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// In-memory article index bound to its output files.
#[derive(Debug, Clone)]
pub struct Feed {
    path: PathBuf,
    sitemap: Option<PathBuf>,
    anchors: Option<PathBuf>,
    id: String,
    title: String,
    updated: Option<DateTime<Utc>>,
    entries: Vec<Entry>,
}

impl Feed {
    /// Empty feed persisted to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sitemap: None,
            anchors: None,
            id: String::new(),
            title: String::new(),
            updated: None,
            entries: Vec::new(),
        }
    }

    /// Load the feed stored at `path`, or start an empty one if there is none.
    ///
    /// Non-empty `id` and `title` replace the stored values.
    pub fn load(path: impl Into<PathBuf>, id: &str, title: &str) -> Result<Self, FeedError> {
        let path = path.into();
        let mut feed = match fs::read_to_string(&path) {
            Ok(xml) => {
                let feed = Self::parse(&xml, path)?;
                log!("feed"; "loaded {} ({} entries)", feed.path.display(), feed.len());
                feed
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log!("feed"; "initialized {}", path.display());
                Self::new(path)
            }
            Err(err) => return Err(FeedError::Io(path, err)),
        };

        if !id.is_empty() {
            feed.id = id.to_string();
        }
        if !title.is_empty() {
            feed.title = title.to_string();
        }
        Ok(feed)
    }

    /// Also write a sitemap on [`Feed::persist`].
    pub fn with_sitemap(mut self, path: impl Into<PathBuf>) -> Self {
        self.sitemap = Some(path.into());
        self
    }

    /// Also write an anchor list on [`Feed::persist`].
    pub fn with_anchors(mut self, path: impl Into<PathBuf>) -> Self {
        self.anchors = Some(path.into());
        self
    }

    /// Insert a new entry or update an existing one if `updated` is newer.
    ///
    /// Returns whether the feed changed. An equal or older `updated` leaves the
    /// entry untouched even when title or summary differ. `published`
    /// only applies to new entries, defaults to `updated` and never exceeds it.
    pub fn upsert(
        &mut self,
        locator: &str,
        title: Option<&str>,
        summary: Option<&str>,
        updated: DateTime<Utc>,
        published: Option<DateTime<Utc>>,
    ) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.locator == locator) {
            if updated <= entry.updated {
                return false;
            }
            entry.title = title.map(str::to_owned);
            entry.summary = summary.map(str::to_owned);
            entry.updated = updated;
        } else {
            self.entries.push(Entry {
                locator: locator.to_string(),
                title: title.map(str::to_owned),
                summary: summary.map(str::to_owned),
                published: published.unwrap_or(updated).min(updated),
                updated,
            });
        }

        self.updated = self.updated.max(Some(updated));
        true
    }

    /// Write the feed and every configured derived file.
    ///
    /// Each file is replaced atomically, but the set is not: if a later write
    /// fails the earlier files are already updated.
    pub fn persist(&self) -> Result<()> {
        write_atomic(&self.path, self.render_atom())?;
        if let Some(path) = &self.sitemap {
            write_atomic(path, self.render_sitemap())?;
        }
        if let Some(path) = &self.anchors {
            write_atomic(path, self.render_anchors())?;
        }
        log!("feed"; "persisted {} entries", self.len());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Time of the most recent change, `None` for a feed never updated.
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    /// Entries in discovery order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, locator: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.locator == locator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// RFC 3339 in UTC with second precision: `2024-01-02T03:04:05Z`.
fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, FeedError> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|err| FeedError::Timestamp(s.to_string(), err))
}

/// Escape special XML characters.
///
/// `\r` is written as a character reference: a literal CR does not survive
/// end-of-line handling on reload.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('\r', "&#xD;")
}
