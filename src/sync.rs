//! One sync pass: stored events from the relay into article files and feed.
//!
//! Events are applied one at a time in delivery order. Each event either
//! changes the feed, in which case its article file and every feed output are
//! rewritten, or is a strict no-op.

use crate::{
    article::write_article,
    config::SyncConfig,
    feed::Feed,
    log,
    nostr::{
        Event, Filter, Relay,
        event::{TAG_IDENTIFIER, TAG_PUBLISHED_AT, TAG_SUMMARY, TAG_TITLE},
    },
    utils::path::{article_path, is_safe_identifier, join_link},
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use thiserror::Error;

/// Upstream contract violations; each one aborts the run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("event {0} has no `d` tag")]
    MissingIdentifier(String),

    #[error("event {event} has a `d` tag unusable as a file name: {identifier:?}")]
    UnsafeIdentifier { event: String, identifier: String },

    #[error("event {event} has an out of range created_at: {created_at}")]
    InvalidTimestamp { event: String, created_at: i64 },
}

/// Where articles go and how they are linked.
#[derive(Debug, Clone)]
pub struct Layout {
    pub content_dir: PathBuf,
    pub extension: String,
    pub link_prefix: String,
    pub require_title: bool,
}

impl Layout {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            content_dir: config.content.dir.clone(),
            extension: config.content.extension.clone(),
            link_prefix: config.feed.link_prefix.clone(),
            require_title: config.content.require_title,
        }
    }
}

/// What applying one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Feed changed; article and feed outputs written
    Changed,
    /// Already up to date; nothing written
    Unchanged,
    /// No title; article written, feed untouched
    Untitled,
}

/// Counters for one sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub received: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub untitled: usize,
}

impl SyncReport {
    fn record(&mut self, outcome: Outcome) {
        self.received += 1;
        match outcome {
            Outcome::Changed => self.changed += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Untitled => self.untitled += 1,
        }
    }
}

/// Subscribe and apply every stored event until the relay signals the end.
pub fn run_sync<R: Relay>(
    relay: R,
    filter: Filter,
    feed: &mut Feed,
    layout: &Layout,
) -> Result<SyncReport> {
    let subscription = relay.subscribe(filter).context("Failed to subscribe")?;

    let mut report = SyncReport::default();
    for event in subscription.events() {
        report.record(apply_event(&event, feed, layout)?);
    }
    subscription.finish().context("Relay subscription failed")?;

    log!(
        "sync";
        "{} events: {} changed, {} unchanged, {} untitled",
        report.received, report.changed, report.unchanged, report.untitled
    );
    Ok(report)
}

/// Apply one event to the feed and persist what changed.
pub fn apply_event(event: &Event, feed: &mut Feed, layout: &Layout) -> Result<Outcome> {
    let identifier = event
        .tag_value(TAG_IDENTIFIER)
        .ok_or_else(|| SyncError::MissingIdentifier(event.id.clone()))?;
    if !is_safe_identifier(identifier) {
        return Err(SyncError::UnsafeIdentifier {
            event: event.id.clone(),
            identifier: identifier.to_string(),
        }
        .into());
    }
    let updated = event.created_at().ok_or_else(|| SyncError::InvalidTimestamp {
        event: event.id.clone(),
        created_at: event.created_at,
    })?;

    let link = join_link(&layout.link_prefix, identifier);
    let path = article_path(&layout.content_dir, identifier, &layout.extension);

    let title = event.tag_value(TAG_TITLE);
    if title.is_none() && layout.require_title {
        if feed.get(&link).is_some_and(|entry| entry.updated >= updated) {
            return Ok(Outcome::Unchanged);
        }
        write_article(event, &path)?;
        log!("sync"; "event {} has no title, kept out of the feed", event.id);
        return Ok(Outcome::Untitled);
    }

    let summary = event.tag_value(TAG_SUMMARY);
    let published = event.tag_time(TAG_PUBLISHED_AT);
    if !feed.upsert(&link, title, summary, updated, published) {
        return Ok(Outcome::Unchanged);
    }

    write_article(event, &path)?;
    feed.persist()?;
    Ok(Outcome::Changed)
}
