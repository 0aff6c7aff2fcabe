//! feedsync - mirror nostr long-form articles into a static site.

mod article;
mod cli;
mod config;
mod feed;
mod nostr;
mod sync;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::SyncConfig;
use feed::Feed;
use nostr::WsRelay;
use sync::{Layout, run_sync};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SyncConfig::load(&cli)?;
    let mut feed = load_feed(&config)?;

    match &cli.command {
        Commands::Sync { .. } => {
            let relay = WsRelay::connect(&config.relay.url)
                .with_context(|| format!("Failed to connect to {}", config.relay.url))?;
            run_sync(relay, config.filter(), &mut feed, &Layout::from_config(&config))?;
        }
        Commands::Check => {
            let updated = feed
                .updated()
                .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
            log!(
                "check";
                "config ok, feed `{}` ({}): {} entries, updated {updated}",
                feed.title(),
                feed.path().display(),
                feed.len()
            );
        }
        Commands::Rebuild => feed.persist()?,
    }

    Ok(())
}

/// Load the stored feed and attach the configured derived outputs
fn load_feed(config: &SyncConfig) -> Result<Feed> {
    let path = &config.feed.path;
    let mut feed = Feed::load(path, &config.feed.id, &config.feed.title)
        .with_context(|| format!("Failed to load feed {}", path.display()))?;

    if let Some(sitemap) = &config.feed.sitemap {
        feed = feed.with_sitemap(sitemap);
    }
    if let Some(anchors) = &config.feed.anchors {
        feed = feed.with_anchors(anchors);
    }
    Ok(feed)
}
