//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sync nostr long-form articles into markdown files and an atom feed
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file path (default: feedsync.toml)
    #[arg(short = 'C', long, default_value = "feedsync.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fetch stored articles from the relay and update every output
    Sync {
        /// Override the relay address from the config file
        #[arg(short, long)]
        relay: Option<String>,
    },

    /// Validate the config and the stored feed without connecting
    Check,

    /// Rewrite the feed, sitemap and anchor list from the stored feed
    Rebuild,
}
