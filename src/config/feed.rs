//! `[feed]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[feed]` section in feedsync.toml - the article index and its derived files.
///
/// The Atom feed is always written. Setting `sitemap` or `anchors` enables
/// that output.
///
/// # Example
/// ```toml
/// [feed]
/// path = "public/atom.xml"
/// id = "urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6"
/// title = "My Articles"
/// link_prefix = "https://example.com/posts"
/// sitemap = "public/sitemap.xml"
/// anchors = "public/articles.html"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Atom feed file, also the state kept between runs.
    #[serde(default = "defaults::feed::path")]
    #[educe(Default = defaults::feed::path())]
    pub path: PathBuf,

    /// Feed `<id>`. Empty keeps the stored one.
    #[serde(default)]
    pub id: String,

    /// Feed `<title>`. Empty keeps the stored one.
    #[serde(default)]
    pub title: String,

    /// Public link prefix; an article's link is `<link_prefix>/<d tag>`.
    #[serde(default)]
    pub link_prefix: String,

    /// Sitemap output.
    #[serde(default)]
    pub sitemap: Option<PathBuf>,

    /// Ordered anchor list output.
    #[serde(default)]
    pub anchors: Option<PathBuf>,
}
