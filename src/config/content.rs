//! `[content]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[content]` section in feedsync.toml - article files.
///
/// # Example
/// ```toml
/// [content]
/// dir = "content/posts"
/// extension = "md"
/// require_title = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Folder receiving one file per article.
    #[serde(default = "defaults::content::dir")]
    #[educe(Default = defaults::content::dir())]
    pub dir: PathBuf,

    /// Extension of article files, without the dot.
    #[serde(default = "defaults::content::extension")]
    #[educe(Default = defaults::content::extension())]
    pub extension: String,

    /// Articles without a title are written to disk but kept out of the feed.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub require_title: bool,
}
