//! Atom rendering and parsing.
//!
//! # Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <feed xmlns="http://www.w3.org/2005/Atom">
//!   <id>urn:example</id>
//!   <title>Articles</title>
//!   <updated>2025-01-01T00:00:00Z</updated>
//!   <entry>
//!     <title>Hello</title>
//!     <link href="https://example.com/hello"></link>
//!     <published>2025-01-01T00:00:00Z</published>
//!     <updated>2025-01-01T00:00:00Z</updated>
//!     <summary>First post</summary>
//!   </entry>
//! </feed>
//! ```

use super::{Entry, Feed, FeedError, XML_DECLARATION, escape_xml, format_time, parse_time};
use quick_xml::{Reader, events::Event};
use serde::Deserialize;
use std::{collections::HashSet, path::PathBuf};

/// XML namespace for Atom
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    updated: Option<String>,
    #[serde(default, rename = "entry")]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    title: Option<String>,
    link: AtomLink,
    published: String,
    updated: String,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: String,
}

impl Feed {
    /// Render the feed document. Entries keep their stored order.
    pub fn render_atom(&self) -> String {
        let mut xml = String::with_capacity(512 + self.entries.len() * 384);

        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(&format!(r#"<feed xmlns="{ATOM_NS}">"#));
        xml.push('\n');
        xml.push_str(&format!("  <id>{}</id>\n", escape_xml(&self.id)));
        xml.push_str(&format!("  <title>{}</title>\n", escape_xml(&self.title)));
        if let Some(updated) = &self.updated {
            xml.push_str(&format!("  <updated>{}</updated>\n", format_time(updated)));
        }

        for entry in &self.entries {
            let title = entry.title.as_deref().unwrap_or_default();
            xml.push_str("  <entry>\n");
            xml.push_str(&format!("    <title>{}</title>\n", escape_xml(title)));
            xml.push_str(&format!(
                "    <link href=\"{}\"></link>\n",
                escape_xml(&entry.locator)
            ));
            xml.push_str(&format!(
                "    <published>{}</published>\n",
                format_time(&entry.published)
            ));
            xml.push_str(&format!(
                "    <updated>{}</updated>\n",
                format_time(&entry.updated)
            ));
            if let Some(summary) = &entry.summary {
                xml.push_str(&format!("    <summary>{}</summary>\n", escape_xml(summary)));
            }
            xml.push_str("  </entry>\n");
        }

        xml.push_str("</feed>");
        xml
    }

    /// Parse a feed document previously written by [`Feed::render_atom`].
    pub(super) fn parse(xml: &str, path: PathBuf) -> Result<Self, FeedError> {
        check_root(xml)?;
        let doc: AtomFeed = quick_xml::de::from_str(xml)?;

        let entries = doc
            .entries
            .into_iter()
            .map(|entry| {
                Ok(Entry {
                    locator: entry.link.href,
                    title: non_empty(entry.title),
                    summary: non_empty(entry.summary),
                    published: parse_time(&entry.published)?,
                    updated: parse_time(&entry.updated)?,
                })
            })
            .collect::<Result<Vec<_>, FeedError>>()?;

        let mut seen = HashSet::with_capacity(entries.len());
        if let Some(entry) = entries.iter().find(|e| !seen.insert(e.locator.as_str())) {
            return Err(FeedError::DuplicateLocator(entry.locator.clone()));
        }

        let mut feed = Feed::new(path);
        feed.id = doc.id;
        feed.title = doc.title;
        feed.updated = non_empty(doc.updated).map(|s| parse_time(&s)).transpose()?;
        feed.entries = entries;
        Ok(feed)
    }
}

/// Reject documents whose first element is not `<feed>`.
fn check_root(xml: &str) -> Result<(), FeedError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(elem) | Event::Empty(elem) => {
                let name = elem.local_name();
                return if name.as_ref() == b"feed" {
                    Ok(())
                } else {
                    let name = String::from_utf8_lossy(name.as_ref());
                    Err(FeedError::UnexpectedRoot(format!("<{name}>")))
                };
            }
            Event::Eof => return Err(FeedError::UnexpectedRoot("no element".to_string())),
            _ => {}
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
