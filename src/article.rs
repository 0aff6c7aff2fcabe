//! Article files: a JSON front matter block followed by the raw body.
//!
//! ```text
//! {
//!   "title": "Hello",
//!   "updated": "2025-01-01"
//! }
//! # Hello
//! ...
//! ```

use crate::{
    log,
    nostr::{Event, event::TAG_TITLE},
    utils::fs::write_atomic,
};
use anyhow::{Result, anyhow};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    updated: String,
}

/// Write the article file for `event`, replacing any previous version.
pub fn write_article(event: &Event, path: &Path) -> Result<()> {
    write_atomic(path, render_article(event))?;
    log!("article"; "persisted event {}; article {}", event.id, path.display());
    Ok(())
}

/// Front matter plus body. A front matter that cannot be built is logged
/// and left out; the body is always written.
pub fn render_article(event: &Event) -> String {
    let mut out = String::with_capacity(event.content.len() + 64);
    match front_matter(event) {
        Ok(json) => {
            out.push_str(&json);
            out.push('\n');
        }
        Err(err) => log!("error"; "front matter of event {}: {err:#}", event.id),
    }
    out.push_str(&event.content);
    out
}

fn front_matter(event: &Event) -> Result<String> {
    let updated = event
        .created_at()
        .ok_or_else(|| anyhow!("created_at out of range: {}", event.created_at))?;
    let front_matter = FrontMatter {
        title: event.tag_value(TAG_TITLE),
        updated: updated.format("%Y-%m-%d").to_string(),
    };
    Ok(serde_json::to_string_pretty(&front_matter)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nostr::event::tests::make_event;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_with_title() {
        let event = make_event(1_735_689_600, &[&["d", "hello"], &["title", " Hello "]], "# Hello\n");

        assert_eq!(
            render_article(&event),
            "{\n  \"title\": \"Hello\",\n  \"updated\": \"2025-01-01\"\n}\n# Hello\n"
        );
    }

    #[test]
    fn test_render_without_title() {
        let event = make_event(1_735_689_600, &[&["d", "hello"]], "body");

        assert_eq!(
            render_article(&event),
            "{\n  \"updated\": \"2025-01-01\"\n}\nbody"
        );
    }

    #[test]
    fn test_render_bad_timestamp_keeps_body() {
        let event = make_event(i64::MAX, &[&["title", "T"]], "body only");
        assert_eq!(render_article(&event), "body only");
    }

    #[test]
    fn test_write_article_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts/hello.md");

        let first = make_event(1_735_689_600, &[&["title", "One"]], "a long first body");
        write_article(&first, &path).unwrap();
        let second = make_event(1_735_776_000, &[&["title", "Two"]], "short");
        write_article(&second, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_article(&second));
        assert!(written.ends_with("}\nshort"));
    }
}
