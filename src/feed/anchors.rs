//! Ordered anchor list, an HTML fragment linking every article.
//!
//! ```html
//! <ol>
//!   <li>
//!     <a href="https://example.com/hello">Hello</a>
//!     <a href="https://example.com/world">World</a>
//!   </li>
//! </ol>
//! ```
//!
//! All anchors share a single `<li>`.

use super::{Feed, escape_xml};

impl Feed {
    /// Render the anchor list in stored order. Anchor text is the title.
    pub fn render_anchors(&self) -> String {
        if self.entries.is_empty() {
            return "<ol></ol>".to_string();
        }

        let mut html = String::with_capacity(32 + self.entries.len() * 96);
        html.push_str("<ol>\n  <li>\n");
        for entry in &self.entries {
            html.push_str(&format!(
                "    <a href=\"{}\">{}</a>\n",
                escape_xml(&entry.locator),
                escape_xml(entry.title.as_deref().unwrap_or_default())
            ));
        }
        html.push_str("  </li>\n</ol>");
        html
    }
}
