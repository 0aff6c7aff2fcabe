//! Path and link construction for article identifiers.

use std::path::{Path, PathBuf};

/// Whether `id` can be used as one path segment without escaping its folder.
pub fn is_safe_identifier(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}

/// Join a public link prefix with an identifier: `https://a.b/posts` + `x y`
/// gives `https://a.b/posts/x%20y`.
pub fn join_link(prefix: &str, id: &str) -> String {
    let id = urlencoding::encode(id);
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        id.into_owned()
    } else {
        format!("{prefix}/{id}")
    }
}

/// Content file for an identifier: `<dir>/<id>.<extension>`.
pub fn article_path(dir: &Path, id: &str, extension: &str) -> PathBuf {
    dir.join(format!("{id}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_link() {
        assert_eq!(
            join_link("https://example.com/posts", "hello"),
            "https://example.com/posts/hello"
        );
        assert_eq!(
            join_link("https://example.com/posts/", "hello"),
            "https://example.com/posts/hello"
        );
        assert_eq!(join_link("/articles", "hello"), "/articles/hello");
        assert_eq!(join_link("", "hello"), "hello");
    }

    #[test]
    fn test_join_link_escapes_identifier() {
        assert_eq!(
            join_link("https://example.com", "a b&c"),
            "https://example.com/a%20b%26c"
        );
    }

    #[test]
    fn test_article_path() {
        assert_eq!(
            article_path(Path::new("content/posts"), "hello", "md"),
            PathBuf::from("content/posts/hello.md")
        );
    }

    #[test]
    fn test_is_safe_identifier() {
        assert!(is_safe_identifier("my-first-post"));
        assert!(is_safe_identifier("1700000000"));
        assert!(!is_safe_identifier(""));
        assert!(!is_safe_identifier(".."));
        assert!(!is_safe_identifier("."));
        assert!(!is_safe_identifier("../etc/passwd"));
        assert!(!is_safe_identifier("a\\b"));
    }
}
