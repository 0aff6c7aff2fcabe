//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [content] Section Defaults
// ============================================================================

pub mod content {
    use std::path::PathBuf;

    pub fn dir() -> PathBuf {
        "content".into()
    }

    pub fn extension() -> String {
        "md".into()
    }
}

// ============================================================================
// [feed] Section Defaults
// ============================================================================

pub mod feed {
    use std::path::PathBuf;

    pub fn path() -> PathBuf {
        "feed.xml".into()
    }
}
