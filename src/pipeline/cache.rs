//! Content-addressed artifact naming and the cache existence check.
//!
//! The artifact filename is a pure function of the full wrapped document
//! (preamble + body + postamble): identical content never re-renders, and any
//! content change — including a deck-profile preamble edit — produces a new
//! filename. Nothing else participates in the key, so the media directory
//! doubles as the entire cache with no index to maintain.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex-encoded SHA-256 of the full document source.
pub fn cache_key(document: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Artifact filename for a document: `latex-<hash>.png`.
pub fn artifact_name(document: &str) -> String {
    format!("latex-{}.png", cache_key(document))
}

/// Whether the artifact already exists in the media directory.
pub fn artifact_exists(media_dir: &Path, fname: &str) -> bool {
    media_dir.join(fname).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_deterministic() {
        assert_eq!(cache_key("E=mc^2"), cache_key("E=mc^2"));
    }

    #[test]
    fn distinct_content_distinct_keys() {
        assert_ne!(cache_key("E=mc^2"), cache_key("E=mc^3"));
        assert_ne!(cache_key("x"), cache_key("x "));
    }

    #[test]
    fn artifact_name_shape() {
        let name = artifact_name("E=mc^2");
        assert!(name.starts_with("latex-"));
        assert!(name.ends_with(".png"));
        // sha256 hex is 64 chars
        assert_eq!(name.len(), "latex-".len() + 64 + ".png".len());
        assert!(name[6..70].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn existence_check() {
        let dir = tempfile::tempdir().unwrap();
        let fname = artifact_name("x^2");
        assert!(!artifact_exists(dir.path(), &fname));
        std::fs::write(dir.path().join(&fname), b"png").unwrap();
        assert!(artifact_exists(dir.path(), &fname));
    }
}
