//! Content signatures: SHA-256 over file bytes, or over a sorted list of
//! such digests. Recomputed fresh on every load, never trusted blindly.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::errors::{Error, Result};

/// SHA-256 hex digest over a byte slice.
pub fn content_signature(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// SHA-256 hex digest over a file's bytes.
pub fn file_signature(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(content_signature(&bytes))
}

/// Combined signature over a set of entry signatures. The input is sorted
/// before hashing, so the result is independent of entry order.
pub fn combined_signature(signatures: &[String]) -> String {
    let mut sorted: Vec<&str> = signatures.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    for signature in sorted {
        hasher.update(signature.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_signature_differs_for_different_bytes() {
        assert_ne!(
            content_signature(b"interface A"),
            content_signature(b"interface B")
        );
    }

    #[test]
    fn combined_signature_is_order_independent() {
        let forward = vec!["z".to_string(), "a".to_string(), "m".to_string()];
        let sorted = vec!["a".to_string(), "m".to_string(), "z".to_string()];
        assert_eq!(combined_signature(&forward), combined_signature(&sorted));
    }

    #[test]
    fn combined_signature_is_sensitive_to_content() {
        let a = vec!["a".to_string(), "b".to_string()];
        let b = vec!["a".to_string(), "c".to_string()];
        assert_ne!(combined_signature(&a), combined_signature(&b));
    }

    #[test]
    fn combined_signature_separates_entries() {
        // "ab" + "c" must not collide with "a" + "bc".
        let a = vec!["ab".to_string(), "c".to_string()];
        let b = vec!["a".to_string(), "bc".to_string()];
        assert_ne!(combined_signature(&a), combined_signature(&b));
    }

    #[test]
    fn file_signature_matches_content_signature() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("source.rs");
        std::fs::write(&path, "trait UserService {}").unwrap();
        assert_eq!(
            file_signature(&path).unwrap(),
            content_signature(b"trait UserService {}")
        );
    }

    #[test]
    fn file_signature_on_missing_file_names_the_path() {
        let err = file_signature(Path::new("/nonexistent/source.rs")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/source.rs"));
    }
}
