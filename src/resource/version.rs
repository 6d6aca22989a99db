//! Content-derived resource versions.
//!
//! Versions are computed deterministically from resource content using SHA-256
//! hashing and rendered as HTTP weak ETags, e.g. `W/"3q2+7wAAAAA="`.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use sha2::{Digest, Sha256};

/// Weak ETag for the given content.
///
/// Only the first 8 bytes of the digest are kept for shorter tags.
pub fn version_from_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let hash = hasher.finalize();
    format!("W/\"{}\"", BASE64.encode(&hash[..8]))
}
