//! Storage key generation for processed videos.
//!
//! Keys are never derived from content: every upload gets a fresh 256-bit token,
//! so re-uploading the same file produces a new object.

use rand::CryptoRng;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use tubely_core::constants::DEFAULT_VIDEO_EXTENSION;
use tubely_core::AspectCategory;

/// Number of random bytes in a key token.
pub const TOKEN_BYTES: usize = 32;

const MAX_EXTENSION_LEN: usize = 10;

/// Object key of a processed video: `{category}/{hex token}{extension}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate a key for a processed video using the thread-local CSPRNG.
pub fn generate_video_key(category: AspectCategory, original_filename: &str) -> StorageKey {
    generate_video_key_with(&mut rand::rng(), category, original_filename)
}

/// Generate a key drawing the token from `rng`.
pub fn generate_video_key_with<R: CryptoRng + ?Sized>(
    rng: &mut R,
    category: AspectCategory,
    original_filename: &str,
) -> StorageKey {
    let mut token = [0u8; TOKEN_BYTES];
    rng.fill_bytes(&mut token);
    StorageKey(format!(
        "{}/{}{}",
        category.prefix(),
        hex::encode(token),
        video_extension(original_filename)
    ))
}

/// Extension (with the leading dot) taken from the client filename.
///
/// Only short alphanumeric extensions are kept; anything else, including a
/// missing extension, falls back to `.mp4`. This is deliberately narrower than
/// keeping any trailing `.suffix`, so client filenames cannot inject odd key text.
pub fn video_extension(original_filename: &str) -> String {
    Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_VIDEO_EXTENSION.to_string())
}
