//! SHA-256 content digests.
//!
//! The digest of the original plaintext is the object the signer attests
//! to. It is computed at seal time and recomputed from the decrypted bytes
//! at open time.

use sha2::{Digest as _, Sha256};

/// Size of a SHA-256 digest in bytes
pub const DIGEST_SIZE: usize = 32;

/// A SHA-256 digest of file content
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Hash `data` with SHA-256
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
