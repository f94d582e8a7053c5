//! # Authenticated Cipher
//!
//! AES-256-GCM for file confidentiality and integrity.
//!
//! ## Sealing and Opening
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CONTENT ENCRYPTION                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  seal(plaintext, key)                                                  │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  nonce = 12 random bytes from OsRng                          │       │
//! │  │  ciphertext, tag = AES-256-GCM(key, nonce, plaintext, aad="")│       │
//! │  │                                                              │       │
//! │  │  len(ciphertext) == len(plaintext)                          │       │
//! │  │  len(tag)        == 16, kept detached from the ciphertext   │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  open(ciphertext, key, nonce, tag)                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  Tag verified before any plaintext is released.             │       │
//! │  │  Full plaintext, or AuthenticationFailed. Nothing between.  │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tag travels in the envelope and the ciphertext in a separate blob,
//! so this module uses the detached in-place AEAD API instead of the
//! combined `ciphertext || tag` output.

use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes256Gcm, Nonce as AesNonce, Tag as AesTag,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::random::random_array;
use crate::error::{Error, Result};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Size of the file encryption key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// A per-file AES-256 key
///
/// Generated fresh for every sealed file and zeroized when dropped. There
/// is no way to serialize it; the only thing that leaves the process is
/// its RSA-OAEP-wrapped form.
#[derive(ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Generate a fresh random key
    pub fn generate() -> Result<Self> {
        Ok(Self(random_array()?))
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes (for wrapping)
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        // Fold the whole array so the comparison does not short-circuit.
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Eq for SymmetricKey {}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// A nonce (number used once) for AES-GCM encryption
///
/// ## Critical Security Requirement
///
/// **NEVER reuse a nonce with the same key!**
///
/// Every file gets its own key as well as its own random nonce, so a
/// collision would additionally need a key collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// Generate a cryptographically random nonce
    pub fn random() -> Result<Self> {
        Ok(Self(random_array()?))
    }

    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice (must be exactly 12 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; NONCE_SIZE] = slice.try_into().map_err(|_| {
            Error::InvalidEnvelope(format!(
                "nonce must be {} bytes, got {}",
                NONCE_SIZE,
                slice.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

/// A 16-byte AES-GCM authentication tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag([u8; TAG_SIZE]);

impl Tag {
    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; TAG_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice (must be exactly 16 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; TAG_SIZE] = slice.try_into().map_err(|_| {
            Error::InvalidEnvelope(format!(
                "tag must be {} bytes, got {}",
                TAG_SIZE,
                slice.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }
}

/// Output of [`seal`]
#[derive(Debug)]
pub struct SealedContent {
    /// Ciphertext, same length as the plaintext
    pub ciphertext: Vec<u8>,
    /// Nonce used for this file
    pub nonce: Nonce,
    /// Detached authentication tag
    pub tag: Tag,
}

/// Encrypt file content with AES-256-GCM under a fresh random nonce
///
/// ## Example
///
/// ```ignore
/// let key = SymmetricKey::generate()?;
/// let sealed = seal(b"file bytes", &key)?;
/// assert_eq!(sealed.ciphertext.len(), 10);
/// ```
pub fn seal(plaintext: &[u8], key: &SymmetricKey) -> Result<SealedContent> {
    let nonce = Nonce::random()?;
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| Error::EncryptionFailed(format!("Invalid key: {}", e)))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(AesNonce::from_slice(nonce.as_bytes()), b"", &mut buffer)
        .map_err(|e| Error::EncryptionFailed(format!("Encryption failed: {}", e)))?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok(SealedContent {
        ciphertext: buffer,
        nonce,
        tag: Tag(tag_bytes),
    })
}

/// Decrypt and authenticate file content with AES-256-GCM
///
/// ## Errors
///
/// Returns `AuthenticationFailed` if:
/// - The ciphertext was tampered with or truncated
/// - The nonce or tag is wrong
/// - The key is wrong
///
/// All cases produce the same error value.
pub fn open(ciphertext: &[u8], key: &SymmetricKey, nonce: &Nonce, tag: &Tag) -> Result<Vec<u8>> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| Error::AuthenticationFailed)?;

    let mut buffer = ciphertext.to_vec();
    match cipher.decrypt_in_place_detached(
        AesNonce::from_slice(nonce.as_bytes()),
        b"",
        &mut buffer,
        AesTag::from_slice(tag.as_bytes()),
    ) {
        Ok(()) => Ok(buffer),
        Err(_) => {
            buffer.zeroize();
            Err(Error::AuthenticationFailed)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
