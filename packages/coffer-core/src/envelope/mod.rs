//! # Envelope Module
//!
//! The self-describing record of one sealed file, and the two pipelines
//! that produce and consume it.
//!
//! ## Envelope Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SEALED FILE                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  <id>.json  (Envelope, structured text)      <id>.data  (blob)         │
//! │  ┌─────────────────────────────────────┐    ┌────────────────────┐     │
//! │  │  original_filename   "report.pdf"   │    │  AES-256-GCM       │     │
//! │  │  encrypted_aes_key   b64(RSA-OAEP)  │    │  ciphertext        │     │
//! │  │  nonce               b64(12 bytes)  │    │                    │     │
//! │  │  tag                 b64(16 bytes)  │    │  len == plaintext  │     │
//! │  │  signature           b64(RSA-PSS)   │    │                    │     │
//! │  │  timestamp           1717171717     │    └────────────────────┘     │
//! │  │  (extension fields, opaque)         │                               │
//! │  └─────────────────────────────────────┘                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pipelines
//!
//! ```text
//! seal:  generate key ─► encrypt ─► wrap key ─► digest ─► sign ─► Envelope
//! open:  parse ─► unwrap key ─► decrypt ─► digest ─► verify ─► plaintext
//! ```
//!
//! The signature covers the plaintext digest, never the ciphertext. Opening
//! therefore has to decrypt before it can verify; ciphertext tampering is
//! caught by the GCM tag, forgery by the signature.

pub mod codec;
mod open;
mod seal;

use std::collections::BTreeMap;

use zeroize::Zeroizing;

use crate::crypto::{Digest, Nonce, Signature, Tag, WrappedKey};

pub use codec::{decode, encode};
pub use open::{open, open_encoded};
pub use seal::{seal, seal_at};

/// The persisted record of one sealed file
///
/// Created once by [`seal`] and never modified afterwards. The ciphertext
/// is not part of the envelope; it travels as a separate blob.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Name of the file as supplied by the caller, unsanitized
    pub original_filename: String,
    /// RSA-OAEP-wrapped file key
    pub wrapped_key: WrappedKey,
    /// AES-GCM nonce
    pub nonce: Nonce,
    /// AES-GCM authentication tag
    pub tag: Tag,
    /// RSA-PSS signature over the plaintext digest
    pub signature: Signature,
    /// Seconds since the Unix epoch, set at seal time
    pub timestamp: i64,
    /// Extra fields carried alongside; preserved verbatim, never interpreted
    pub extensions: BTreeMap<String, serde_json::Value>,
}

/// Output of the seal pipeline
///
/// The caller must persist both parts together or not at all.
#[derive(Debug)]
pub struct Sealed {
    /// The envelope
    pub envelope: Envelope,
    /// The ciphertext blob
    pub ciphertext: Vec<u8>,
}

/// Output of a successful open: verified plaintext and its metadata
pub struct Opened {
    /// Original filename from the envelope
    pub filename: String,
    /// Decrypted, signature-verified content
    pub plaintext: Zeroizing<Vec<u8>>,
    /// Seal timestamp from the envelope
    pub timestamp: i64,
    /// SHA-256 of the plaintext (the signed object)
    pub digest: Digest,
}

impl std::fmt::Debug for Opened {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Opened")
            .field("filename", &self.filename)
            .field("len", &self.plaintext.len())
            .field("timestamp", &self.timestamp)
            .field("digest", &self.digest.to_hex())
            .finish()
    }
}
