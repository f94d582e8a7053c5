//! Open pipeline: parse, unwrap, decrypt, verify.
//!
//! ```text
//! Start ─► EnvelopeParsed ─► KeyUnwrapped ─► Decrypted ─► DigestRecomputed
//!       ─► Verified | Rejected
//! ```
//!
//! | Step | Failure |
//! |------|---------|
//! | parse | `InvalidEnvelope` (no key material touched) |
//! | unwrap | `KeyUnwrapFailed` |
//! | decrypt | `AuthenticationFailed` |
//! | verify | `SignatureInvalid` |
//!
//! Plaintext leaves this module only after the signature has verified. On
//! a signature failure the decrypted buffer is zeroized before returning.

use zeroize::Zeroizing;

use crate::crypto::{cipher, signing, wrap, Digest, PrivateKey, PublicKey};
use crate::envelope::{codec, Envelope, Opened};
use crate::error::Result;

/// Open a parsed envelope and its ciphertext blob
///
/// `recipient` unwraps the file key; `verifier` checks the signature. In
/// the single-identity workflow both come from the same key pair.
pub fn open(
    envelope: &Envelope,
    ciphertext: &[u8],
    verifier: &PublicKey,
    recipient: &PrivateKey,
) -> Result<Opened> {
    let key = wrap::unwrap(&envelope.wrapped_key, recipient)?;
    tracing::trace!(stage = "KeyUnwrapped", "open");

    let plaintext = Zeroizing::new(cipher::open(ciphertext, &key, &envelope.nonce, &envelope.tag)?);
    drop(key);
    tracing::trace!(stage = "Decrypted", len = plaintext.len(), "open");

    let digest = Digest::of(&plaintext);
    tracing::trace!(stage = "DigestRecomputed", "open");

    signing::verify(&digest, &envelope.signature, verifier)?;
    tracing::trace!(stage = "Verified", "open");

    tracing::debug!(
        filename = envelope.original_filename.as_str(),
        size = plaintext.len(),
        digest = %digest.to_hex(),
        "Opened file"
    );

    Ok(Opened {
        filename: envelope.original_filename.clone(),
        plaintext,
        timestamp: envelope.timestamp,
        digest,
    })
}

/// Parse envelope text, then [`open`]
pub fn open_encoded(
    text: &str,
    ciphertext: &[u8],
    verifier: &PublicKey,
    recipient: &PrivateKey,
) -> Result<Opened> {
    let envelope = codec::decode(text)?;
    tracing::trace!(stage = "EnvelopeParsed", "open");
    open(&envelope, ciphertext, verifier, recipient)
}

// ============================================================================
// TESTS
// ============================================================================
