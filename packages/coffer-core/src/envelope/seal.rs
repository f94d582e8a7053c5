//! Seal pipeline: encrypt, wrap, sign, build.
//!
//! ```text
//! Start ─► KeyGenerated ─► Encrypted ─► KeyWrapped ─► DigestComputed
//!       ─► Signed ─► EnvelopeBuilt ─► Done
//! ```
//!
//! Linear, no branches. Any failure returns early and nothing is built;
//! the file key is dropped (and zeroized) on every path out of [`seal_at`].

use std::collections::BTreeMap;

use crate::crypto::{cipher, signing, wrap, Digest, PrivateKey, PublicKey, SymmetricKey};
use crate::envelope::{Envelope, Sealed};
use crate::error::Result;

/// Seal `plaintext` for `recipient`, signed by `signer`, stamped with the
/// current time
///
/// ## Example
///
/// ```ignore
/// let keys = KeyPair::generate(2048)?;
/// let sealed = seal(b"hello world", "hello.txt", &keys.public, &keys.private)?;
/// assert_eq!(sealed.ciphertext.len(), 11);
/// ```
pub fn seal(
    plaintext: &[u8],
    filename: &str,
    recipient: &PublicKey,
    signer: &PrivateKey,
) -> Result<Sealed> {
    seal_at(plaintext, filename, recipient, signer, crate::time::now_timestamp())
}

/// Seal with an explicit timestamp
pub fn seal_at(
    plaintext: &[u8],
    filename: &str,
    recipient: &PublicKey,
    signer: &PrivateKey,
    timestamp: i64,
) -> Result<Sealed> {
    let key = SymmetricKey::generate()?;
    tracing::trace!(stage = "KeyGenerated", "seal");

    let content = cipher::seal(plaintext, &key)?;
    tracing::trace!(stage = "Encrypted", len = content.ciphertext.len(), "seal");

    let wrapped_key = wrap::wrap(&key, recipient)?;
    drop(key);
    tracing::trace!(stage = "KeyWrapped", "seal");

    // Signed object is the plaintext digest, not the ciphertext.
    let digest = Digest::of(plaintext);
    tracing::trace!(stage = "DigestComputed", "seal");

    let signature = signing::sign(&digest, signer)?;
    tracing::trace!(stage = "Signed", "seal");

    let envelope = Envelope {
        original_filename: filename.to_string(),
        wrapped_key,
        nonce: content.nonce,
        tag: content.tag,
        signature,
        timestamp,
        extensions: BTreeMap::new(),
    };

    tracing::debug!(
        filename,
        size = plaintext.len(),
        digest = %digest.to_hex(),
        "Sealed file"
    );

    Ok(Sealed {
        envelope,
        ciphertext: content.ciphertext,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::test_keypair;
    use crate::crypto::{NONCE_SIZE, TAG_SIZE};

    #[test]
    fn test_seal_fills_every_field() {
        let keys = test_keypair();
        let sealed = seal_at(b"hello world", "hello.txt", &keys.public, &keys.private, 42).unwrap();

        let env = &sealed.envelope;
        assert_eq!(env.original_filename, "hello.txt");
        assert_eq!(env.timestamp, 42);
        assert_eq!(env.nonce.as_bytes().len(), NONCE_SIZE);
        assert_eq!(env.tag.as_bytes().len(), TAG_SIZE);
        assert_eq!(env.wrapped_key.as_bytes().len(), keys.public.size());
        assert_eq!(env.signature.as_bytes().len(), keys.public.size());
        assert!(env.extensions.is_empty());
        assert_eq!(sealed.ciphertext.len(), 11);
        assert_ne!(sealed.ciphertext, b"hello world");
    }

    #[test]
    fn test_signature_covers_plaintext_digest() {
        let keys = test_keypair();
        let sealed = seal(b"attested content", "a.txt", &keys.public, &keys.private).unwrap();

        let digest = Digest::of(b"attested content");
        assert!(signing::verify(&digest, &sealed.envelope.signature, &keys.public).is_ok());

        let over_ciphertext = Digest::of(&sealed.ciphertext);
        assert!(signing::verify(&over_ciphertext, &sealed.envelope.signature, &keys.public).is_err());
    }

    #[test]
    fn test_each_seal_uses_fresh_key_and_nonce() {
        let keys = test_keypair();
        let a = seal(b"same", "same.txt", &keys.public, &keys.private).unwrap();
        let b = seal(b"same", "same.txt", &keys.public, &keys.private).unwrap();

        assert_ne!(a.envelope.nonce, b.envelope.nonce);
        assert_ne!(a.envelope.wrapped_key, b.envelope.wrapped_key);
        assert_ne!(a.ciphertext, b.ciphertext);

        let key_a = wrap::unwrap(&a.envelope.wrapped_key, &keys.private).unwrap();
        let key_b = wrap::unwrap(&b.envelope.wrapped_key, &keys.private).unwrap();
        assert_ne!(key_a, key_b);
    }

    #[test]
    fn test_seal_empty_file() {
        let keys = test_keypair();
        let sealed = seal(b"", "empty", &keys.public, &keys.private).unwrap();
        assert!(sealed.ciphertext.is_empty());
    }
}
