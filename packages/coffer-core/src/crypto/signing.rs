//! # Digital Signatures Module
//!
//! RSA-PSS signatures binding the vault identity to a file's plaintext
//! digest.
//!
//! ## Signature Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SIGNING FLOW                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  plaintext ──► SHA-256 ──► digest (32 bytes)                           │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────┐          │
//! │  │  RSA-PSS sign                                            │          │
//! │  │                                                          │          │
//! │  │  message  = digest                                       │          │
//! │  │  hash     = SHA-256 (applied to the message by PSS)      │          │
//! │  │  MGF      = MGF1(SHA-256)                                │          │
//! │  │  salt len = emLen - hLen - 2  (maximum for the modulus)  │          │
//! │  └──────────────────────────────────────────────────────────┘          │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  signature (modulus size: 256 bytes for RSA-2048)                      │
//! │                                                                         │
//! │  Verification recomputes the digest from decrypted content and         │
//! │  checks it under exactly the same parameters.                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! PSS is randomized: signing the same digest twice gives two different,
//! equally valid signatures.

use rand::rngs::OsRng;
use rsa::Pss;
use sha2::{Digest as _, Sha256};

use crate::crypto::digest::{Digest, DIGEST_SIZE};
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::error::{Error, Result};

/// An RSA-PSS signature; its length equals the signer's modulus size
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Create from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Largest PSS salt a modulus of `modulus_bits` can carry with SHA-256
pub fn max_salt_len(modulus_bits: usize) -> usize {
    let em_len = (modulus_bits - 1).div_ceil(8);
    em_len - DIGEST_SIZE - 2
}

fn pss(modulus_bits: usize) -> Pss {
    Pss::new_with_salt::<Sha256>(max_salt_len(modulus_bits))
}

/// Sign a content digest with RSA-PSS
pub fn sign(digest: &Digest, private_key: &PrivateKey) -> Result<Signature> {
    let hashed = Sha256::digest(digest.as_bytes());
    let signature = private_key
        .rsa()
        .sign_with_rng(&mut OsRng, pss(private_key.bits()), &hashed)
        .map_err(|e| Error::SigningFailed(e.to_string()))?;
    Ok(Signature(signature))
}

/// Verify an RSA-PSS signature over a content digest
///
/// ## Returns
///
/// `Ok(())` if valid, `Err(SignatureInvalid)` otherwise. A signature of the
/// wrong length is rejected the same way as one with a bad padding block.
pub fn verify(digest: &Digest, signature: &Signature, public_key: &PublicKey) -> Result<()> {
    if signature.0.len() != public_key.size() {
        return Err(Error::SignatureInvalid);
    }

    let hashed = Sha256::digest(digest.as_bytes());
    public_key
        .rsa()
        .verify(pss(public_key.bits()), &hashed, &signature.0)
        .map_err(|_| Error::SignatureInvalid)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{other_test_keypair, test_keypair};

    #[test]
    fn test_max_salt_len() {
        assert_eq!(max_salt_len(2048), 222);
        assert_eq!(max_salt_len(3072), 350);
        assert_eq!(max_salt_len(4096), 478);
        // 2049-bit modulus: emLen is still 257 bytes
        assert_eq!(max_salt_len(2049), 222);
    }

    #[test]
    fn test_sign_verify() {
        let keys = test_keypair();
        let digest = Digest::of(b"Hello, World!");

        let signature = sign(&digest, &keys.private).unwrap();
        assert_eq!(signature.as_bytes().len(), 256);

        assert!(verify(&digest, &signature, &keys.public).is_ok());
    }

    #[test]
    fn test_signatures_are_randomized() {
        let keys = test_keypair();
        let digest = Digest::of(b"same content");

        let a = sign(&digest, &keys.private).unwrap();
        let b = sign(&digest, &keys.private).unwrap();

        assert_ne!(a, b);
        assert!(verify(&digest, &a, &keys.public).is_ok());
        assert!(verify(&digest, &b, &keys.public).is_ok());
    }

    #[test]
    fn test_verify_wrong_digest_fails() {
        let keys = test_keypair();
        let signature = sign(&Digest::of(b"Hello, World!"), &keys.private).unwrap();

        let result = verify(&Digest::of(b"Wrong message!"), &signature, &keys.public);
        assert!(matches!(result, Err(Error::SignatureInvalid)));
    }

    #[test]
    fn test_verify_wrong_key_fails() {
        let digest = Digest::of(b"Hello, World!");
        let signature = sign(&digest, &test_keypair().private).unwrap();

        let result = verify(&digest, &signature, &other_test_keypair().public);
        assert!(matches!(result, Err(Error::SignatureInvalid)));
    }

    #[test]
    fn test_flipped_signature_bit_fails() {
        let keys = test_keypair();
        let digest = Digest::of(b"Hello, World!");
        let mut bytes = sign(&digest, &keys.private).unwrap().as_bytes().to_vec();
        bytes[200] ^= 0x10;

        let result = verify(&digest, &Signature::from_bytes(bytes), &keys.public);
        assert!(matches!(result, Err(Error::SignatureInvalid)));
    }

    #[test]
    fn test_truncated_signature_fails() {
        let keys = test_keypair();
        let digest = Digest::of(b"Hello, World!");
        let mut bytes = sign(&digest, &keys.private).unwrap().as_bytes().to_vec();
        bytes.pop();

        let result = verify(&digest, &Signature::from_bytes(bytes), &keys.public);
        assert!(matches!(result, Err(Error::SignatureInvalid)));
    }

    #[test]
    fn test_short_salt_signature_rejected() {
        // A PSS signature with a digest-length salt is valid PSS, but not
        // under the maximum-salt convention.
        let keys = test_keypair();
        let digest = Digest::of(b"Hello, World!");
        let hashed = Sha256::digest(digest.as_bytes());
        let short_salt = keys
            .private
            .rsa()
            .sign_with_rng(&mut OsRng, Pss::new::<Sha256>(), &hashed)
            .unwrap();

        let result = verify(&digest, &Signature::from_bytes(short_salt), &keys.public);
        assert!(matches!(result, Err(Error::SignatureInvalid)));
    }
}
