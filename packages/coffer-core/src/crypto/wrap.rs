//! # Key Wrapping
//!
//! RSA-OAEP protection of per-file AES keys.
//!
//! ## Parameters
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | Padding | OAEP |
//! | Hash | SHA-256 |
//! | Mask generation | MGF1(SHA-256) |
//! | Label | empty |
//! | Payload | 32-byte AES key (ceiling for RSA-2048 is 190 bytes) |
//!
//! OAEP is randomized, so wrapping the same key twice produces two different
//! ciphertexts that both unwrap to the original key.

use rand::rngs::OsRng;
use rsa::Oaep;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::crypto::cipher::{SymmetricKey, KEY_SIZE};
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::error::{Error, Result};

/// An RSA-OAEP-wrapped file key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedKey(Vec<u8>);

impl WrappedKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Wrap a file key for the holder of `public_key`
pub fn wrap(key: &SymmetricKey, public_key: &PublicKey) -> Result<WrappedKey> {
    let wrapped = public_key
        .rsa()
        .encrypt(&mut OsRng, oaep(), key.as_bytes())
        .map_err(|e| Error::KeyWrapFailed(e.to_string()))?;
    Ok(WrappedKey(wrapped))
}

/// Recover a file key with `private_key`
///
/// ## Errors
///
/// `KeyUnwrapFailed` for a wrong-length ciphertext, a failed padding check
/// (wrong key or corrupted bytes), or a recovered payload that is not
/// exactly 32 bytes. Nothing derived from an invalid padding block is ever
/// returned.
pub fn unwrap(wrapped: &WrappedKey, private_key: &PrivateKey) -> Result<SymmetricKey> {
    if wrapped.0.len() != private_key.size() {
        return Err(Error::KeyUnwrapFailed);
    }

    let recovered = Zeroizing::new(
        private_key
            .rsa()
            .decrypt_blinded(&mut OsRng, oaep(), &wrapped.0)
            .map_err(|_| Error::KeyUnwrapFailed)?,
    );

    let bytes: [u8; KEY_SIZE] = recovered
        .as_slice()
        .try_into()
        .map_err(|_| Error::KeyUnwrapFailed)?;
    Ok(SymmetricKey::from_bytes(bytes))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{other_test_keypair, test_keypair};

    #[test]
    fn test_wrap_unwrap_round_trip() {
        let keys = test_keypair();
        let key = SymmetricKey::from_bytes([7u8; 32]);

        let wrapped = wrap(&key, &keys.public).unwrap();
        assert_eq!(wrapped.as_bytes().len(), 256);

        let unwrapped = unwrap(&wrapped, &keys.private).unwrap();
        assert_eq!(unwrapped, key);
    }

    #[test]
    fn test_wrapping_is_randomized() {
        let keys = test_keypair();
        let key = SymmetricKey::generate().unwrap();

        let first = wrap(&key, &keys.public).unwrap();
        let second = wrap(&key, &keys.public).unwrap();
        assert_ne!(first, second);

        assert_eq!(unwrap(&first, &keys.private).unwrap(), key);
        assert_eq!(unwrap(&second, &keys.private).unwrap(), key);
    }

    #[test]
    fn test_wrong_private_key_fails() {
        let key = SymmetricKey::generate().unwrap();
        let wrapped = wrap(&key, &test_keypair().public).unwrap();

        let result = unwrap(&wrapped, &other_test_keypair().private);
        assert!(matches!(result, Err(Error::KeyUnwrapFailed)));
    }

    #[test]
    fn test_corrupted_wrapped_key_fails() {
        let keys = test_keypair();
        let key = SymmetricKey::generate().unwrap();
        let mut bytes = wrap(&key, &keys.public).unwrap().as_bytes().to_vec();
        bytes[100] ^= 0x04;

        let result = unwrap(&WrappedKey::from_bytes(bytes), &keys.private);
        assert!(matches!(result, Err(Error::KeyUnwrapFailed)));
    }

    #[test]
    fn test_wrong_length_wrapped_key_fails() {
        let keys = test_keypair();
        let result = unwrap(&WrappedKey::from_bytes(vec![1u8; 255]), &keys.private);
        assert!(matches!(result, Err(Error::KeyUnwrapFailed)));
    }

    #[test]
    fn test_non_key_payload_rejected() {
        // A valid OAEP block that carries 16 bytes instead of a 32-byte key.
        let keys = test_keypair();
        let bogus = keys
            .public
            .rsa()
            .encrypt(&mut OsRng, oaep(), &[9u8; 16])
            .unwrap();

        let result = unwrap(&WrappedKey::from_bytes(bogus), &keys.private);
        assert!(matches!(result, Err(Error::KeyUnwrapFailed)));
    }
}
