//! Cryptographically secure random bytes.
//!
//! All entropy in Coffer comes from the operating system (`OsRng`). File
//! keys, nonces, OAEP seeds and PSS salts are all drawn here or directly
//! from `OsRng` inside the RSA operations.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};

/// Fill a fixed-size array with random bytes from the OS.
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| Error::EncryptionFailed(format!("OS random source unavailable: {}", e)))?;
    Ok(bytes)
}
