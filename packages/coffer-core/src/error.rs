//! # Error Handling
//!
//! This module provides the error type for Coffer Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Envelope Errors (caught before any crypto)                        │
//! │  │   ├── InvalidEnvelope       - Missing/malformed/implausible field   │
//! │  │   └── InvalidFilename       - Empty name on the seal side           │
//! │  │                                                                      │
//! │  ├── Crypto Errors (open side: security events)                        │
//! │  │   ├── KeyUnwrapFailed       - RSA-OAEP key recovery failed          │
//! │  │   ├── AuthenticationFailed  - AES-GCM tag mismatch                  │
//! │  │   └── SignatureInvalid      - RSA-PSS signature rejected            │
//! │  │                                                                      │
//! │  ├── Crypto Errors (seal side: operational)                            │
//! │  │   ├── EncryptionFailed      - AES-GCM encryption failed             │
//! │  │   ├── KeyWrapFailed         - RSA-OAEP wrapping failed              │
//! │  │   └── SigningFailed         - RSA-PSS signing failed                │
//! │  │                                                                      │
//! │  ├── Key Errors                                                        │
//! │  │   ├── KeyLoadFailed         - Key material unavailable/unparsable   │
//! │  │   ├── KeyGenerationFailed   - RSA key generation failed             │
//! │  │   └── KeysExist             - Refusing to overwrite key files       │
//! │  │                                                                      │
//! │  └── Storage Errors                                                    │
//! │      ├── EnvelopeNotFound      - No envelope with that id              │
//! │      ├── BlobMissing           - Envelope present, ciphertext gone     │
//! │      ├── StorageReadError      - Failed to read from storage           │
//! │      └── StorageWriteError     - Failed to write to storage            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Messages
//!
//! The three open-side crypto errors carry no detail. Every underlying
//! primitive error collapses into one fixed message per kind, so a caller
//! cannot tell a bad key from a bad tag or a bad padding block.

use thiserror::Error;

/// Result type alias for Coffer Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Coffer Core
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Envelope Errors (100-199)
    // ========================================================================

    /// Envelope text is malformed, a required field is missing, or a field
    /// has an implausible length
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// A file to be sealed has no usable name
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // ========================================================================
    // Open-side Crypto Errors (200-299)
    // ========================================================================

    /// The wrapped symmetric key could not be recovered
    #[error("Failed to unwrap the file key")]
    KeyUnwrapFailed,

    /// The ciphertext, nonce, tag or key does not authenticate
    #[error("Decryption failed: data is corrupt or has been tampered with")]
    AuthenticationFailed,

    /// The signature does not validate against the recovered content
    #[error("Signature verification failed")]
    SignatureInvalid,

    // ========================================================================
    // Seal-side Crypto Errors (300-399)
    // ========================================================================

    /// Symmetric encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrapping the symmetric key failed
    #[error("Key wrapping failed: {0}")]
    KeyWrapFailed(String),

    /// Producing the signature failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    // ========================================================================
    // Key Errors (400-499)
    // ========================================================================

    /// Key material is missing, unreadable, or not a usable RSA key
    #[error("Failed to load key: {0}")]
    KeyLoadFailed(String),

    /// Key pair generation failed
    #[error("Failed to generate key pair: {0}")]
    KeyGenerationFailed(String),

    /// Key files already exist and overwriting was not requested
    #[error("Key files already exist: {0}")]
    KeysExist(String),

    // ========================================================================
    // Storage Errors (500-599)
    // ========================================================================

    /// No envelope stored under this id
    #[error("Envelope not found: {0}")]
    EnvelopeNotFound(String),

    /// The envelope exists but its ciphertext blob does not
    #[error("Missing data file for envelope: {0}")]
    BlobMissing(String),

    /// Failed to read from storage
    #[error("Failed to read from storage: {0}")]
    StorageReadError(String),

    /// Failed to write to storage
    #[error("Failed to write to storage: {0}")]
    StorageWriteError(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 100-199: Envelope format
    /// - 200-299: Open-side crypto (security events)
    /// - 300-399: Seal-side crypto
    /// - 400-499: Keys
    /// - 500-599: Storage
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Envelope (100-199)
            Error::InvalidEnvelope(_) => 100,
            Error::InvalidFilename(_) => 101,

            // Open-side crypto (200-299)
            Error::KeyUnwrapFailed => 200,
            Error::AuthenticationFailed => 201,
            Error::SignatureInvalid => 202,

            // Seal-side crypto (300-399)
            Error::EncryptionFailed(_) => 300,
            Error::KeyWrapFailed(_) => 301,
            Error::SigningFailed(_) => 302,

            // Keys (400-499)
            Error::KeyLoadFailed(_) => 400,
            Error::KeyGenerationFailed(_) => 401,
            Error::KeysExist(_) => 402,

            // Storage (500-599)
            Error::EnvelopeNotFound(_) => 500,
            Error::BlobMissing(_) => 501,
            Error::StorageReadError(_) => 502,
            Error::StorageWriteError(_) => 503,

            // Internal (900-999)
            Error::ConfigError(_) => 900,
            Error::SerializationError(_) => 901,
        }
    }

    /// Check if this error should be surfaced as a security event
    ///
    /// These indicate tampering, forgery, or the wrong key rather than an
    /// operational problem, and callers must not treat them like a missing
    /// file or a bad config value.
    pub fn is_security_event(&self) -> bool {
        matches!(
            self,
            Error::KeyUnwrapFailed | Error::AuthenticationFailed | Error::SignatureInvalid
        )
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StorageReadError(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
