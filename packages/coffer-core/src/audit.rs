//! # Security Audit Events
//!
//! Every vault outcome is reported as a [`SecurityEvent`] on the
//! `coffer::audit` tracing target, so an operator can route the audit trail
//! to its own sink with a target filter.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         AUDIT EVENTS                                    │
//! ├──────────────────────┬───────┬──────────┬───────────────────────────────┤
//! │ Event                │ Level │ security │ Cause                         │
//! ├──────────────────────┼───────┼──────────┼───────────────────────────────┤
//! │ Sealed               │ info  │ false    │ file stored                   │
//! │ Opened               │ info  │ false    │ file verified and released    │
//! │ EmptyFilename        │ warn  │ false    │ seal request without a name   │
//! │ NotFound             │ warn  │ false    │ unknown or invalid id         │
//! │ FormatRejected       │ warn  │ false    │ envelope failed to decode     │
//! │ BlobMissing          │ error │ false    │ envelope without ciphertext   │
//! │ KeyLoadFailed        │ error │ false    │ key files unusable            │
//! │ OperationFailed      │ error │ false    │ any other failure             │
//! │ UnwrapFailed         │ warn  │ true     │ wrong key / tampered key      │
//! │ AuthenticationFailed │ warn  │ true     │ tampered ciphertext/nonce/tag │
//! │ SignatureRejected    │ warn  │ true     │ forged or substituted content │
//! └──────────────────────┴───────┴──────────┴───────────────────────────────┘
//! ```
//!
//! Events never carry key material or plaintext.

use crate::error::Error;

/// Tracing target for audit events
pub const AUDIT_TARGET: &str = "coffer::audit";

/// Which vault operation an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Sealing a file into the store
    Seal,
    /// Opening a stored file
    Open,
}

impl Operation {
    /// Lowercase name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Seal => "seal",
            Operation::Open => "open",
        }
    }
}

/// One auditable outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    /// A file was sealed and stored
    Sealed {
        /// Assigned envelope id
        id: String,
        /// Plaintext size in bytes
        size: usize,
    },
    /// A file was opened and its signature verified
    Opened {
        /// Envelope id
        id: String,
        /// Plaintext size in bytes
        size: usize,
    },
    /// A seal request carried an empty filename
    EmptyFilename,
    /// No envelope under the requested id
    NotFound {
        /// Requested id
        id: String,
    },
    /// The stored envelope did not decode
    FormatRejected {
        /// Envelope id
        id: String,
        /// Decoder message
        reason: String,
    },
    /// The envelope exists but its ciphertext blob does not
    BlobMissing {
        /// Envelope id
        id: String,
    },
    /// Key files could not be loaded
    KeyLoadFailed {
        /// Operation that needed the keys
        operation: Operation,
        /// Loader message
        reason: String,
    },
    /// Any other operational failure
    OperationFailed {
        /// Operation that failed
        operation: Operation,
        /// Error message
        reason: String,
    },
    /// The wrapped file key did not unwrap
    UnwrapFailed {
        /// Envelope id
        id: String,
    },
    /// The ciphertext did not authenticate
    AuthenticationFailed {
        /// Envelope id
        id: String,
    },
    /// The signature did not verify over the decrypted content
    SignatureRejected {
        /// Envelope id
        id: String,
    },
}

impl SecurityEvent {
    /// Classify a failed open of `id`
    pub fn from_open_error(id: &str, err: &Error) -> Self {
        let id = id.to_string();
        match err {
            Error::KeyUnwrapFailed => SecurityEvent::UnwrapFailed { id },
            Error::AuthenticationFailed => SecurityEvent::AuthenticationFailed { id },
            Error::SignatureInvalid => SecurityEvent::SignatureRejected { id },
            Error::InvalidEnvelope(reason) => SecurityEvent::FormatRejected {
                id,
                reason: reason.clone(),
            },
            Error::EnvelopeNotFound(_) => SecurityEvent::NotFound { id },
            Error::BlobMissing(_) => SecurityEvent::BlobMissing { id },
            Error::KeyLoadFailed(reason) => SecurityEvent::KeyLoadFailed {
                operation: Operation::Open,
                reason: reason.clone(),
            },
            other => SecurityEvent::OperationFailed {
                operation: Operation::Open,
                reason: other.to_string(),
            },
        }
    }

    /// Classify a failed seal
    pub fn from_seal_error(err: &Error) -> Self {
        match err {
            Error::KeyLoadFailed(reason) => SecurityEvent::KeyLoadFailed {
                operation: Operation::Seal,
                reason: reason.clone(),
            },
            other => SecurityEvent::OperationFailed {
                operation: Operation::Seal,
                reason: other.to_string(),
            },
        }
    }

    /// Stable event name
    pub fn kind(&self) -> &'static str {
        match self {
            SecurityEvent::Sealed { .. } => "sealed",
            SecurityEvent::Opened { .. } => "opened",
            SecurityEvent::EmptyFilename => "empty_filename",
            SecurityEvent::NotFound { .. } => "not_found",
            SecurityEvent::FormatRejected { .. } => "format_rejected",
            SecurityEvent::BlobMissing { .. } => "blob_missing",
            SecurityEvent::KeyLoadFailed { .. } => "key_load_failed",
            SecurityEvent::OperationFailed { .. } => "operation_failed",
            SecurityEvent::UnwrapFailed { .. } => "unwrap_failed",
            SecurityEvent::AuthenticationFailed { .. } => "authentication_failed",
            SecurityEvent::SignatureRejected { .. } => "signature_rejected",
        }
    }

    /// Whether this event indicates tampering, forgery, or a wrong key
    pub fn is_security(&self) -> bool {
        matches!(
            self,
            SecurityEvent::UnwrapFailed { .. }
                | SecurityEvent::AuthenticationFailed { .. }
                | SecurityEvent::SignatureRejected { .. }
        )
    }

    /// Write the event to the audit target
    pub fn emit(&self) {
        let kind = self.kind();
        let security = self.is_security();
        match self {
            SecurityEvent::Sealed { id, size } => {
                tracing::info!(target: AUDIT_TARGET, event = kind, security, id = id.as_str(), size, "File sealed");
            }
            SecurityEvent::Opened { id, size } => {
                tracing::info!(target: AUDIT_TARGET, event = kind, security, id = id.as_str(), size, "File opened, signature verified");
            }
            SecurityEvent::EmptyFilename => {
                tracing::warn!(target: AUDIT_TARGET, event = kind, security, "Seal attempt with empty filename");
            }
            SecurityEvent::NotFound { id } => {
                tracing::warn!(target: AUDIT_TARGET, event = kind, security, id = id.as_str(), "Open attempt for unknown envelope");
            }
            SecurityEvent::FormatRejected { id, reason } => {
                tracing::warn!(target: AUDIT_TARGET, event = kind, security, id = id.as_str(), reason = reason.as_str(), "Envelope rejected");
            }
            SecurityEvent::BlobMissing { id } => {
                tracing::error!(target: AUDIT_TARGET, event = kind, security, id = id.as_str(), "Missing data file");
            }
            SecurityEvent::KeyLoadFailed { operation, reason } => {
                tracing::error!(target: AUDIT_TARGET, event = kind, security, operation = operation.as_str(), reason = reason.as_str(), "Key load failed");
            }
            SecurityEvent::OperationFailed { operation, reason } => {
                tracing::error!(target: AUDIT_TARGET, event = kind, security, operation = operation.as_str(), reason = reason.as_str(), "Operation failed");
            }
            SecurityEvent::UnwrapFailed { id } => {
                tracing::warn!(target: AUDIT_TARGET, event = kind, security, id = id.as_str(), "VERIFICATION FAILED: file key did not unwrap");
            }
            SecurityEvent::AuthenticationFailed { id } => {
                tracing::warn!(target: AUDIT_TARGET, event = kind, security, id = id.as_str(), "VERIFICATION FAILED: data is corrupt or has been tampered with");
            }
            SecurityEvent::SignatureRejected { id } => {
                tracing::warn!(target: AUDIT_TARGET, event = kind, security, id = id.as_str(), "VERIFICATION FAILED: signature rejected");
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
