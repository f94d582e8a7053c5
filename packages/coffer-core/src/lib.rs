//! # Coffer Core
//!
//! Hybrid envelope encryption for files at rest: each file is encrypted
//! under a fresh AES-256-GCM key, that key is wrapped with RSA-OAEP, and
//! the plaintext digest is signed with RSA-PSS.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         COFFER CORE MODULES                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │                           Vault                                   │ │
//! │  │   seal_file / open_file / list        ──► audit (coffer::audit)   │ │
//! │  └───────┬───────────────────────┬───────────────────────┬───────────┘ │
//! │          │                       │                       │             │
//! │  ┌───────▼──────┐        ┌───────▼───────┐       ┌───────▼────────┐    │
//! │  │   KeyStore   │        │   Envelope    │       │ EnvelopeStore  │    │
//! │  │              │        │               │       │                │    │
//! │  │ - PEM load   │        │ - seal        │       │ - put / get    │    │
//! │  │ - keygen     │        │ - open        │       │ - list         │    │
//! │  │              │        │ - codec       │       │ - remove       │    │
//! │  └───────┬──────┘        └───────┬───────┘       └────────────────┘    │
//! │          │                       │                                     │
//! │  ┌───────▼───────────────────────▼───────────────────────────────────┐ │
//! │  │                           Crypto                                  │ │
//! │  │   AES-256-GCM  │  RSA-OAEP wrap  │  RSA-PSS sign  │  SHA-256       │ │
//! │  └───────────────────────────────────────────────────────────────────┘ │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error type and stable error codes
//! - [`crypto`] - Primitives (cipher, key wrap, signatures, keys)
//! - [`envelope`] - Envelope record, seal and open pipelines, text codec
//! - [`keystore`] - Key pair on disk
//! - [`storage`] - Envelope/blob pairs on disk
//! - [`audit`] - Security audit events
//! - [`vault`] - The user-facing seal/open service
//! - [`config`] - Vault configuration
//!
//! ## Security Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SECURITY LAYERS                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Layer 1: Confidentiality + Integrity (AES-256-GCM)                    │
//! │  ───────────────────────────────────────────────────                    │
//! │  Any change to ciphertext, nonce, or tag fails authentication.         │
//! │                                                                         │
//! │  Layer 2: Key Protection (RSA-OAEP)                                    │
//! │  ──────────────────────────────────                                     │
//! │  The file key exists in the clear only in memory, and only during      │
//! │  one seal or open call.                                                │
//! │                                                                         │
//! │  Layer 3: Origin Authentication (RSA-PSS over SHA-256(plaintext))      │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │  Content that decrypts but was not signed by the vault key is never   │
//! │  released.                                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod audit;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod keystore;
pub mod storage;
/// Unix-second timestamps for envelopes.
pub mod time;
pub mod vault;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::VaultConfig;
pub use crypto::{KeyPair, PrivateKey, PublicKey};
pub use envelope::{open, open_encoded, seal, Envelope, Opened, Sealed};
pub use error::{Error, Result};
pub use keystore::KeyStore;
pub use storage::{EnvelopeId, EnvelopeStore};
pub use vault::Vault;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Coffer Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================
