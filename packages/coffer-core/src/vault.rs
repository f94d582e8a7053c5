//! # Vault Service
//!
//! Ties the key store, the envelope pipelines, and the envelope store into
//! the two operations a user performs, with an audit event for every
//! outcome.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          VAULT FLOWS                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  seal_file(name, bytes)                                                │
//! │    reject empty name ─► load keys ─► seal ─► store.put ─► Sealed       │
//! │                                                                         │
//! │  open_file(id)                                                         │
//! │    parse id ─► store.get (decode) ─► load keys ─► open ─► Opened       │
//! │                                                                         │
//! │  Keys are read from disk on every call and dropped at the end.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::audit::SecurityEvent;
use crate::config::VaultConfig;
use crate::envelope::{self, Envelope, Opened};
use crate::error::{Error, Result};
use crate::keystore::KeyStore;
use crate::storage::{EnvelopeId, EnvelopeStore};

/// Sealing and opening files against one key pair and one store
#[derive(Debug, Clone)]
pub struct Vault {
    keys: KeyStore,
    store: EnvelopeStore,
}

impl Vault {
    /// Create a vault over an existing key store and envelope store
    pub fn new(keys: KeyStore, store: EnvelopeStore) -> Self {
        Self { keys, store }
    }

    /// Create a vault from configured paths
    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(
            KeyStore::from_config(config),
            EnvelopeStore::new(&config.storage_dir),
        )
    }

    /// The key store
    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// The envelope store
    pub fn store(&self) -> &EnvelopeStore {
        &self.store
    }

    /// Seal `bytes` under `filename` and store the result
    pub fn seal_file(&self, filename: &str, bytes: &[u8]) -> Result<EnvelopeId> {
        if filename.trim().is_empty() {
            SecurityEvent::EmptyFilename.emit();
            return Err(Error::InvalidFilename("filename is empty".into()));
        }

        match self.seal_and_store(filename, bytes) {
            Ok(id) => {
                SecurityEvent::Sealed { id: id.to_string(), size: bytes.len() }.emit();
                Ok(id)
            }
            Err(e) => {
                SecurityEvent::from_seal_error(&e).emit();
                Err(e)
            }
        }
    }

    fn seal_and_store(&self, filename: &str, bytes: &[u8]) -> Result<EnvelopeId> {
        let keys = self.keys.load_key_pair()?;
        let sealed = envelope::seal(bytes, filename, &keys.public, &keys.private)?;
        drop(keys);
        self.store.put(&sealed)
    }

    /// Open, decrypt, and verify a stored file
    ///
    /// Plaintext is returned only when the signature verifies. Tampering,
    /// forgery, and wrong keys surface as errors for which
    /// [`Error::is_security_event`] is true.
    pub fn open_file(&self, id: &str) -> Result<Opened> {
        let result = id
            .parse::<EnvelopeId>()
            .and_then(|parsed| self.load_and_open(&parsed));

        match result {
            Ok(opened) => {
                SecurityEvent::Opened { id: id.to_string(), size: opened.plaintext.len() }.emit();
                Ok(opened)
            }
            Err(e) => {
                SecurityEvent::from_open_error(id, &e).emit();
                Err(e)
            }
        }
    }

    fn load_and_open(&self, id: &EnvelopeId) -> Result<Opened> {
        let sealed = self.store.get(id)?;
        let keys = self.keys.load_key_pair()?;
        envelope::open(&sealed.envelope, &sealed.ciphertext, &keys.public, &keys.private)
    }

    /// Stored ids, sorted
    pub fn list(&self) -> Result<Vec<EnvelopeId>> {
        self.store.list()
    }

    /// Envelope metadata for one id; no key material is touched
    pub fn describe(&self, id: &EnvelopeId) -> Result<Envelope> {
        self.store.envelope(id)
    }
}

// ============================================================================
// TESTS
// ============================================================================
