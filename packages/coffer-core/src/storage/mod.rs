//! # Envelope Storage
//!
//! A flat directory of sealed files. Each one is a pair sharing a stem:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       STORAGE LAYOUT                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  storage/encrypted_files/                                              │
//! │  ├── report.pdf.1717171717.json     envelope (structured text)         │
//! │  ├── report.pdf.1717171717.data     ciphertext blob                    │
//! │  ├── report.pdf.1717171717-1.json   same name, same second             │
//! │  └── report.pdf.1717171717-1.data                                      │
//! │                                                                         │
//! │  put():  .data first, then .json   (each via temp file + rename)       │
//! │  list(): .json entries only                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because the envelope is the last file to appear and listing only looks
//! at envelopes, a listed id always has its blob unless something outside
//! the store deleted it. That case is reported as `BlobMissing`.

mod atomic;
mod id;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::envelope::{self, Envelope, Sealed};
use crate::error::{Error, Result};

pub use atomic::{write_atomic, write_new};
pub use id::{safe_file_name, EnvelopeId, BLOB_EXT, ENVELOPE_EXT};

const FILE_MODE: u32 = 0o600;

type WriteFn = fn(&Path, &[u8], u32) -> Result<bool>;

/// Upper bound on `-N` suffixes tried for one stem
const MAX_COLLISIONS: usize = 10_000;

/// Directory-backed envelope store
#[derive(Debug, Clone)]
pub struct EnvelopeStore {
    root: PathBuf,
}

impl EnvelopeStore {
    /// Open a store rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an envelope and its blob under a fresh id
    pub fn put(&self, sealed: &Sealed) -> Result<EnvelopeId> {
        let text = envelope::encode(&sealed.envelope)?;
        let base = format!(
            "{}.{}",
            safe_file_name(&sealed.envelope.original_filename),
            sealed.envelope.timestamp
        );

        for n in 0..MAX_COLLISIONS {
            let stem = if n == 0 { base.clone() } else { format!("{}-{}", base, n) };
            let id = EnvelopeId::from_stem(stem);

            let envelope_path = self.root.join(id.envelope_file());
            if envelope_path.exists() {
                continue;
            }
            if !self.commit(&id, &sealed.ciphertext, text.as_bytes(), write_new)? {
                continue;
            }

            tracing::debug!(id = %id, size = sealed.ciphertext.len(), "Stored envelope");
            return Ok(id);
        }

        Err(Error::StorageWriteError(format!(
            "no free id for {} after {} attempts",
            base, MAX_COLLISIONS
        )))
    }

    /// Write the blob, then the envelope; `Ok(false)` if either name is taken
    ///
    /// The blob is removed again whenever the envelope does not land.
    fn commit(&self, id: &EnvelopeId, blob: &[u8], text: &[u8], write: WriteFn) -> Result<bool> {
        let blob_path = self.root.join(id.blob_file());
        if !write(&blob_path, blob, FILE_MODE)? {
            return Ok(false);
        }
        match write(&self.root.join(id.envelope_file()), text, FILE_MODE) {
            Ok(true) => Ok(true),
            other => {
                let _ = std::fs::remove_file(&blob_path);
                other
            }
        }
    }

    /// Load an envelope and its blob
    ///
    /// ## Errors
    ///
    /// - `EnvelopeNotFound`: no `<id>.json`
    /// - `InvalidEnvelope`: the envelope text does not decode
    /// - `BlobMissing`: the envelope exists but `<id>.data` does not
    pub fn get(&self, id: &EnvelopeId) -> Result<Sealed> {
        let envelope = self.envelope(id)?;

        let ciphertext = match std::fs::read(self.root.join(id.blob_file())) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::BlobMissing(id.to_string()))
            }
            Err(e) => return Err(read_error(id, e)),
        };

        Ok(Sealed { envelope, ciphertext })
    }

    /// Load only the envelope, without its blob
    pub fn envelope(&self, id: &EnvelopeId) -> Result<Envelope> {
        let text = match std::fs::read_to_string(self.root.join(id.envelope_file())) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::EnvelopeNotFound(id.to_string()))
            }
            Err(e) => return Err(read_error(id, e)),
        };
        envelope::decode(&text)
    }

    /// All stored ids, sorted; an absent directory is an empty store
    pub fn list(&self) -> Result<Vec<EnvelopeId>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::StorageReadError(format!(
                    "{}: {}",
                    self.root.display(),
                    e
                )))
            }
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(stem) = name.strip_suffix(".json") else { continue };
            if EnvelopeId::is_valid_stem(stem) {
                ids.push(EnvelopeId::from_stem(stem.to_string()));
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Delete an envelope and its blob
    pub fn remove(&self, id: &EnvelopeId) -> Result<()> {
        match std::fs::remove_file(self.root.join(id.envelope_file())) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::EnvelopeNotFound(id.to_string()))
            }
            Err(e) => return Err(Error::StorageWriteError(format!("{}: {}", id, e))),
        }
        match std::fs::remove_file(self.root.join(id.blob_file())) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(Error::StorageWriteError(format!("{}: {}", id, e))),
        }
        tracing::debug!(id = %id, "Removed envelope");
        Ok(())
    }
}

fn read_error(id: &EnvelopeId, err: std::io::Error) -> Error {
    Error::StorageReadError(format!("{}: {}", id, err))
}

// ============================================================================
// TESTS
// ============================================================================
