//! Vault configuration.
//!
//! Loaded from an optional TOML file. Every field has a default, so an
//! empty file (or no file at all) yields the standard layout:
//!
//! ```toml
//! storage_dir = "storage/encrypted_files"
//! public_key_path = "storage/server_public_key.pem"
//! private_key_path = "storage/server_private_key.pem"
//! key_bits = 2048
//! audit_log_path = "storage/logs/audit.log"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS};
use crate::error::{Error, Result};

/// Default envelope store directory
pub const DEFAULT_STORAGE_DIR: &str = "storage/encrypted_files";

/// Default public key location
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "storage/server_public_key.pem";

/// Default private key location
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "storage/server_private_key.pem";

/// Default audit trail file
pub const DEFAULT_AUDIT_LOG_PATH: &str = "storage/logs/audit.log";

/// Where the vault keeps its keys and sealed files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultConfig {
    /// Directory holding `<id>.json` / `<id>.data` pairs
    pub storage_dir: PathBuf,
    /// SPKI PEM public key
    pub public_key_path: PathBuf,
    /// PKCS#8 PEM private key
    pub private_key_path: PathBuf,
    /// Modulus size used by key generation
    pub key_bits: usize,
    /// File receiving `coffer::audit` events
    pub audit_log_path: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            public_key_path: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            private_key_path: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
            key_bits: DEFAULT_KEY_BITS,
            audit_log_path: PathBuf::from(DEFAULT_AUDIT_LOG_PATH),
        }
    }
}

impl VaultConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "Loaded vault config");
        Ok(config)
    }

    /// Check the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.key_bits < MIN_KEY_BITS {
            return Err(Error::ConfigError(format!(
                "key_bits must be at least {}, got {}",
                MIN_KEY_BITS, self.key_bits
            )));
        }
        if self.key_bits > MAX_KEY_BITS {
            return Err(Error::ConfigError(format!(
                "key_bits must be at most {}, got {}",
                MAX_KEY_BITS, self.key_bits
            )));
        }
        if self.audit_log_path.file_name().is_none() {
            return Err(Error::ConfigError(format!(
                "audit_log_path {} does not name a file",
                self.audit_log_path.display()
            )));
        }
        if self.public_key_path == self.private_key_path {
            return Err(Error::ConfigError(
                "public and private key paths must differ".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VaultConfig::default();
        assert_eq!(config.storage_dir, PathBuf::from("storage/encrypted_files"));
        assert_eq!(config.public_key_path, PathBuf::from("storage/server_public_key.pem"));
        assert_eq!(config.private_key_path, PathBuf::from("storage/server_private_key.pem"));
        assert_eq!(config.key_bits, 2048);
        assert_eq!(config.audit_log_path, PathBuf::from("storage/logs/audit.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(VaultConfig::from_toml_str("").unwrap(), VaultConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = VaultConfig::from_toml_str("storage_dir = \"/srv/vault\"\nkey_bits = 3072\n").unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/srv/vault"));
        assert_eq!(config.key_bits, 3072);
        assert_eq!(config.public_key_path, PathBuf::from(DEFAULT_PUBLIC_KEY_PATH));
    }

    #[test]
    fn test_small_key_rejected() {
        let result = VaultConfig::from_toml_str("key_bits = 1024");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_audit_log_path() {
        let config = VaultConfig::from_toml_str("audit_log_path = \"/var/log/coffer.log\"").unwrap();
        assert_eq!(config.audit_log_path, PathBuf::from("/var/log/coffer.log"));

        let result = VaultConfig::from_toml_str("audit_log_path = \"logs/..\"");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_same_key_paths_rejected() {
        let config = VaultConfig {
            public_key_path: "k.pem".into(),
            private_key_path: "k.pem".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_unknown_field_and_bad_syntax_rejected() {
        assert!(matches!(
            VaultConfig::from_toml_str("storage = \"x\""),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            VaultConfig::from_toml_str("key_bits = "),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coffer.toml");
        std::fs::write(&path, "storage_dir = \"files\"\n").unwrap();

        let config = VaultConfig::load(&path).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("files"));

        let missing = VaultConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(Error::ConfigError(_))));
    }
}
