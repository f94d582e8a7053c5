//! Coffer CLI
//!
//! Seals files into a local envelope store and opens them again:
//!
//! 1. **keygen**: provision the vault RSA key pair.
//! 2. **seal**: encrypt, sign, and store a file.
//! 3. **open**: decrypt and verify a stored file, writing the plaintext only
//!    if the signature checks out.
//! 4. **list**: show what is in the store.
//!
//! Audit events are copied to `audit_log_path` (default
//! `storage/logs/audit.log`) in addition to stderr.
//!
//! Exit status is 0 on success, 3 when opening fails in a way that points at
//! tampering, forgery, or the wrong key, and 1 for everything else.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use coffer_core::VaultConfig;
use color_eyre::eyre::{Result, WrapErr};

/// Exit status for a detected security failure
const EXIT_SECURITY: u8 = 3;

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "coffer", version, about = "Seal and open files with signed hybrid envelopes")]
struct Args {
    /// TOML configuration file
    #[arg(long, global = true, env = "COFFER_CONFIG")]
    config: Option<PathBuf>,

    /// Envelope store directory
    #[arg(long, global = true, env = "COFFER_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Public key PEM (SPKI)
    #[arg(long, global = true, env = "COFFER_PUBLIC_KEY")]
    public_key: Option<PathBuf>,

    /// Private key PEM (PKCS#8)
    #[arg(long, global = true, env = "COFFER_PRIVATE_KEY")]
    private_key: Option<PathBuf>,

    /// Audit trail file
    #[arg(long, global = true, env = "COFFER_AUDIT_LOG")]
    audit_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the vault key pair
    Keygen {
        /// RSA modulus size in bits (defaults to the configured key_bits)
        #[arg(long)]
        bits: Option<usize>,

        /// Replace existing key files
        #[arg(long)]
        force: bool,
    },

    /// Seal a file into the store and print its id
    Seal {
        /// File to seal
        path: PathBuf,

        /// Name recorded in the envelope (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Open a stored file, verify it, and write the plaintext
    Open {
        /// Envelope id, as printed by `seal` or `list`
        id: String,

        /// Output path (defaults to the original file name in the current
        /// directory)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },

    /// List stored envelopes
    List,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied
    fn vault_config(&self) -> Result<VaultConfig> {
        let mut config = match &self.config {
            Some(path) => VaultConfig::load(path)
                .wrap_err_with(|| format!("loading config {}", path.display()))?,
            None => VaultConfig::default(),
        };

        if let Some(dir) = &self.storage_dir {
            config.storage_dir = dir.clone();
        }
        if let Some(path) = &self.public_key {
            config.public_key_path = path.clone();
        }
        if let Some(path) = &self.private_key {
            config.private_key_path = path.clone();
        }
        if let Some(path) = &self.audit_log {
            config.audit_log_path = path.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

// ── Entry Point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }

    let args = Args::parse();
    let config = args.vault_config();
    let _guard = logging::init(config.as_ref().ok().map(|c| c.audit_log_path.as_path()));

    match config.and_then(|config| run(args.command, &config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            let security = report
                .downcast_ref::<coffer_core::Error>()
                .is_some_and(|e| e.is_security_event());

            if security {
                eprintln!("SECURITY ALERT: {report}");
                ExitCode::from(EXIT_SECURITY)
            } else {
                eprintln!("Error: {report:?}");
                ExitCode::FAILURE
            }
        }
    }
}

fn run(command: Command, config: &VaultConfig) -> Result<()> {
    tracing::debug!(storage_dir = %config.storage_dir.display(), "Using vault");

    match command {
        Command::Keygen { bits, force } => {
            commands::keygen(config, bits.unwrap_or(config.key_bits), force)
        }
        Command::Seal { path, name } => commands::seal(config, &path, name.as_deref()),
        Command::Open { id, out, force } => commands::open(config, &id, out, force),
        Command::List => commands::list(config),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let args = Args::try_parse_from(["coffer", "seal", "report.pdf", "--name", "r.pdf"]).unwrap();
        match args.command {
            Command::Seal { path, name } => {
                assert_eq!(path, PathBuf::from("report.pdf"));
                assert_eq!(name.as_deref(), Some("r.pdf"));
            }
            other => panic!("unexpected command {:?}", other),
        }

        let args = Args::try_parse_from(["coffer", "keygen", "--bits", "3072", "--force"]).unwrap();
        assert!(matches!(args.command, Command::Keygen { bits: Some(3072), force: true }));

        assert!(Args::try_parse_from(["coffer"]).is_err());
        assert!(Args::try_parse_from(["coffer", "open"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("coffer.toml");
        std::fs::write(&file, "storage_dir = \"from-file\"\nkey_bits = 3072\n").unwrap();

        let file = file.to_str().unwrap();
        let args = Args::try_parse_from([
            "coffer",
            "--config",
            file,
            "list",
            "--public-key",
            "other.pem",
            "--audit-log",
            "logs/trail.log",
        ])
        .unwrap();

        let config = args.vault_config().unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("from-file"));
        assert_eq!(config.public_key_path, PathBuf::from("other.pem"));
        assert_eq!(config.key_bits, 3072);
        assert_eq!(config.audit_log_path, PathBuf::from("logs/trail.log"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("coffer.toml");
        std::fs::write(&file, "key_bits = 512\n").unwrap();

        let args =
            Args::try_parse_from(["coffer", "--config", file.to_str().unwrap(), "list"]).unwrap();
        assert!(args.vault_config().is_err());
    }
}
