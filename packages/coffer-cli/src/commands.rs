//! Subcommand implementations.

use std::path::{Path, PathBuf};

use coffer_core::storage::{safe_file_name, write_atomic, write_new};
use coffer_core::time::format_timestamp;
use coffer_core::{KeyStore, Vault, VaultConfig};
use color_eyre::eyre::{bail, Result, WrapErr};

/// Permission bits for recovered plaintext
const PLAINTEXT_MODE: u32 = 0o600;

pub fn keygen(config: &VaultConfig, bits: usize, force: bool) -> Result<()> {
    let key_store = KeyStore::from_config(config);
    let keys = key_store.generate(bits, force)?;

    println!("Public key:  {}", key_store.public_key_path().display());
    println!("Private key: {}", key_store.private_key_path().display());
    println!("Fingerprint: SHA256:{}", keys.public.fingerprint()?);
    Ok(())
}

pub fn seal(config: &VaultConfig, path: &Path, name: Option<&str>) -> Result<()> {
    let bytes = std::fs::read(path).wrap_err_with(|| format!("reading {}", path.display()))?;

    let name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    // Errors come back bare so the exit-status check can see their kind.
    let id = Vault::from_config(config).seal_file(&name, &bytes)?;
    println!("{id}");
    Ok(())
}

pub fn open(config: &VaultConfig, id: &str, out: Option<PathBuf>, force: bool) -> Result<()> {
    let opened = Vault::from_config(config).open_file(id)?;

    let out = out.unwrap_or_else(|| PathBuf::from(safe_file_name(&opened.filename)));
    let plaintext = opened.plaintext.as_slice();
    let written = if force {
        write_atomic(&out, plaintext, PLAINTEXT_MODE).map(|()| true)
    } else {
        write_new(&out, plaintext, PLAINTEXT_MODE)
    };
    if !written.wrap_err_with(|| format!("writing {}", out.display()))? {
        bail!("{} already exists (use --force to overwrite)", out.display());
    }

    tracing::info!(
        id,
        out = %out.display(),
        size = opened.plaintext.len(),
        "Signature verified, file decrypted"
    );
    println!("{}", out.display());
    Ok(())
}

pub fn list(config: &VaultConfig) -> Result<()> {
    let vault = Vault::from_config(config);
    let ids = vault.list()?;

    if ids.is_empty() {
        println!("No sealed files in {}", vault.store().root().display());
        return Ok(());
    }

    for id in ids {
        match vault.describe(&id) {
            Ok(envelope) => println!(
                "{}\t{}\t{}",
                id,
                envelope.original_filename,
                format_timestamp(envelope.timestamp)
            ),
            Err(e) => println!("{}\t<unreadable: {}>", id, e),
        }
    }
    Ok(())
}
