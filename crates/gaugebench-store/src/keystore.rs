//! Signing key files.
//!
//! A key file holds the 32-byte Ed25519 seed as lowercase hex followed by a
//! newline. Files are created owner-only and are never overwritten.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use gaugebench_core::{Keypair, SigningCapability};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// Generate a new keypair and write its seed to `path`.
///
/// Fails with [`StoreError::AlreadyExists`] if the file exists.
pub fn generate_key_file(path: &Path) -> Result<Keypair> {
    let keypair = Keypair::generate();
    write_key_file(path, &keypair)?;
    Ok(keypair)
}

/// Write `keypair`'s seed to a new file at `path`.
pub fn write_key_file(path: &Path, keypair: &Keypair) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            StoreError::AlreadyExists(path.to_path_buf())
        } else {
            StoreError::io(path, e)
        }
    })?;
    writeln!(file, "{}", hex::encode(keypair.seed())).map_err(|e| StoreError::io(path, e))?;
    file.sync_all().map_err(|e| StoreError::io(path, e))?;

    debug!(path = %path.display(), public_key = %keypair.public_key().to_base64(), "wrote key file");
    Ok(())
}

/// Load a keypair from a key file.
pub fn load_key_file(path: &Path) -> Result<Keypair> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let bytes = hex::decode(text.trim())
        .map_err(|e| StoreError::Key(format!("{}: {e}", path.display())))?;
    let seed: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
        StoreError::Key(format!(
            "{}: expected 32-byte seed, got {} bytes",
            path.display(),
            b.len()
        ))
    })?;
    Ok(Keypair::from_seed(&seed))
}

/// Decide the signing capability for a producer.
///
/// A missing or unusable key degrades to [`SigningCapability::Unavailable`];
/// the run still gets an unsigned receipt.
pub fn resolve_signing(path: Option<&Path>) -> SigningCapability {
    let Some(path) = path else {
        return SigningCapability::unavailable("no signing key configured");
    };
    match load_key_file(path) {
        Ok(keypair) => SigningCapability::Available(keypair),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "signing key unavailable, producing unsigned receipt");
            SigningCapability::unavailable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys/signing.key");

        let generated = generate_key_file(&path).unwrap();
        let loaded = load_key_file(&path).unwrap();
        assert_eq!(generated.public_key(), loaded.public_key());

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.len(), 65);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signing.key");
        let first = generate_key_file(&path).unwrap();

        assert!(matches!(
            generate_key_file(&path),
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(load_key_file(&path).unwrap().public_key(), first.public_key());
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signing.key");
        generate_key_file(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.key");
        fs::write(&path, "zz-not-hex\n").unwrap();
        assert!(matches!(load_key_file(&path), Err(StoreError::Key(_))));

        fs::write(&path, "abcd\n").unwrap();
        assert!(matches!(load_key_file(&path), Err(StoreError::Key(_))));
    }

    #[test]
    fn test_resolve_signing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signing.key");

        assert!(!resolve_signing(None).is_available());
        assert!(!resolve_signing(Some(&path)).is_available());

        write_key_file(&path, &Keypair::from_seed(&[8; 32])).unwrap();
        let cap = resolve_signing(Some(&path));
        assert!(cap.is_available());
        assert_eq!(
            cap.signer().unwrap().public_key(),
            Keypair::from_seed(&[8; 32]).public_key()
        );
    }
}
