//! Backup sidecars and atomic file replacement
//!
//! A backup lives next to its target as `<target><suffix>`. Its presence is
//! the only record that a target has been overwritten, so it is written once
//! and never replaced while it exists.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Sidecar path for a target, e.g. `src/index.css` -> `src/index.css.backup`
pub fn backup_path(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Copy `from` over `to` through a temporary file in the destination
/// directory, so `to` holds either the old or the new content, never a mix.
///
/// When `to` is a symlink the file it points at is replaced and the link is
/// left in place. A dangling link fails with a `resolve` error.
pub fn replace_file(from: &Path, to: &Path) -> Result<()> {
    let data = fs::read(from).map_err(|e| Error::fs("read", from, e))?;
    let permissions = fs::metadata(from)
        .map_err(|e| Error::fs("stat", from, e))?
        .permissions();

    let resolved;
    let to = match fs::symlink_metadata(to) {
        Ok(meta) if meta.file_type().is_symlink() => {
            resolved = fs::canonicalize(to).map_err(|e| Error::fs("resolve", to, e))?;
            debug!("Following symlink {} -> {}", to.display(), resolved.display());
            resolved.as_path()
        }
        _ => to,
    };

    let dir = match to.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| Error::fs("create temporary file in", dir, e))?;
    tmp.write_all(&data)
        .map_err(|e| Error::fs("write", tmp.path(), e))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| Error::fs("set permissions on", tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::fs("sync", tmp.path(), e))?;
    tmp.persist(to)
        .map_err(|e| Error::fs("replace", to, e.error))?;

    debug!("Copied {} -> {}", from.display(), to.display());
    Ok(())
}

/// Back up `target` unless a backup already exists.
///
/// Returns the backup path when one was created by this call.
pub fn ensure_backup(target: &Path, suffix: &str) -> Result<Option<PathBuf>> {
    let backup = backup_path(target, suffix);
    if backup.exists() {
        debug!("Keeping existing backup {}", backup.display());
        return Ok(None);
    }
    if !target.exists() {
        return Err(Error::fs(
            "back up",
            target,
            std::io::Error::new(std::io::ErrorKind::NotFound, "target does not exist"),
        ));
    }
    replace_file(target, &backup)?;
    Ok(Some(backup))
}

/// Copy the backup of `target` back over it.
///
/// Returns `false` without touching anything when there is no backup.
pub fn restore_backup(target: &Path, suffix: &str) -> Result<bool> {
    let backup = backup_path(target, suffix);
    if !backup.exists() {
        return Ok(false);
    }
    replace_file(&backup, target)?;
    Ok(true)
}

pub fn has_backup(target: &Path, suffix: &str) -> bool {
    backup_path(target, suffix).exists()
}

/// SHA-256 of a file's content, hex encoded
pub fn sha256_file(path: &Path) -> Result<String> {
    let data = fs::read(path).map_err(|e| Error::fs("read", path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}
