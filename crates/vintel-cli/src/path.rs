//! Credentials path resolution.
//!
//! The credentials flag historically names a dotfile kept in the user's
//! home directory, so relative paths resolve against home rather than the
//! current directory, and `~/` expands explicitly.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Resolve `path` against `home`: `~/` expands, relative paths are joined.
pub fn resolve_from_home(path: &str, home: &Path) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        return home.join(rest);
    }
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        home.join(path)
    }
}

/// Resolve the credentials flag to an existing file.
pub fn resolve_credentials(path: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let resolved = resolve_from_home(path, &home);
    if !resolved.is_file() {
        bail!("Missing file: {}", resolved.display());
    }
    Ok(resolved)
}
