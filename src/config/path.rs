//! Path resolution helpers for preferences, catalogs, and export roots.
//!
//! Supports absolute paths, paths relative to a base directory, and "~" home
//! directory expansion.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{CxError, Result};

/// Folder under the home directory that holds preferences and exports.
pub const APP_DIR_NAME: &str = "CheatCreator";

/// Preferences file name inside [`app_dir`].
pub const PREFS_FILE_NAME: &str = "prefs.json";

/// Optional user catalog file name inside [`app_dir`].
pub const CATALOG_FILE_NAME: &str = "profiles.json";

const ANDROID_STORAGE_ROOT: &str = "/storage/emulated/0";

/// Resolve a user-supplied path.
///
/// Resolution rules:
/// 1. Paths starting with `~`: expanded to home directory
/// 2. Absolute paths: used as-is
/// 3. Relative paths: resolved relative to `base_dir`
pub fn resolve_path(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    trace!(
        path = %path.display(),
        base_dir = %base_dir.display(),
        "Resolving path"
    );

    let path_str = path.to_string_lossy();

    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() {
            home
        } else {
            home.join(rest)
        };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let resolved = base_dir.join(path);
    debug!(
        original = %path.display(),
        resolved = %resolved.display(),
        "Resolved relative path"
    );
    Ok(resolved)
}

/// Expand a leading `~` without touching anything else.
///
/// Used for export roots typed by the user; if the home directory is unknown
/// the path is returned unchanged.
pub fn expand_tilde(raw: &str) -> PathBuf {
    let path = Path::new(raw.trim());
    resolve_path(path, Path::new("")).unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(CxError::HomeDirUnavailable)
}

/// `~/CheatCreator`, where preferences live.
pub fn app_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(APP_DIR_NAME))
}

/// Default preferences file location.
pub fn default_prefs_path() -> Result<PathBuf> {
    Ok(app_dir()?.join(PREFS_FILE_NAME))
}

/// Default user catalog location.
pub fn default_catalog_path() -> Result<PathBuf> {
    Ok(app_dir()?.join(CATALOG_FILE_NAME))
}

/// Platform default export root.
///
/// Android shared storage wins when present, then `~/Documents`, then the
/// home directory itself. Falls back to a relative folder when no home
/// directory can be determined.
pub fn default_export_root() -> PathBuf {
    let android = Path::new(ANDROID_STORAGE_ROOT);
    if android.is_dir() {
        return android.join(APP_DIR_NAME);
    }
    match home_dir() {
        Ok(home) => {
            let docs = home.join("Documents");
            if docs.is_dir() {
                docs.join(APP_DIR_NAME)
            } else {
                home.join(APP_DIR_NAME)
            }
        }
        Err(_) => PathBuf::from(APP_DIR_NAME),
    }
}
