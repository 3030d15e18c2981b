//! Atomic file writes.
//!
//! Content goes to `.{filename}.tmp` in the target's directory, is synced to
//! disk, gets its final permissions and is then renamed over the target. A
//! crash leaves at most the temp file behind, never a partial target.

use crate::error::{ClError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write `content` to `path`, creating parent directories.
///
/// With `mode` set (unix only), the permissions are applied to the temp file
/// before the rename, so the target is never visible without them.
pub fn atomic_write(path: &Path, content: &[u8], mode: Option<u32>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ClError::UserError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    if let Err(e) = write_and_sync(&temp_path, content, mode) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ClError::UserError(format!("failed to replace '{}': {}", path.display(), e))
    })?;

    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
    Ok(())
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ClError::UserError(format!("invalid file path '{}'", target.display())))?;
    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8], mode: Option<u32>) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        ClError::UserError(format!("failed to create '{}': {}", path.display(), e))
    })?;
    file.write_all(content)
        .map_err(|e| ClError::UserError(format!("failed to write '{}': {}", path.display(), e)))?;
    if let Some(mode) = mode {
        set_mode(&file, mode)?;
    }
    file.sync_all()
        .map_err(|e| ClError::UserError(format!("failed to sync '{}': {}", path.display(), e)))?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(file: &File, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_file: &File, _mode: u32) -> Result<()> {
    Ok(())
}
