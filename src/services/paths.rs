use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

const SAVEDATA_DIR_NAME: &str = "savedata";

fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|p| p.to_path_buf())
}

/// Resolve and create the client's data directory.
///
/// `override_dir` (from `IFA_DATA_DIR`) wins; otherwise `<exe_dir>/savedata`.
pub(crate) fn init_data_dir(override_dir: Option<&Path>) -> Result<PathBuf, String> {
    if let Some(dir) = DATA_DIR.get() {
        return Ok(dir.clone());
    }

    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => exe_dir()
            .ok_or_else(|| "Failed to resolve executable directory".to_string())?
            .join(SAVEDATA_DIR_NAME),
    };

    std::fs::create_dir_all(&dir).map_err(|e| format!("Failed to create data directory: {e}"))?;
    let _ = DATA_DIR.set(dir.clone());
    Ok(dir)
}

pub(crate) fn data_dir_cached() -> Option<PathBuf> {
    DATA_DIR.get().cloned()
}
