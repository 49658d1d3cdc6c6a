use lanechart_ports::storage::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) fn read<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let data = fs::read(path).map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&data).map_err(|e| StorageError::Serde(format!("{}: {e}", path.display())))
}

/// Writes through a sibling temp file so a crash never leaves a truncated document.
pub(crate) fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
    }
    let data = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serde(e.to_string()))?;
    let tmp = temp_path(path);
    fs::write(&tmp, data).map_err(|e| StorageError::Io(format!("{}: {e}", tmp.display())))?;
    fs::rename(&tmp, path).map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
