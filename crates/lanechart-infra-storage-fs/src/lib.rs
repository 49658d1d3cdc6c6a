mod json;

use lanechart_ports::project::{ProjectSnapshot, PROJECT_SCHEMA_VERSION};
use lanechart_ports::storage::{EditorSettingsDto, StorageError, StoragePort};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const SETTINGS_FILE: &str = "settings.json";
pub const PROJECT_EXTENSION: &str = "json";

/// Settings under the user's config dir; projects wherever the caller points.
pub struct FsStorage {
    base_dir: PathBuf,
}

impl FsStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_base_dir() -> Result<PathBuf, StorageError> {
        let base = dirs_next::config_dir()
            .ok_or_else(|| StorageError::Io("config dir not found".to_string()))?;
        Ok(base.join("Lanechart"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn settings_path(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE)
    }
}

impl Default for FsStorage {
    fn default() -> Self {
        let base_dir = Self::default_base_dir().unwrap_or_else(|err| {
            warn!(error = %err, "falling back to working directory for settings");
            PathBuf::from(".")
        });
        Self { base_dir }
    }
}

/// Appends the project extension when the export path has none.
pub fn project_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(PROJECT_EXTENSION)
    }
}

impl StoragePort for FsStorage {
    fn load_settings(&self) -> Result<EditorSettingsDto, StorageError> {
        let path = self.settings_path();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file yet");
            return Ok(EditorSettingsDto::default());
        }
        json::read(&path)
    }

    fn save_settings(&self, s: &EditorSettingsDto) -> Result<(), StorageError> {
        json::write(&self.settings_path(), s)
    }

    fn load_project(&self, path: &Path) -> Result<ProjectSnapshot, StorageError> {
        let project: ProjectSnapshot = json::read(path)?;
        if project.version != PROJECT_SCHEMA_VERSION {
            warn!(
                version = %project.version,
                expected = PROJECT_SCHEMA_VERSION,
                "project version differs, loading anyway"
            );
        }
        info!(
            path = %path.display(),
            lanes = project.lanes.len(),
            events = project.events.len(),
            "project loaded"
        );
        Ok(project)
    }

    fn save_project(&self, path: &Path, project: &ProjectSnapshot) -> Result<(), StorageError> {
        let path = project_path(path);
        json::write(&path, project)?;
        info!(path = %path.display(), events = project.events.len(), "project saved");
        Ok(())
    }
}
