use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::slide::Slide;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize presentation: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write presentation: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read project file: {0}")]
    ReadError(String),

    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Store rejected the request: {0}")]
    Rejected(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Body of `GET /projects/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project: Project,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub project_name: Option<String>,
    /// Fields the editor does not interpret but must not drop
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The remote project API the editor saves into.
///
/// `save_slides` has replace-all semantics: the store keeps exactly the
/// slides it was handed, last writer wins.
pub trait SlideStore {
    fn save_slides(&mut self, project_id: &str, slides: &[Slide]) -> PersistenceResult<()>;

    fn load_project(&mut self, project_id: &str) -> PersistenceResult<ProjectRecord>;
}

/// A `SlideStore` keeping one `<project_id>.json` file per project
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Directory where project files are stored
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn project_path(&self, project_id: &str) -> PathBuf {
        self.dir.join(format!("{project_id}.json"))
    }
}

impl SlideStore for JsonFileStore {
    fn save_slides(&mut self, project_id: &str, slides: &[Slide]) -> PersistenceResult<()> {
        let path = self.project_path(project_id);
        let mut record = if path.exists() {
            self.load_project(project_id)?
        } else {
            ProjectRecord::default()
        };
        record.project.slides = slides.to_vec();

        // Create the store directory if it doesn't exist
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json)?;
        log::debug!("saved {} slides to {}", slides.len(), path.display());
        Ok(())
    }

    fn load_project(&mut self, project_id: &str) -> PersistenceResult<ProjectRecord> {
        let path = self.project_path(project_id);
        if !path.exists() {
            return Err(PersistenceError::NotFound(project_id.to_owned()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| PersistenceError::ReadError(format!("{}: {e}", path.display())))?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Write `json` to `path`, creating parent directories as needed
pub(crate) fn write_file(path: &Path, json: &str) -> PersistenceResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}

pub(crate) fn read_file(path: &Path) -> PersistenceResult<String> {
    fs::read_to_string(path)
        .map_err(|e| PersistenceError::ReadError(format!("{}: {e}", path.display())))
}
