use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

use crate::domain::app_state::PersistedState;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "PackageValueScanner";
const APP_NAME: &str = "PackageValueScanner";
const STATE_FILENAME: &str = "state.json";

/// On-disk home of the selections, price overrides and custom packages.
#[derive(Clone, Debug)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Option<Self> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .map(|dirs| Self::new(dirs.config_dir().join(STATE_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable state yields `None`; the app then starts fresh.
    pub fn load(&self) -> Option<PersistedState> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no saved state yet");
                return None;
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "failed to read saved state: {err}");
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "ignoring corrupt saved state: {err}");
                None
            }
        }
    }

    pub fn save(&self, state: &PersistedState) -> Result<(), PersistSaveError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

pub fn load_persisted_state() -> Option<PersistedState> {
    StateFile::default_location()?.load()
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    StateFile::default_location()
        .ok_or(PersistSaveError::StorageUnavailable)?
        .save(state)
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
