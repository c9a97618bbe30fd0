//! Record of what is currently applied to the device.
//!
//! The record is passed into and returned from every engine operation
//! rather than held globally, and is rewritten wholesale on save.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::package::PackageType;

/// Errors loading or saving the applied state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read state file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("corrupt state file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("failed to write state file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// One applied package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedEntry {
    /// Package directory name.
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

impl AppliedEntry {
    pub fn now(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            applied_at: Utc::now(),
        }
    }
}

/// The applied theme and any components imported on top of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppliedState {
    pub theme: Option<AppliedEntry>,
    pub components: BTreeMap<PackageType, AppliedEntry>,
}

impl AppliedState {
    /// Load the state file; a missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(StateError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&text).map_err(|e| StateError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write the whole state file.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        let write_error = |e: io::Error| StateError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| write_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, json + "\n").map_err(write_error)
    }

    /// State after applying a full theme. Imported components are cleared.
    pub fn with_theme(self, name: impl Into<String>) -> Self {
        Self {
            theme: Some(AppliedEntry::now(name)),
            components: BTreeMap::new(),
        }
    }

    /// State after importing a component over the current theme.
    pub fn with_component(mut self, component_type: PackageType, name: impl Into<String>) -> Self {
        self.components
            .insert(component_type, AppliedEntry::now(name));
        self
    }

    /// Name of the applied theme, if any.
    pub fn theme_name(&self) -> Option<&str> {
        self.theme.as_ref().map(|entry| entry.name.as_str())
    }
}
