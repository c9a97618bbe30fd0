//! Configuration for the theme engine.

use std::path::PathBuf;

use crate::config::{ConfigFile, DEFAULT_AUTHOR, DEFAULT_BACKUP_PATTERN, DEFAULT_MAX_BACKUPS};
use crate::device::DeviceLayout;

/// Runtime settings for [`ThemeManager`](super::ThemeManager).
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Device paths the engine reads and writes.
    pub layout: DeviceLayout,

    /// Package store root.
    ///
    /// Defaults to the tool pak on the SD card.
    pub data_dir: PathBuf,

    /// Backups retained after rotation. Zero disables rotation.
    pub max_backups: usize,

    /// Whether Apply snapshots the live theme first.
    pub auto_backup: bool,

    /// Glob selecting backups eligible for rotation.
    pub backup_pattern: String,

    /// Author recorded on exports and backups.
    pub author: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new(DeviceLayout::default())
    }
}

impl ManagerConfig {
    /// Create a configuration for a device; the store lives on the device.
    pub fn new(layout: DeviceLayout) -> Self {
        Self {
            data_dir: layout.default_data_dir(),
            layout,
            max_backups: DEFAULT_MAX_BACKUPS,
            auto_backup: true,
            backup_pattern: DEFAULT_BACKUP_PATTERN.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
        }
    }

    /// Set the package store root.
    pub fn with_data_dir(mut self, path: PathBuf) -> Self {
        self.data_dir = path;
        self
    }

    /// Set the number of retained backups.
    pub fn with_max_backups(mut self, max: usize) -> Self {
        self.max_backups = max;
        self
    }

    /// Enable or disable the backup taken before Apply.
    pub fn with_auto_backup(mut self, enabled: bool) -> Self {
        self.auto_backup = enabled;
        self
    }

    /// Set the rotation glob.
    pub fn with_backup_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.backup_pattern = pattern.into();
        self
    }

    /// Set the author recorded on new packages.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

impl From<&ConfigFile> for ManagerConfig {
    fn from(file: &ConfigFile) -> Self {
        Self::new(file.device_layout())
            .with_data_dir(file.data_dir())
            .with_max_backups(file.backups.max_backups)
            .with_auto_backup(file.backups.auto_backup)
            .with_backup_pattern(file.backups.pattern.clone())
            .with_author(file.export.author.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();
        assert_eq!(config.max_backups, 3);
        assert!(config.auto_backup);
        assert_eq!(config.backup_pattern, "*.theme");
        assert_eq!(
            config.data_dir,
            PathBuf::from("/mnt/SDCARD/Tools/tg5040/Theme Manager.pak")
        );
    }

    #[test]
    fn test_builder_pattern() {
        let config = ManagerConfig::new(DeviceLayout::new("/sd", "tg5040"))
            .with_data_dir(PathBuf::from("/data"))
            .with_max_backups(5)
            .with_auto_backup(false)
            .with_backup_pattern("backup_*.theme")
            .with_author("Jane");

        assert_eq!(config.layout.root(), PathBuf::from("/sd"));
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.max_backups, 5);
        assert!(!config.auto_backup);
        assert_eq!(config.backup_pattern, "backup_*.theme");
        assert_eq!(config.author, "Jane");
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.device.sdcard_root = PathBuf::from("/card");
        file.backups.max_backups = 1;
        let config = ManagerConfig::from(&file);
        assert_eq!(config.layout.root(), PathBuf::from("/card"));
        assert_eq!(
            config.data_dir,
            PathBuf::from("/card/Tools/tg5040/Theme Manager.pak")
        );
        assert_eq!(config.max_backups, 1);
    }
}
