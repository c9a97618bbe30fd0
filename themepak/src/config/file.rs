//! INI configuration file.
//!
//! ```ini
//! [device]
//! sdcard_root = /mnt/SDCARD
//! platform = tg5040
//!
//! [storage]
//! ; data_dir = /mnt/SDCARD/Tools/tg5040/Theme Manager.pak
//!
//! [backups]
//! max_backups = 3
//! auto_backup = true
//! pattern = *.theme
//!
//! [export]
//! author = Unknown
//!
//! [logging]
//! level = info
//! ; file = ~/.themepak/themepak.log
//! ```
//!
//! Missing sections and keys fall back to their defaults, so a partial file
//! is always valid.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;

use super::ConfigError;
use crate::device::{DeviceLayout, DEFAULT_PLATFORM, DEFAULT_SDCARD_ROOT};

/// Directory name below the home directory holding the config file.
pub const CONFIG_DIR_NAME: &str = ".themepak";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default maximum number of retained backups.
pub const DEFAULT_MAX_BACKUPS: usize = 3;

/// Default glob selecting backups eligible for rotation.
pub const DEFAULT_BACKUP_PATTERN: &str = "*.theme";

/// Default author recorded on exports.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Directory holding the config file and default log file.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Path of the user's config file.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// `[device]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    pub sdcard_root: PathBuf,
    pub platform: String,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            sdcard_root: PathBuf::from(DEFAULT_SDCARD_ROOT),
            platform: DEFAULT_PLATFORM.to_string(),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    /// Package store override; defaults to the tool pak on the card.
    pub data_dir: Option<PathBuf>,
}

/// `[backups]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSettings {
    pub max_backups: usize,
    pub auto_backup: bool,
    pub pattern: String,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            max_backups: DEFAULT_MAX_BACKUPS,
            auto_backup: true,
            pattern: DEFAULT_BACKUP_PATTERN.to_string(),
        }
    }
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub author: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    /// Log file override; defaults to `~/.themepak/themepak.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub device: DeviceSettings,
    pub storage: StorageSettings,
    pub backups: BackupSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load the user's config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load a config file; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |section: &str, key: &str| {
            ini.get_from(Some(section), key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get("device", "sdcard_root") {
            config.device.sdcard_root = PathBuf::from(v);
        }
        if let Some(v) = get("device", "platform") {
            config.device.platform = v.to_string();
        }
        config.storage.data_dir = get("storage", "data_dir").map(PathBuf::from);
        if let Some(v) = get("backups", "max_backups") {
            config.backups.max_backups = parse_count("backups.max_backups", v)?;
        }
        if let Some(v) = get("backups", "auto_backup") {
            config.backups.auto_backup = parse_bool("backups.auto_backup", v)?;
        }
        if let Some(v) = get("backups", "pattern") {
            config.backups.pattern = v.to_string();
        }
        if let Some(v) = get("export", "author") {
            config.export.author = v.to_string();
        }
        if let Some(v) = get("logging", "level") {
            config.logging.level = v.to_string();
        }
        config.logging.file = get("logging", "file").map(PathBuf::from);

        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("device"))
            .set("sdcard_root", self.device.sdcard_root.to_string_lossy())
            .set("platform", self.device.platform.as_str());
        if let Some(dir) = &self.storage.data_dir {
            ini.with_section(Some("storage"))
                .set("data_dir", dir.to_string_lossy());
        }
        ini.with_section(Some("backups"))
            .set("max_backups", self.backups.max_backups.to_string())
            .set("auto_backup", self.backups.auto_backup.to_string())
            .set("pattern", self.backups.pattern.as_str());
        ini.with_section(Some("export"))
            .set("author", self.export.author.as_str());
        let mut logging = ini.with_section(Some("logging"));
        logging.set("level", self.logging.level.as_str());
        if let Some(file) = &self.logging.file {
            logging.set("file", file.to_string_lossy());
        }
        ini
    }

    /// Save to the user's config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to a specific path, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        self.to_ini()
            .write_to_file(path)
            .map_err(|e| ConfigError::Write {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Device layout for the configured card.
    pub fn device_layout(&self) -> DeviceLayout {
        DeviceLayout::new(&self.device.sdcard_root, &self.device.platform)
    }

    /// Effective package store directory.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| self.device_layout().default_data_dir())
    }

    /// Effective log file.
    pub fn log_file(&self) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(|| config_dir().join("themepak.log"))
    }
}

pub(super) fn parse_count(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a non-negative integer".to_string(),
    })
}

pub(super) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.backups.max_backups, 3);
        assert!(config.backups.auto_backup);
        assert_eq!(config.backups.pattern, "*.theme");
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.ini");
        let mut config = ConfigFile::default();
        config.device.sdcard_root = PathBuf::from("/media/card");
        config.storage.data_dir = Some(PathBuf::from("/data/themes"));
        config.backups.max_backups = 5;
        config.backups.auto_backup = false;
        config.export.author = "Jane Doe".to_string();
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.data_dir(), PathBuf::from("/data/themes"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "[backups]\nmax_backups = 7\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.backups.max_backups, 7);
        assert_eq!(config.device.platform, "tg5040");
        assert_eq!(
            config.data_dir(),
            PathBuf::from("/mnt/SDCARD/Tools/tg5040/Theme Manager.pak")
        );
    }

    #[test]
    fn test_invalid_value_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "[backups]\nauto_backup = maybe\n").unwrap();
        assert!(matches!(
            ConfigFile::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
