//! Addressable configuration keys for `config get`/`config set`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::file::{parse_bool, parse_count};
use super::{ConfigError, ConfigFile};

/// A single `section.key` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DeviceSdcardRoot,
    DevicePlatform,
    StorageDataDir,
    BackupsMaxBackups,
    BackupsAutoBackup,
    BackupsPattern,
    ExportAuthor,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::DeviceSdcardRoot,
            ConfigKey::DevicePlatform,
            ConfigKey::StorageDataDir,
            ConfigKey::BackupsMaxBackups,
            ConfigKey::BackupsAutoBackup,
            ConfigKey::BackupsPattern,
            ConfigKey::ExportAuthor,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    /// Dotted name, e.g. `backups.max_backups`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::DeviceSdcardRoot => "device.sdcard_root",
            ConfigKey::DevicePlatform => "device.platform",
            ConfigKey::StorageDataDir => "storage.data_dir",
            ConfigKey::BackupsMaxBackups => "backups.max_backups",
            ConfigKey::BackupsAutoBackup => "backups.auto_backup",
            ConfigKey::BackupsPattern => "backups.pattern",
            ConfigKey::ExportAuthor => "export.author",
            ConfigKey::LoggingLevel => "logging.level",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or_default()
    }

    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or_default()
    }

    /// Current value as text. Unset optional values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        let path_text = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        match self {
            ConfigKey::DeviceSdcardRoot => config.device.sdcard_root.display().to_string(),
            ConfigKey::DevicePlatform => config.device.platform.clone(),
            ConfigKey::StorageDataDir => path_text(&config.storage.data_dir),
            ConfigKey::BackupsMaxBackups => config.backups.max_backups.to_string(),
            ConfigKey::BackupsAutoBackup => config.backups.auto_backup.to_string(),
            ConfigKey::BackupsPattern => config.backups.pattern.clone(),
            ConfigKey::ExportAuthor => config.export.author.clone(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => path_text(&config.logging.file),
        }
    }

    /// Parse and store a value. An empty value clears optional keys.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional_path = |v: &str| (!v.is_empty()).then(|| PathBuf::from(v));
        match self {
            ConfigKey::DeviceSdcardRoot => {
                config.device.sdcard_root = PathBuf::from(self.required(value)?)
            }
            ConfigKey::DevicePlatform => config.device.platform = self.required(value)?.to_string(),
            ConfigKey::StorageDataDir => config.storage.data_dir = optional_path(value),
            ConfigKey::BackupsMaxBackups => {
                config.backups.max_backups = parse_count(self.name(), value)?
            }
            ConfigKey::BackupsAutoBackup => {
                config.backups.auto_backup = parse_bool(self.name(), value)?
            }
            ConfigKey::BackupsPattern => {
                let pattern = self.required(value)?;
                glob::Pattern::new(pattern).map_err(|e| ConfigError::InvalidValue {
                    key: self.name().to_string(),
                    value: pattern.to_string(),
                    reason: e.to_string(),
                })?;
                config.backups.pattern = pattern.to_string();
            }
            ConfigKey::ExportAuthor => config.export.author = self.required(value)?.to_string(),
            ConfigKey::LoggingLevel => {
                let level = value.to_lowercase();
                if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
                    return Err(ConfigError::InvalidValue {
                        key: self.name().to_string(),
                        value: value.to_string(),
                        reason: "expected trace, debug, info, warn or error".to_string(),
                    });
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingFile => config.logging.file = optional_path(value),
        }
        Ok(())
    }

    /// Change this key in the config file at `path` and write it back.
    ///
    /// A file that fails to load is left untouched and its error returned.
    pub fn update_file(&self, path: &Path, value: &str) -> Result<ConfigFile, ConfigError> {
        let mut config = ConfigFile::load_from(path)?;
        self.set(&mut config, value)?;
        config.save_to(path)?;
        Ok(config)
    }

    fn required<'v>(&self, value: &'v str) -> Result<&'v str, ConfigError> {
        if value.is_empty() {
            Err(ConfigError::InvalidValue {
                key: self.name().to_string(),
                value: String::new(),
                reason: "value must not be empty".to_string(),
            })
        } else {
            Ok(value)
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        let key: ConfigKey = "backups.max_backups".parse().unwrap();
        assert_eq!(key, ConfigKey::BackupsMaxBackups);
        assert_eq!(key.section(), "backups");
        assert_eq!(key.key_name(), "max_backups");
        assert!("backups.nope".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_get_and_set() {
        let mut config = ConfigFile::default();
        ConfigKey::BackupsMaxBackups.set(&mut config, "5").unwrap();
        assert_eq!(ConfigKey::BackupsMaxBackups.get(&config), "5");

        ConfigKey::StorageDataDir.set(&mut config, "/tmp/data").unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/data")));
        ConfigKey::StorageDataDir.set(&mut config, "").unwrap();
        assert_eq!(config.storage.data_dir, None);
        assert_eq!(ConfigKey::StorageDataDir.get(&config), "");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::BackupsMaxBackups.set(&mut config, "-1").is_err());
        assert!(ConfigKey::BackupsAutoBackup.set(&mut config, "sometimes").is_err());
        assert!(ConfigKey::BackupsPattern.set(&mut config, "[").is_err());
        assert!(ConfigKey::LoggingLevel.set(&mut config, "loud").is_err());
        assert!(ConfigKey::ExportAuthor.set(&mut config, "  ").is_err());
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_update_file_keeps_other_settings() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[device]\nsdcard_root = /media/card\n").unwrap();

        let config = ConfigKey::ExportAuthor.update_file(&path, "Jane").unwrap();
        assert_eq!(config.export.author, "Jane");

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded.device.sdcard_root, PathBuf::from("/media/card"));
        assert_eq!(reloaded.export.author, "Jane");
    }

    #[test]
    fn test_update_file_leaves_malformed_file_alone() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        let original = "[device]\nsdcard_root = /media/card\n\n[backups]\nmax_backups = three\n";
        std::fs::write(&path, original).unwrap();

        let err = ConfigKey::ExportAuthor.update_file(&path, "Jane").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_update_file_rejects_bad_value_without_writing() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        assert!(ConfigKey::LoggingLevel.update_file(&path, "loud").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_all_keys_have_distinct_names() {
        let mut names: Vec<_> = ConfigKey::all().iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ConfigKey::all().len());
    }
}
