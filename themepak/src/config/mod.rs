//! User configuration.
//!
//! Settings live in `~/.themepak/config.ini`. [`ConfigFile`] is the typed
//! view of that file; [`ConfigKey`] addresses individual settings for the
//! `config` command.

mod file;
mod keys;

use std::path::PathBuf;

pub use file::{
    config_dir, config_file_path, BackupSettings, ConfigFile, DeviceSettings, ExportSettings,
    LoggingSettings, StorageSettings, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_AUTHOR,
    DEFAULT_BACKUP_PATTERN, DEFAULT_LOG_LEVEL, DEFAULT_MAX_BACKUPS,
};
pub use keys::ConfigKey;

/// Errors reading, writing or editing the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
