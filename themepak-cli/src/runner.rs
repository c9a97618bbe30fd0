//! Shared setup for commands that touch the device.

use std::path::{Path, PathBuf};

use themepak::config::{config_file_path, ConfigFile};
use themepak::engine::{ManagerConfig, ThemeManager};
use themepak::logging::{init_logging, LogOptions, LoggingGuard};
use themepak::state::AppliedState;

use crate::error::CliError;

/// Options accepted by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Overrides `device.sdcard_root` from the config file.
    pub sdcard_root: Option<PathBuf>,
    /// Log at debug level.
    pub verbose: bool,
}

/// Loaded configuration, active logging and a ready theme manager.
pub struct CliRunner {
    config: ConfigFile,
    manager: ThemeManager,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load the user's config file, apply command-line overrides and start logging.
    pub fn new(args: &GlobalArgs) -> Result<Self, CliError> {
        Self::with_config_file(args, &config_file_path())
    }

    /// As [`CliRunner::new`] with an explicit config file. A missing file
    /// means defaults; a malformed one is an error.
    pub fn with_config_file(args: &GlobalArgs, path: &Path) -> Result<Self, CliError> {
        let mut config = ConfigFile::load_from(path)?;
        if let Some(root) = &args.sdcard_root {
            config.device.sdcard_root = root.clone();
        }

        let level = if args.verbose {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        };
        let logging = init_logging(
            &LogOptions::new(level).with_file(Some(config.log_file())),
        )?;

        let manager = ThemeManager::new(ManagerConfig::from(&config));
        Ok(Self {
            config,
            manager,
            _logging: logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn manager(&self) -> &ThemeManager {
        &self.manager
    }

    /// Log the command being run and the paths it works on.
    pub fn log_startup(&self, command: &str) {
        let layout = self.manager.layout();
        tracing::info!(
            version = themepak::VERSION,
            command,
            sdcard_root = %layout.root().display(),
            data_dir = %self.manager.store().root().display(),
            "themepak starting"
        );
    }

    /// Load the applied-state record.
    pub fn load_state(&self) -> Result<AppliedState, CliError> {
        Ok(self.manager.load_state()?)
    }

    /// Persist the applied-state record.
    pub fn save_state(&self, state: &AppliedState) -> Result<(), CliError> {
        Ok(self.manager.save_state(state)?)
    }
}
