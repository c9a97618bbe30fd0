//! themepak - theme packages for handheld launcher skins
//!
//! This library installs, snapshots and splits themes for a launcher that
//! reads its look from an SD card: wallpapers, icons, overlays, fonts,
//! accent colors and LED settings.
//!
//! # Modules
//!
//! - [`device`]: where the launcher reads each asset on the SD card
//! - [`package`]: package types, names and the on-disk store
//! - [`manifest`]: `manifest.json` model, validation and classification
//! - [`engine`]: Apply, Export, Import, Deconstruct, backups and archives
//! - [`archive`]: safe ZIP extraction
//! - [`transfer`]: recursive copy and remove helpers
//! - [`preview`]: placeholder and swatch images
//! - [`state`]: record of what is currently applied
//! - [`config`]: `~/.themepak/config.ini`
//! - [`logging`]: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use themepak::config::ConfigFile;
//! use themepak::engine::{ManagerConfig, ThemeManager};
//!
//! let file = ConfigFile::load()?;
//! let manager = ThemeManager::new(ManagerConfig::from(&file));
//! let state = manager.load_state()?;
//! let (report, state) = manager.apply_theme("Neon", state)?;
//! manager.save_state(&state)?;
//! println!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod config;
pub mod device;
pub mod engine;
pub mod logging;
pub mod manifest;
pub mod package;
pub mod preview;
pub mod state;
pub mod transfer;

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
