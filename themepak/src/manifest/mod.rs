//! Package manifest model.
//!
//! Every package carries a `manifest.json` at its root. Full themes use
//! [`ThemeManifest`]; component packages use [`ComponentManifest`], a sum
//! type over the six single-category shapes.
//!
//! # Path Mappings
//!
//! Each file a package installs is described by a [`PathMapping`] binding
//! its package-relative path to an absolute device path, with
//! classification metadata. The mapping lists are the source of truth for
//! every operation; file names are only interpreted by [`classify`] when a
//! manifest is first derived from raw files.
//!
//! # Reading
//!
//! A missing manifest ([`ManifestError::NotFound`]) is distinct from a
//! broken one ([`ManifestError::Malformed`]); only the former may be
//! replaced by defaults through [`read_or_default`].

pub mod classify;
mod component;
mod error;
mod io;
mod mapping;
mod rebuild;
mod settings;
mod theme;
mod validate;

pub use classify::{classify_theme_file, classify_wallpaper, component_path};
pub use component::{
    AccentComponent, ComponentInfo, ComponentManifest, FileComponent, LedComponent,
};
pub use error::{ManifestError, ManifestResult};
pub use io::{
    manifest_path, read_component_manifest, read_or_default, read_theme_manifest,
    write_component_manifest, write_theme_manifest, MANIFEST_FILENAME,
};
pub use mapping::{
    IconType, PathMapping, SettingsKind, WallpaperType, FONT_SLOT, ICON_TYPE, LOCATION,
    SETTINGS_KIND, SYSTEM_TAG, WALLPAPER_TYPE,
};
pub use rebuild::rebuild_theme_manifest;
pub use settings::{AccentColors, HexColor, LedSettings, LedZone, LED_SECTIONS};
pub use theme::{
    default_repository_url, CategoryContent, ContentCategory, ContentSummary, PathMappings,
    ThemeInfo, ThemeManifest, ALL_SYSTEMS, PREVIEW_FILENAME,
};
pub use validate::{
    is_github_repository_url, validate, validate_component, Strictness, ValidationIssue,
};
