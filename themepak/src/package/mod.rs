//! Theme package types, naming and on-disk locations.
//!
//! # Overview
//!
//! A package is a directory whose name ends in a type-specific extension
//! and which carries a `manifest.json` at its root:
//!
//! - **Theme** (`.theme`): every content category
//! - **Wallpaper** (`.bg`), **Icon** (`.icon`), **Accent** (`.acc`),
//!   **LED** (`.led`), **Font** (`.font`), **Overlay** (`.over`): one category each
//!
//! The [`PackageStore`] resolves where packages, backups, exports and catalog
//! entries live; the naming helpers guarantee extensions and unique names.

mod naming;
mod store;
mod types;

pub use types::PackageType;

pub use naming::{
    backup_name_at, base_name, component_name, ensure_extension, next_sequential_name,
    unique_name, validate_package_name, NameError, BACKUP_PREFIX, EXPORT_PREFIX,
};
pub use store::{
    list_package_dir, DeleteError, PackageEntry, PackageStore, BACKUPS_DIR, CATALOG_DIR,
    COMPONENTS_DIR, EXPORTS_DIR, STATE_FILENAME,
};
