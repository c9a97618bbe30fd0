//! Integration tests for installing zipped packages.
//!
//! Run with: `cargo test --test archive_install_integration`

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use themepak::archive::ExtractError;
use themepak::device::DeviceLayout;
use themepak::engine::{ManagerConfig, ThemeError, ThemeManager};
use themepak::package::PackageType;
use themepak::state::AppliedState;
use themepak::transfer::list_files;

fn manager(temp: &TempDir) -> ThemeManager {
    let layout = DeviceLayout::new(temp.path().join("sd"), "tg5040");
    let config = ManagerConfig::new(layout)
        .with_data_dir(temp.path().join("data"))
        .with_author("Jane")
        .with_auto_backup(false);
    ThemeManager::new(config)
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Write a zip with the given `(entry name, contents)` pairs.
fn zip_entries(archive: &Path, entries: &[(String, Vec<u8>)]) {
    let mut writer = ZipWriter::new(File::create(archive).unwrap());
    for (name, contents) in entries {
        writer
            .start_file(name.as_str(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap();
}

/// Zip a package directory below a wrapping `root/` folder.
fn zip_package(dir: &Path, root: &str, archive: &Path) {
    let entries: Vec<(String, Vec<u8>)> = list_files(dir)
        .into_iter()
        .map(|relative| {
            let name = format!("{}/{}", root, relative.to_string_lossy());
            (name, fs::read(dir.join(&relative)).unwrap())
        })
        .collect();
    zip_entries(archive, &entries);
}

#[test]
fn test_shared_export_installs_and_applies() {
    let temp = TempDir::new().unwrap();
    let manager = manager(&temp);
    let live = manager.layout().live_theme_dir();
    write(&live.join("Fonts/OG.ttf"), "og font");
    let export = manager.export_theme(Some("Mine")).unwrap();

    let archive = temp.path().join("Shared.theme.zip");
    zip_package(&export.path, "Mine.theme", &archive);

    let report = manager.install_archive(&archive, None).unwrap();
    assert_eq!(report.name, "Shared.theme");
    assert_eq!(report.package_type, PackageType::Theme);
    assert_eq!(report.summary.stripped_root.as_deref(), Some("Mine.theme"));
    assert!(manager.store().themes_dir().join("Shared.theme/Fonts/OG.ttf").is_file());

    fs::remove_dir_all(&live).unwrap();
    let (_, state) = manager
        .apply_theme("Shared", AppliedState::default())
        .unwrap();
    assert_eq!(state.theme_name(), Some("Shared.theme"));
    assert_eq!(fs::read_to_string(live.join("Fonts/OG.ttf")).unwrap(), "og font");
}

#[test]
fn test_traversal_entry_rejects_whole_archive() {
    let temp = TempDir::new().unwrap();
    let manager = manager(&temp);
    let archive = temp.path().join("Evil.theme.zip");
    zip_entries(
        &archive,
        &[
            ("manifest.json".to_string(), b"{}".to_vec()),
            ("../../escaped.txt".to_string(), b"gotcha".to_vec()),
        ],
    );

    let err = manager.install_archive(&archive, None).unwrap_err();
    assert!(matches!(
        err,
        ThemeError::Extract(ExtractError::UnsafeEntry { .. })
    ));

    assert!(!temp.path().join("escaped.txt").exists());
    assert!(!temp.path().join("data/escaped.txt").exists());
    assert!(!manager.store().themes_dir().join("Evil.theme").exists());
    assert_eq!(list_files(&manager.store().catalog_dir()).len(), 0);
}

#[test]
fn test_archive_without_files_is_rejected() {
    let temp = TempDir::new().unwrap();
    let manager = manager(&temp);
    let archive = temp.path().join("Hollow.bg.zip");
    zip_entries(&archive, &[]);

    let err = manager.install_archive(&archive, None).unwrap_err();
    assert!(matches!(err, ThemeError::Extract(ExtractError::Empty { .. })));
}
