//! Install packages from ZIP archives.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ThemeError, ThemeResult};
use super::report::InstallReport;
use super::{dir_name, ensure_valid, ThemeManager};
use crate::archive::{ArchiveExtractor, ZipExtractor};
use crate::device::SystemDirectory;
use crate::manifest::{read_component_manifest, read_theme_manifest, ManifestError, Strictness};
use crate::package::{PackageStore, PackageType};
use crate::transfer::{create_dir_all, remove_directory, TransferError};

const ARCHIVE_EXTENSION: &str = ".zip";

/// Package name implied by an archive file name: `Neon.theme.zip` gives `Neon.theme`.
fn package_name_from_archive(archive: &Path) -> String {
    let file_name = dir_name(archive);
    let lower = file_name.to_ascii_lowercase();
    match lower.strip_suffix(ARCHIVE_EXTENSION) {
        Some(stem) => file_name[..stem.len()].to_string(),
        None => file_name,
    }
}

/// Check that an extracted package carries a manifest of the expected kind.
fn verify_package(path: &Path, package_type: PackageType) -> ThemeResult<()> {
    if package_type == PackageType::Theme {
        let manifest = read_theme_manifest(path)?;
        return ensure_valid(&manifest, Strictness::Permissive);
    }
    let manifest = read_component_manifest(path)?;
    if manifest.package_type() != package_type {
        return Err(ManifestError::TypeMismatch {
            path: path.to_path_buf(),
            expected: package_type,
            found: manifest.package_type(),
        }
        .into());
    }
    Ok(())
}

fn staging_path(
    store: &PackageStore,
    package_type: PackageType,
    name: &str,
) -> ThemeResult<PathBuf> {
    let staging = store.catalog_entry(package_type, name)?;
    remove_directory(&staging)?;
    Ok(staging)
}

impl<D: SystemDirectory> ThemeManager<D> {
    /// Install a zipped package into the store.
    ///
    /// The package type comes from the package name's extension; without an
    /// explicit name the archive file name minus `.zip` is used. The archive
    /// is unpacked into `Catalog/` first and only moved into place once its
    /// manifest checks out. An existing package of the same name is never
    /// overwritten.
    pub fn install_archive(
        &self,
        archive: &Path,
        name: Option<&str>,
    ) -> ThemeResult<InstallReport> {
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| package_name_from_archive(archive));
        let package_type = PackageType::from_dir_name(&name)
            .ok_or_else(|| ThemeError::UnknownPackageType(name.clone()))?;

        let destination = self.store.package_path(package_type, &name)?;
        if destination.exists() {
            return Err(ThemeError::AlreadyExists(destination));
        }

        let staging = staging_path(&self.store, package_type, &name)?;
        tracing::info!(
            archive = %archive.display(),
            staging = %staging.display(),
            "Extracting package archive"
        );
        let summary = ZipExtractor::new().extract(archive, &staging)?;

        if let Err(e) = verify_package(&staging, package_type) {
            tracing::warn!(error = %e, "Archive is not a valid package, discarding");
            remove_directory(&staging)?;
            return Err(e);
        }

        if let Some(parent) = destination.parent() {
            create_dir_all(parent)?;
        }
        fs::rename(&staging, &destination).map_err(|e| TransferError::Write {
            path: destination.clone(),
            source: e,
        })?;

        let installed = dir_name(&destination);
        tracing::info!(
            package = %installed,
            files = summary.files,
            stripped_root = ?summary.stripped_root,
            "Package installed"
        );
        Ok(InstallReport {
            name: installed,
            package_type,
            path: destination,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceLayout;
    use crate::engine::ManagerConfig;
    use crate::manifest::{
        write_component_manifest, write_theme_manifest, ComponentManifest, ContentCategory,
        ThemeManifest,
    };
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn manager(temp: &TempDir) -> ThemeManager {
        let layout = DeviceLayout::new(temp.path().join("sd"), "tg5040");
        ThemeManager::new(ManagerConfig::new(layout).with_data_dir(temp.path().join("data")))
    }

    /// Zip every file of `dir` below `root` inside the archive.
    fn zip_dir(dir: &Path, root: &str, archive: &Path) {
        let mut writer = ZipWriter::new(File::create(archive).unwrap());
        for relative in crate::transfer::list_files(dir) {
            let name = format!("{}/{}", root, relative.to_string_lossy());
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(&fs::read(dir.join(&relative)).unwrap()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_package_name_from_archive() {
        assert_eq!(
            package_name_from_archive(Path::new("/tmp/Neon.theme.zip")),
            "Neon.theme"
        );
        assert_eq!(package_name_from_archive(Path::new("Retro.font.ZIP")), "Retro.font");
        assert_eq!(package_name_from_archive(Path::new("plain")), "plain");
    }

    #[test]
    fn test_install_theme_archive() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let source = temp.path().join("src");
        fs::create_dir_all(source.join("Fonts")).unwrap();
        fs::write(source.join("Fonts/OG.ttf"), "font").unwrap();
        write_theme_manifest(&source, &mut ThemeManifest::create_default("Neon", "Jane")).unwrap();
        let archive = temp.path().join("Neon.theme.zip");
        zip_dir(&source, "Neon.theme", &archive);

        let report = manager.install_archive(&archive, None).unwrap();
        assert_eq!(report.name, "Neon.theme");
        assert_eq!(report.package_type, PackageType::Theme);
        assert_eq!(report.summary.stripped_root.as_deref(), Some("Neon.theme"));
        assert!(report.path.join("Fonts/OG.ttf").is_file());
        assert!(!manager.store().catalog_dir().join("Themes/Neon.theme").exists());

        assert!(matches!(
            manager.install_archive(&archive, None),
            Err(ThemeError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_install_component_type_mismatch_is_discarded() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let source = temp.path().join("src");
        let mut manifest =
            ComponentManifest::create_minimal(ContentCategory::Fonts, "Retro", "Jane");
        write_component_manifest(&source, &mut manifest).unwrap();
        let archive = temp.path().join("Retro.icon.zip");
        zip_dir(&source, "Retro.icon", &archive);

        let err = manager.install_archive(&archive, None).unwrap_err();
        assert!(matches!(
            err,
            ThemeError::Manifest(ManifestError::TypeMismatch { .. })
        ));
        assert!(!manager
            .store()
            .package_path(PackageType::Icon, "Retro")
            .unwrap()
            .exists());
        assert!(!manager
            .store()
            .catalog_entry(PackageType::Icon, "Retro")
            .unwrap()
            .exists());
    }

    #[test]
    fn test_install_unknown_extension() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let archive = temp.path().join("stuff.zip");
        fs::write(&archive, "not a zip").unwrap();
        assert!(matches!(
            manager.install_archive(&archive, None),
            Err(ThemeError::UnknownPackageType(_))
        ));
    }
}
