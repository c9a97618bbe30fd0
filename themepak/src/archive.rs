//! Safe extraction of zipped packages.
//!
//! Extraction runs in two passes:
//!
//! 1. Every entry path is validated before anything is written. Absolute
//!    paths and parent references reject the whole archive. `__MACOSX`
//!    resource forks and hidden entries are ignored. A histogram of
//!    top-level folders decides whether a single wrapping folder is
//!    stripped.
//! 2. Entries are written, each checked again to stay below the
//!    destination. The first failure aborts; a destination created by the
//!    extraction is removed again.
//!
//! # Root Stripping
//!
//! Archives of a package usually wrap its contents in a folder. The folder
//! is stripped when at least [`ROOT_SHARE_THRESHOLD`] of the entries share
//! it and its name matches the destination: the same name with or without
//! extension, or the same package extension.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

/// Minimum share of entries under one top-level folder for it to be stripped.
pub const ROOT_SHARE_THRESHOLD: f64 = 0.9;

const MACOS_RESOURCE_DIR: &str = "__MACOSX";

/// Result type for extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors extracting a package archive.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The archive file could not be opened.
    #[error("failed to open archive {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// The archive is not a readable zip file.
    #[error("failed to read archive {}: {source}", path.display())]
    Archive { path: PathBuf, source: ZipError },

    /// An entry would be written outside the destination.
    #[error("unsafe entry '{entry}' in archive {}", path.display())]
    UnsafeEntry { path: PathBuf, entry: String },

    /// The archive has no extractable entries.
    #[error("archive {} contains no files", path.display())]
    Empty { path: PathBuf },

    /// An entry could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Files written.
    pub files: usize,
    /// Directories created from directory entries.
    pub directories: usize,
    /// Ignored `__MACOSX` or hidden entries.
    pub ignored: usize,
    /// Top-level folder that was stripped, if any.
    pub stripped_root: Option<String>,
}

/// Extracts archives into a directory.
pub trait ArchiveExtractor {
    /// Extract `archive` into `dest`.
    fn extract(&self, archive: &Path, dest: &Path) -> ExtractResult<ExtractSummary>;

    /// List the entry names of `archive`.
    fn list_contents(&self, archive: &Path) -> ExtractResult<Vec<String>>;
}

/// Zip implementation of [`ArchiveExtractor`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ZipExtractor {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, archive: &Path) -> ExtractResult<ZipArchive<BufReader<File>>> {
        let file = File::open(archive).map_err(|e| ExtractError::Open {
            path: archive.to_path_buf(),
            source: e,
        })?;
        ZipArchive::new(BufReader::new(file)).map_err(|e| ExtractError::Archive {
            path: archive.to_path_buf(),
            source: e,
        })
    }
}

/// A validated entry from the first pass.
#[derive(Debug)]
struct PlannedEntry {
    index: usize,
    relative: PathBuf,
    is_dir: bool,
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive_path: &Path, dest: &Path) -> ExtractResult<ExtractSummary> {
        let mut archive = self.open(archive_path)?;
        let archive_error = |e: ZipError| ExtractError::Archive {
            path: archive_path.to_path_buf(),
            source: e,
        };

        // Pass 1: validate everything before touching the filesystem.
        let mut planned = Vec::new();
        let mut ignored = 0;
        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index).map_err(archive_error)?;
            let name = entry.name().to_string();
            let relative = entry_relative_path(&name).ok_or_else(|| ExtractError::UnsafeEntry {
                path: archive_path.to_path_buf(),
                entry: name.clone(),
            })?;
            if relative.as_os_str().is_empty() {
                continue;
            }
            if is_ignored(&relative) {
                ignored += 1;
                continue;
            }
            planned.push(PlannedEntry {
                index,
                relative,
                is_dir: entry.is_dir(),
            });
        }

        if !planned.iter().any(|entry| !entry.is_dir) {
            return Err(ExtractError::Empty {
                path: archive_path.to_path_buf(),
            });
        }

        let stripped_root = strippable_root(&planned, dest);
        if let Some(root) = &stripped_root {
            tracing::debug!(archive = %archive_path.display(), root = %root, "Stripping wrapping folder");
        }

        // Pass 2: write.
        let created_dest = !dest.exists();
        let result = write_entries(
            &mut archive,
            archive_path,
            &planned,
            dest,
            stripped_root.as_deref(),
        );
        match result {
            Ok((files, directories)) => Ok(ExtractSummary {
                files,
                directories,
                ignored,
                stripped_root,
            }),
            Err(e) => {
                if created_dest {
                    if let Err(cleanup) = fs::remove_dir_all(dest) {
                        tracing::warn!(
                            dest = %dest.display(),
                            error = %cleanup,
                            "Failed to remove partial extraction"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    fn list_contents(&self, archive_path: &Path) -> ExtractResult<Vec<String>> {
        let archive = self.open(archive_path)?;
        Ok(archive.file_names().map(str::to_string).collect())
    }
}

fn write_entries(
    archive: &mut ZipArchive<BufReader<File>>,
    archive_path: &Path,
    planned: &[PlannedEntry],
    dest: &Path,
    stripped_root: Option<&str>,
) -> ExtractResult<(usize, usize)> {
    let write_error = |path: &Path, e: io::Error| ExtractError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    fs::create_dir_all(dest).map_err(|e| write_error(dest, e))?;

    let mut files = 0;
    let mut directories = 0;
    for entry in planned {
        let relative = match stripped_root {
            Some(root) => entry
                .relative
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| entry.relative.clone()),
            None => entry.relative.clone(),
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = sanitize_extract_path(dest, &relative).ok_or_else(|| {
            ExtractError::UnsafeEntry {
                path: archive_path.to_path_buf(),
                entry: entry.relative.display().to_string(),
            }
        })?;

        if entry.is_dir {
            fs::create_dir_all(&target).map_err(|e| write_error(&target, e))?;
            directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
        }
        let mut zip_file = archive
            .by_index(entry.index)
            .map_err(|e| ExtractError::Archive {
                path: archive_path.to_path_buf(),
                source: e,
            })?;
        let out = File::create(&target).map_err(|e| write_error(&target, e))?;
        let mut writer = BufWriter::new(out);
        io::copy(&mut zip_file, &mut writer).map_err(|e| write_error(&target, e))?;
        writer.flush().map_err(|e| write_error(&target, e))?;
        files += 1;
    }
    Ok((files, directories))
}

/// Relative path of an entry name, or `None` when it is absolute or
/// climbs out with `..`.
fn entry_relative_path(name: &str) -> Option<PathBuf> {
    let normalized = name.replace('\\', "/");
    if normalized.starts_with('/') {
        return None;
    }
    let mut clean = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => {
                // Windows drive prefixes such as `C:` are not relative.
                if part.to_string_lossy().contains(':') {
                    return None;
                }
                clean.push(part)
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

fn is_ignored(relative: &Path) -> bool {
    relative.components().any(|component| {
        let part = component.as_os_str().to_string_lossy();
        part == MACOS_RESOURCE_DIR || part.starts_with('.')
    })
}

/// Join `raw_path` below `dest_root`, or `None` if it would escape.
fn sanitize_extract_path(dest_root: &Path, raw_path: &Path) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in raw_path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    let out = dest_root.join(clean);
    out.starts_with(dest_root).then_some(out)
}

/// The wrapping top-level folder to strip, if the entries have one.
fn strippable_root(planned: &[PlannedEntry], dest: &Path) -> Option<String> {
    let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
    for entry in planned {
        let mut components = entry.relative.components();
        let first = components.next()?;
        // A file at the archive root has no wrapping folder.
        let nested = entry.is_dir || components.next().is_some();
        let key = if nested {
            first.as_os_str().to_string_lossy().to_string()
        } else {
            String::new()
        };
        *histogram.entry(key).or_default() += 1;
    }

    let (root, count) = histogram
        .into_iter()
        .filter(|(root, _)| !root.is_empty())
        .max_by_key(|(_, count)| *count)?;
    if (count as f64) < ROOT_SHARE_THRESHOLD * planned.len() as f64 {
        return None;
    }
    root_matches_destination(&root, dest).then_some(root)
}

fn root_matches_destination(root: &str, dest: &Path) -> bool {
    let Some(dest_name) = dest.file_name().map(|n| n.to_string_lossy().to_string()) else {
        return false;
    };
    let dest_stem = dest.file_stem().map(|s| s.to_string_lossy().to_string());
    let dest_ext = dest.extension().map(|e| e.to_string_lossy().to_lowercase());
    let root_path = Path::new(root);
    let root_ext = root_path.extension().map(|e| e.to_string_lossy().to_lowercase());
    let root_stem = root_path.file_stem().map(|s| s.to_string_lossy().to_string());

    root == dest_name
        || dest_stem.as_deref() == Some(root)
        || (root_stem.is_some() && root_stem == dest_stem)
        || (dest_ext.is_some() && root_ext == dest_ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(path: &Path, entries: &[(&str, Option<&str>)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, contents) in entries {
            match contents {
                Some(body) => {
                    zip.start_file(*name, options).unwrap();
                    zip.write_all(body.as_bytes()).unwrap();
                }
                None => {
                    zip.add_directory(*name, options).unwrap();
                }
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_strips_matching_root() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("neon.zip");
        build_zip(
            &archive,
            &[
                ("Neon.theme/", None),
                ("Neon.theme/manifest.json", Some("{}")),
                ("Neon.theme/Fonts/OG.ttf", Some("font")),
                ("__MACOSX/Neon.theme/._manifest.json", Some("junk")),
                ("Neon.theme/.DS_Store", Some("junk")),
            ],
        );

        let dest = temp.path().join("Themes/Neon.theme");
        let summary = ZipExtractor::new().extract(&archive, &dest).unwrap();

        assert_eq!(summary.stripped_root.as_deref(), Some("Neon.theme"));
        assert_eq!(summary.files, 2);
        assert_eq!(summary.ignored, 2);
        assert!(dest.join("manifest.json").is_file());
        assert_eq!(fs::read_to_string(dest.join("Fonts/OG.ttf")).unwrap(), "font");
        assert!(!dest.join("__MACOSX").exists());
        assert!(!dest.join(".DS_Store").exists());
    }

    #[test]
    fn test_extract_strips_root_sharing_extension() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pack.zip");
        build_zip(
            &archive,
            &[
                ("Other.theme/manifest.json", Some("{}")),
                ("Other.theme/preview.png", Some("png")),
            ],
        );
        let dest = temp.path().join("Renamed.theme");
        let summary = ZipExtractor::new().extract(&archive, &dest).unwrap();
        assert_eq!(summary.stripped_root.as_deref(), Some("Other.theme"));
        assert!(dest.join("manifest.json").is_file());
    }

    #[test]
    fn test_extract_keeps_unrelated_root() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pack.zip");
        build_zip(
            &archive,
            &[
                ("Wallpapers/SystemWallpapers/Root.png", Some("a")),
                ("Wallpapers/SystemWallpapers/Tools.png", Some("b")),
            ],
        );
        let dest = temp.path().join("Neon.theme");
        let summary = ZipExtractor::new().extract(&archive, &dest).unwrap();
        assert_eq!(summary.stripped_root, None);
        assert!(dest.join("Wallpapers/SystemWallpapers/Root.png").is_file());
    }

    #[test]
    fn test_extract_below_threshold_keeps_root() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pack.zip");
        build_zip(
            &archive,
            &[
                ("Neon.theme/a.png", Some("a")),
                ("manifest.json", Some("{}")),
            ],
        );
        let dest = temp.path().join("Neon.theme");
        let summary = ZipExtractor::new().extract(&archive, &dest).unwrap();
        assert_eq!(summary.stripped_root, None);
        assert!(dest.join("Neon.theme/a.png").is_file());
    }

    #[test]
    fn test_traversal_rejected_before_writing() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.zip");
        build_zip(
            &archive,
            &[
                ("Neon.theme/manifest.json", Some("{}")),
                ("../../escaped.txt", Some("gotcha")),
            ],
        );
        let dest = temp.path().join("out/Neon.theme");
        let err = ZipExtractor::new().extract(&archive, &dest).unwrap_err();

        assert!(matches!(err, ExtractError::UnsafeEntry { .. }));
        assert!(!dest.exists());
        assert!(!temp.path().join("escaped.txt").exists());
    }

    #[test]
    fn test_absolute_entry_rejected() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("abs.zip");
        build_zip(&archive, &[("/tmp/abs.txt", Some("x"))]);
        let err = ZipExtractor::new()
            .extract(&archive, &temp.path().join("x.theme"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnsafeEntry { .. }));
    }

    #[test]
    fn test_empty_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("empty.zip");
        build_zip(&archive, &[("Neon.theme/", None)]);
        let err = ZipExtractor::new()
            .extract(&archive, &temp.path().join("Neon.theme"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Empty { .. }));
    }

    #[test]
    fn test_not_a_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bogus.zip");
        fs::write(&archive, "plain text").unwrap();
        let err = ZipExtractor::new()
            .extract(&archive, &temp.path().join("x.theme"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Archive { .. }));
    }

    #[test]
    fn test_list_contents() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pack.zip");
        build_zip(&archive, &[("a.txt", Some("1")), ("b/c.txt", Some("2"))]);
        let mut names = ZipExtractor::new().list_contents(&archive).unwrap();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b/c.txt"]);
    }

    #[test]
    fn test_entry_relative_path() {
        assert_eq!(
            entry_relative_path("a/./b.txt"),
            Some(PathBuf::from("a/b.txt"))
        );
        assert_eq!(entry_relative_path("a/../../b"), None);
        assert_eq!(entry_relative_path("..\\evil"), None);
        assert_eq!(entry_relative_path("C:/x"), None);
    }
}
