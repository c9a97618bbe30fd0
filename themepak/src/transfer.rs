//! File transfer primitives.
//!
//! Recursive copy/remove helpers used by every package operation. A copy
//! error always means the destination is unreliable; callers decide whether
//! that aborts the surrounding operation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Result type for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

/// A failed file transfer step, carrying the path it failed on.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Source could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Destination could not be created or written.
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// Directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// File or directory could not be removed.
    #[error("failed to remove {}: {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },
}

impl TransferError {
    /// The path the failure occurred on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Remove { path, .. } => path,
        }
    }
}

/// Copy a single file, preserving its permission bits.
///
/// Missing parent directories of `dst` are created. An existing `dst` is
/// truncated.
pub fn copy_file(src: &Path, dst: &Path) -> TransferResult<u64> {
    let source = File::open(src).map_err(|e| TransferError::Read {
        path: src.to_path_buf(),
        source: e,
    })?;
    let permissions = source
        .metadata()
        .map_err(|e| TransferError::Read {
            path: src.to_path_buf(),
            source: e,
        })?
        .permissions();

    if let Some(parent) = dst.parent() {
        create_dir_all(parent)?;
    }

    let target = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dst)
        .map_err(|e| TransferError::Write {
            path: dst.to_path_buf(),
            source: e,
        })?;

    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(target);
    let bytes = io::copy(&mut reader, &mut writer).map_err(|e| TransferError::Write {
        path: dst.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| TransferError::Write {
        path: dst.to_path_buf(),
        source: e,
    })?;

    fs::set_permissions(dst, permissions).map_err(|e| TransferError::Write {
        path: dst.to_path_buf(),
        source: e,
    })?;

    Ok(bytes)
}

/// Recursively copy a directory tree.
///
/// Directory modes are preserved. The first failing child aborts the whole
/// copy. Returns the number of files copied.
pub fn copy_directory(src: &Path, dst: &Path) -> TransferResult<usize> {
    copy_directory_filtered(src, dst, &|_| false)
}

/// Recursively copy a directory tree, skipping selected entries.
///
/// `skip` receives each entry's path relative to `src`; returning `true`
/// leaves that file (or whole subtree) out of the copy.
pub fn copy_directory_filtered(
    src: &Path,
    dst: &Path,
    skip: &dyn Fn(&Path) -> bool,
) -> TransferResult<usize> {
    copy_tree(src, dst, Path::new(""), skip)
}

fn copy_tree(
    src_root: &Path,
    dst_root: &Path,
    relative: &Path,
    skip: &dyn Fn(&Path) -> bool,
) -> TransferResult<usize> {
    let src = src_root.join(relative);
    let dst = dst_root.join(relative);

    let metadata = fs::metadata(&src).map_err(|e| TransferError::Read {
        path: src.clone(),
        source: e,
    })?;
    create_dir_all(&dst)?;

    let mut entries: Vec<_> = fs::read_dir(&src)
        .map_err(|e| TransferError::Read {
            path: src.clone(),
            source: e,
        })?
        .collect::<Result<_, _>>()
        .map_err(|e| TransferError::Read {
            path: src.clone(),
            source: e,
        })?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut copied = 0;
    for entry in entries {
        let child = relative.join(entry.file_name());
        if skip(&child) {
            continue;
        }
        let file_type = entry.file_type().map_err(|e| TransferError::Read {
            path: entry.path(),
            source: e,
        })?;
        if file_type.is_dir() {
            copied += copy_tree(src_root, dst_root, &child, skip)?;
        } else {
            copy_file(&entry.path(), &dst_root.join(&child))?;
            copied += 1;
        }
    }

    // Mode last: a read-only directory must still receive its children.
    fs::set_permissions(&dst, metadata.permissions()).map_err(|e| TransferError::Write {
        path: dst.clone(),
        source: e,
    })?;

    Ok(copied)
}

/// Recursively remove a directory; a missing path is not an error.
pub fn remove_directory(path: &Path) -> TransferResult<()> {
    match fs::symlink_metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TransferError::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).map_err(|e| TransferError::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
        Ok(_) => fs::remove_file(path).map_err(|e| TransferError::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Remove a single file; a missing file is not an error.
pub fn remove_file(path: &Path) -> TransferResult<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(TransferError::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
        _ => Ok(()),
    }
}

/// Remove a directory if present and recreate it empty.
pub fn replace_directory(path: &Path) -> TransferResult<()> {
    remove_directory(path)?;
    create_dir_all(path)
}

/// Remove every entry of a directory not selected by `keep`.
///
/// `keep` receives the entry's file name. The directory is created when
/// missing. Returns the number of entries removed.
pub fn clean_directory(path: &Path, keep: &dyn Fn(&str) -> bool) -> TransferResult<usize> {
    create_dir_all(path)?;
    let entries = fs::read_dir(path).map_err(|e| TransferError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if keep(&name) {
            continue;
        }
        remove_directory(&entry.path())?;
        removed += 1;
    }
    Ok(removed)
}

/// Create a directory and its parents.
pub fn create_dir_all(path: &Path) -> TransferResult<()> {
    fs::create_dir_all(path).map_err(|e| TransferError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Count files recursively in a directory; a missing directory counts as empty.
pub fn count_files(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}

/// Relative paths of every file below `dir`, sorted; a missing directory is empty.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    fn walk(root: &Path, relative: &Path, files: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(root.join(relative)) else {
            return;
        };
        for entry in entries.flatten() {
            let child = relative.join(entry.file_name());
            if entry.path().is_dir() {
                walk(root, &child, files);
            } else {
                files.push(child);
            }
        }
    }

    let mut files = Vec::new();
    walk(dir, Path::new(""), &mut files);
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn test_copy_file_creates_parents_and_preserves_mode() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("run.sh");
        fs::write(&src, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o755)).unwrap();

        let dst = temp.path().join("a/b/run.sh");
        let bytes = copy_file(&src, &dst).unwrap();

        assert_eq!(bytes, 10);
        assert_eq!(fs::read(&dst).unwrap(), b"#!/bin/sh\n");
        let mode = fs::metadata(&dst).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_copy_file_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = copy_file(&temp.path().join("nope"), &temp.path().join("dst")).unwrap_err();
        assert!(matches!(err, TransferError::Read { .. }));
        assert!(!temp.path().join("dst").exists());
    }

    #[test]
    fn test_copy_file_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src.txt");
        let dst = temp.path().join("dst.txt");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old and longer").unwrap();

        copy_file(&src, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn test_copy_directory_recursive() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("x/y")).unwrap();
        fs::write(src.join("top.txt"), "1").unwrap();
        fs::write(src.join("x/mid.txt"), "2").unwrap();
        fs::write(src.join("x/y/deep.txt"), "3").unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();

        let dst = temp.path().join("dst");
        let copied = copy_directory(&src, &dst).unwrap();

        assert_eq!(copied, 3);
        assert_eq!(fs::read_to_string(dst.join("x/y/deep.txt")).unwrap(), "3");
        assert!(dst.join("empty").is_dir());
    }

    #[test]
    fn test_copy_directory_filtered_skips_subtrees() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("Icons/ToolIcons")).unwrap();
        fs::create_dir_all(src.join("Icons/SystemIcons")).unwrap();
        fs::write(src.join("Icons/ToolIcons/Clock.png"), "t").unwrap();
        fs::write(src.join("Icons/SystemIcons/Game Boy (GB).png"), "s").unwrap();

        let dst = temp.path().join("dst");
        let copied = copy_directory_filtered(&src, &dst, &|rel| {
            rel.starts_with("Icons/ToolIcons")
        })
        .unwrap();

        assert_eq!(copied, 1);
        assert!(!dst.join("Icons/ToolIcons").exists());
        assert!(dst.join("Icons/SystemIcons/Game Boy (GB).png").exists());
    }

    #[test]
    fn test_remove_directory_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        assert!(remove_directory(&temp.path().join("missing")).is_ok());
    }

    #[test]
    fn test_replace_directory_empties() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("live");
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("sub/f"), "x").unwrap();

        replace_directory(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_clean_directory_keeps_selected() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".media");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("bg.png"), "bg").unwrap();
        fs::write(dir.join("Clock.png"), "icon").unwrap();
        fs::write(dir.join("Files.png"), "icon").unwrap();

        let removed = clean_directory(&dir, &|name| name == "bg.png").unwrap();
        assert_eq!(removed, 2);
        assert!(dir.join("bg.png").exists());
        assert!(!dir.join("Clock.png").exists());
    }

    #[test]
    fn test_count_files() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/1"), "").unwrap();
        fs::write(temp.path().join("a/b/2"), "").unwrap();
        assert_eq!(count_files(temp.path()), 2);
        assert_eq!(count_files(&temp.path().join("missing")), 0);
    }

    #[test]
    fn test_list_files_relative_and_sorted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("b/c")).unwrap();
        fs::write(temp.path().join("b/c/2.png"), "").unwrap();
        fs::write(temp.path().join("a.txt"), "").unwrap();
        assert_eq!(
            list_files(temp.path()),
            vec![PathBuf::from("a.txt"), PathBuf::from("b/c/2.png")]
        );
    }
}
