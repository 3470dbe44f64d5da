use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{AppError, Result};

/// One entry returned by a directory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntryInfo {
    /// Name as the host stores it; the node path is built from this.
    pub file_name: OsString,
    /// Display form of `file_name`, lossy for names that are not UTF-8.
    pub name: String,
    pub is_directory: bool,
    /// Byte size; `None` for directories.
    pub size: Option<u64>,
    pub modified_at: Option<DateTime<Local>>,
}

/// A drive or volume offered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveInfo {
    pub path: PathBuf,
    pub label: Option<String>,
}

/// Boundary adapter between the tree model and the host filesystem.
///
/// Implementations hold no navigation state. Every failure is returned as a
/// typed [`AppError`] carrying the attempted path.
pub trait FileSystemGateway {
    /// List the immediate children of a directory.
    fn list_children(&self, path: &Path) -> Result<Vec<DirEntryInfo>>;

    /// Create a single directory. The parent must exist.
    fn create_directory(&self, path: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove an empty directory. Never recursive.
    fn remove_directory(&self, path: &Path) -> Result<()>;

    /// Rename within the same directory. Fails if `to` already exists.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn enumerate_drives(&self) -> Vec<DriveInfo>;
}

impl<G: FileSystemGateway + ?Sized> FileSystemGateway for Box<G> {
    fn list_children(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        (**self).list_children(path)
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        (**self).create_directory(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        (**self).remove_file(path)
    }

    fn remove_directory(&self, path: &Path) -> Result<()> {
        (**self).remove_directory(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        (**self).rename(from, to)
    }

    fn enumerate_drives(&self) -> Vec<DriveInfo> {
        (**self).enumerate_drives()
    }
}

/// Gateway backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeGateway;

impl NativeGateway {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystemGateway for NativeGateway {
    /// Entries whose metadata cannot be read (broken symlinks, races with
    /// concurrent deletes) are skipped rather than failing the listing.
    fn list_children(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        let entries = fs::read_dir(path).map_err(|e| AppError::from_io(e, path))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(dir = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let entry_path = entry.path();
            // Follows symlinks so a link to a directory lists as a folder.
            let metadata = match fs::metadata(&entry_path) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(path = %entry_path.display(), error = %e, "skipping entry without metadata");
                    continue;
                }
            };
            let is_directory = metadata.is_dir();
            let file_name = entry.file_name();
            children.push(DirEntryInfo {
                name: file_name.to_string_lossy().to_string(),
                file_name,
                is_directory,
                size: (!is_directory).then(|| metadata.len()),
                modified_at: metadata.modified().ok().map(DateTime::<Local>::from),
            });
        }
        Ok(children)
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir(path).map_err(|e| AppError::from_io(e, path))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| AppError::from_io(e, path))
    }

    fn remove_directory(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path).map_err(|e| AppError::from_io(e, path))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        // fs::rename silently replaces an existing file on Unix.
        if fs::symlink_metadata(to).is_ok() {
            return Err(AppError::AlreadyExists {
                path: to.to_path_buf(),
            });
        }
        fs::rename(from, to).map_err(|e| AppError::from_io(e, from))
    }

    fn enumerate_drives(&self) -> Vec<DriveInfo> {
        host_drives()
    }
}

#[cfg(windows)]
fn host_drives() -> Vec<DriveInfo> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|path| path.exists())
        .map(|path| DriveInfo { path, label: None })
        .collect()
}

#[cfg(not(windows))]
fn host_drives() -> Vec<DriveInfo> {
    vec![DriveInfo {
        path: PathBuf::from("/"),
        label: None,
    }]
}

/// Format a byte count the way listings display it, e.g. `"1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} PB", size)
}

/// Whether `name` can be used as a single path component in a directory.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains(std::path::MAIN_SEPARATOR)
        && !name.contains('\0')
}
