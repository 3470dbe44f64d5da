//! In-memory gateway for tests.
//!
//! Deterministic: no real I/O, listing order is path order, and access can be
//! revoked per path to exercise failure handling.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::fs::gateway::{DirEntryInfo, DriveInfo, FileSystemGateway};

#[derive(Debug, Clone, Copy)]
struct FakeEntry {
    is_dir: bool,
    size: u64,
}

/// Fake filesystem keyed by absolute path.
#[derive(Debug, Default)]
pub struct FakeGateway {
    drives: Vec<PathBuf>,
    entries: RefCell<BTreeMap<PathBuf, FakeEntry>>,
    denied: RefCell<HashSet<PathBuf>>,
    list_calls: Cell<usize>,
}

impl FakeGateway {
    /// Creates a fake host exposing the given drive roots.
    pub fn new(drives: &[&str]) -> Self {
        let gw = Self {
            drives: drives.iter().map(PathBuf::from).collect(),
            ..Default::default()
        };
        for drive in drives {
            gw.add_dir(drive);
        }
        gw
    }

    pub fn add_dir(&self, path: &str) {
        self.entries.borrow_mut().insert(
            PathBuf::from(path),
            FakeEntry {
                is_dir: true,
                size: 0,
            },
        );
    }

    pub fn add_file(&self, path: &str, size: u64) {
        self.entries
            .borrow_mut()
            .insert(PathBuf::from(path), FakeEntry { is_dir: false, size });
    }

    /// Drop `path` behind the navigator's back, as another program would.
    pub fn remove(&self, path: &str) {
        self.entries.borrow_mut().remove(Path::new(path));
    }

    /// Every operation touching `path` or its direct children fails with access denied.
    pub fn deny(&self, path: &str) {
        self.denied.borrow_mut().insert(PathBuf::from(path));
    }

    pub fn allow(&self, path: &str) {
        self.denied.borrow_mut().remove(Path::new(path));
    }

    pub fn exists(&self, path: &str) -> bool {
        self.entries.borrow().contains_key(Path::new(path))
    }

    /// Number of `list_children` calls so far, failed ones included.
    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn drives(&self) -> Vec<DriveInfo> {
        self.enumerate_drives()
    }

    fn check_access(&self, path: &Path) -> Result<()> {
        let denied = self.denied.borrow();
        if denied.contains(path) || path.parent().is_some_and(|p| denied.contains(p)) {
            return Err(AppError::AccessDenied {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn entry(&self, path: &Path) -> Option<FakeEntry> {
        self.entries.borrow().get(path).copied()
    }

    fn has_children(&self, path: &Path) -> bool {
        self.entries
            .borrow()
            .keys()
            .any(|p| p.parent() == Some(path) && p != path)
    }
}

impl FileSystemGateway for FakeGateway {
    fn list_children(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.check_access(path)?;
        match self.entry(path) {
            None => {
                return Err(AppError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Some(e) if !e.is_dir => {
                return Err(AppError::Other {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::Other, "not a directory"),
                })
            }
            Some(_) => {}
        }

        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|(p, _)| p.parent() == Some(path) && p.as_path() != path)
            .map(|(p, e)| {
                let file_name = p.file_name().map(|n| n.to_os_string()).unwrap_or_default();
                DirEntryInfo {
                    name: file_name.to_string_lossy().to_string(),
                    file_name,
                    is_directory: e.is_dir,
                    size: (!e.is_dir).then_some(e.size),
                    modified_at: None,
                }
            })
            .collect())
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        self.check_access(path)?;
        if self.entry(path).is_some() {
            return Err(AppError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let parent_is_dir = path
            .parent()
            .and_then(|p| self.entry(p))
            .is_some_and(|e| e.is_dir);
        if !parent_is_dir {
            return Err(AppError::NotFound {
                path: path.to_path_buf(),
            });
        }
        self.entries.borrow_mut().insert(
            path.to_path_buf(),
            FakeEntry {
                is_dir: true,
                size: 0,
            },
        );
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.check_access(path)?;
        match self.entry(path) {
            None => Err(AppError::NotFound {
                path: path.to_path_buf(),
            }),
            Some(e) if e.is_dir => Err(AppError::Other {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "is a directory"),
            }),
            Some(_) => {
                self.entries.borrow_mut().remove(path);
                Ok(())
            }
        }
    }

    fn remove_directory(&self, path: &Path) -> Result<()> {
        self.check_access(path)?;
        match self.entry(path) {
            None => Err(AppError::NotFound {
                path: path.to_path_buf(),
            }),
            Some(e) if !e.is_dir => Err(AppError::Other {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "not a directory"),
            }),
            Some(_) if self.has_children(path) => Err(AppError::NotEmpty {
                path: path.to_path_buf(),
            }),
            Some(_) => {
                self.entries.borrow_mut().remove(path);
                Ok(())
            }
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.check_access(from)?;
        if self.entry(from).is_none() {
            return Err(AppError::NotFound {
                path: from.to_path_buf(),
            });
        }
        if self.entry(to).is_some() {
            return Err(AppError::AlreadyExists {
                path: to.to_path_buf(),
            });
        }
        let mut entries = self.entries.borrow_mut();
        let moved: Vec<PathBuf> = entries
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in moved {
            if let Some(entry) = entries.remove(&old) {
                let rel = old.strip_prefix(from).unwrap_or(Path::new(""));
                let new = if rel.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(rel)
                };
                entries.insert(new, entry);
            }
        }
        Ok(())
    }

    fn enumerate_drives(&self) -> Vec<DriveInfo> {
        self.drives
            .iter()
            .map(|path| DriveInfo {
                path: path.clone(),
                label: None,
            })
            .collect()
    }
}
