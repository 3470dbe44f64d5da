use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
///
/// Filesystem failures always carry the path that was attempted so the
/// presentation layer can report both what was tried and why it failed.
#[derive(Debug, Error)]
pub enum AppError {
    /// The host refused access to the path.
    #[error("Access denied: {}", path.display())]
    AccessDenied { path: PathBuf },

    /// The path does not exist (any more).
    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Something already occupies the target path.
    #[error("Already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// Directory removal is non-recursive and the directory has contents.
    #[error("Directory not empty: {}", path.display())]
    NotEmpty { path: PathBuf },

    /// A sibling with this name is already present in the cached listing.
    #[error("An item named '{name}' already exists in {}", dir.display())]
    DuplicateName { name: String, dir: PathBuf },

    /// The name cannot be used as a single path component.
    #[error("Invalid name: '{name}'")]
    InvalidName { name: String },

    /// The operation is not valid for this node or location.
    #[error("{reason}: {}", path.display())]
    NotAllowed { path: PathBuf, reason: &'static str },

    /// Unexpected host error.
    #[error("{}: {source}", path.display())]
    Other {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O errors outside of gateway calls (terminal, config).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl AppError {
    /// Map a host I/O error for `path` onto the error taxonomy.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::PermissionDenied => AppError::AccessDenied { path },
            io::ErrorKind::NotFound => AppError::NotFound { path },
            io::ErrorKind::AlreadyExists => AppError::AlreadyExists { path },
            io::ErrorKind::DirectoryNotEmpty => AppError::NotEmpty { path },
            _ => AppError::Other { path, source: err },
        }
    }

    /// Human-readable category for the presentation layer.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::AccessDenied { .. } => "Access denied",
            AppError::NotFound { .. } => "Not found",
            AppError::AlreadyExists { .. } => "Already exists",
            AppError::NotEmpty { .. } => "Not empty",
            AppError::DuplicateName { .. } => "Duplicate name",
            AppError::InvalidName { .. } => "Invalid name",
            AppError::NotAllowed { .. } => "Not allowed",
            AppError::Other { .. } | AppError::Io(_) => "Error",
            AppError::Terminal(_) => "Terminal error",
            AppError::InvalidPath(_) => "Invalid path",
        }
    }

    /// The path the failed operation was attempting, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            AppError::AccessDenied { path }
            | AppError::NotFound { path }
            | AppError::AlreadyExists { path }
            | AppError::NotEmpty { path }
            | AppError::NotAllowed { path, .. }
            | AppError::Other { path, .. } => Some(path),
            AppError::DuplicateName { dir, .. } => Some(dir),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::Interrupted, "terminal went away");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("terminal went away"));
    }

    #[test]
    fn from_io_maps_permission_denied() {
        let err = io::Error::from(io::ErrorKind::PermissionDenied);
        let app_err = AppError::from_io(err, Path::new("/root/secret"));
        assert!(matches!(app_err, AppError::AccessDenied { .. }));
        assert_eq!(app_err.to_string(), "Access denied: /root/secret");
        assert_eq!(app_err.category(), "Access denied");
    }

    #[test]
    fn from_io_maps_not_found_and_exists() {
        let nf = AppError::from_io(io::Error::from(io::ErrorKind::NotFound), Path::new("/a"));
        assert!(matches!(nf, AppError::NotFound { .. }));
        let ae = AppError::from_io(io::Error::from(io::ErrorKind::AlreadyExists), Path::new("/a"));
        assert!(matches!(ae, AppError::AlreadyExists { .. }));
    }

    #[test]
    fn from_io_maps_directory_not_empty() {
        let err = io::Error::from(io::ErrorKind::DirectoryNotEmpty);
        let app_err = AppError::from_io(err, Path::new("/full"));
        assert!(matches!(app_err, AppError::NotEmpty { .. }));
    }

    #[test]
    fn from_io_unknown_kind_keeps_source() {
        let err = io::Error::new(io::ErrorKind::Unsupported, "no such op");
        let app_err = AppError::from_io(err, Path::new("/dev/x"));
        assert!(matches!(app_err, AppError::Other { .. }));
        let msg = app_err.to_string();
        assert!(msg.contains("/dev/x"));
        assert!(msg.contains("no such op"));
        assert_eq!(app_err.path(), Some(Path::new("/dev/x")));
    }

    #[test]
    fn duplicate_name_display() {
        let err = AppError::DuplicateName {
            name: "B".into(),
            dir: PathBuf::from("/data"),
        };
        assert_eq!(err.to_string(), "An item named 'B' already exists in /data");
        assert_eq!(err.category(), "Duplicate name");
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn invalid_path_error_display() {
        let err = AppError::InvalidPath("/nonexistent".into());
        assert_eq!(err.to_string(), "Invalid path: /nonexistent");
        assert!(err.path().is_none());
    }
}
