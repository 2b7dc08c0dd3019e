use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("file {} already exists; use force to overwrite", .0.display())]
    AlreadyExists(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Error {
    let path = path.into();
    match err.kind() {
        io::ErrorKind::NotFound => Error::NotFound(path),
        io::ErrorKind::PermissionDenied => Error::PermissionDenied(path),
        io::ErrorKind::AlreadyExists => Error::AlreadyExists(path),
        io::ErrorKind::IsADirectory => Error::IsDirectory(path),
        _ => Error::Io { path, source: err },
    }
}

impl Error {
    /// The path the failed operation was working on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::NotFound(path)
            | Error::IsDirectory(path)
            | Error::AlreadyExists(path)
            | Error::PermissionDenied(path)
            | Error::Io { path, .. } => path,
        }
    }
}
