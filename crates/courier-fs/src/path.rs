use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Expand a leading `~` component to the current user's home directory.
///
/// Paths without a leading `~`, or hosts where the home directory cannot be
/// determined, are returned unchanged.
pub fn expand_home(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let mut components = path.components();

    if let Some(Component::Normal(first)) = components.next()
        && first == "~"
        && let Some(home) = home::home_dir()
    {
        return home.join(components.as_path());
    }

    path.to_path_buf()
}

/// Resolve the final path a resource named `default_filename` is written to.
///
/// A directory target gets `default_filename` appended. An existing target is
/// rejected with [`Error::AlreadyExists`] unless `force` is set; the check
/// happens before anything is written.
pub fn resolve_write_path(
    path: impl AsRef<Path>,
    default_filename: &str,
    force: bool,
) -> Result<PathBuf> {
    let mut path = expand_home(path);
    if path.is_dir() {
        path.push(default_filename);
    }

    if !force && path.exists() {
        return Err(Error::AlreadyExists(path));
    }

    Ok(path)
}
