use std::io::Cursor;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::naming::generate_filename_from_details;
use crate::resource::{InMemoryResource, LocalFileResource, RemoteResource, Resource};
use crate::source::{Rawish, unwrap_bytes};

/// Anything [`ensure_resource`] can turn into a [`Resource`].
#[derive(Debug, Clone)]
pub enum Resourceish {
    Resource(Resource),
    Path(PathBuf),
    Str(String),
    Raw(Rawish),
}

impl From<Resource> for Resourceish {
    fn from(resource: Resource) -> Self { Resourceish::Resource(resource) }
}

impl From<RemoteResource> for Resourceish {
    fn from(resource: RemoteResource) -> Self { Resourceish::Resource(resource.into()) }
}

impl From<LocalFileResource> for Resourceish {
    fn from(resource: LocalFileResource) -> Self { Resourceish::Resource(resource.into()) }
}

impl From<InMemoryResource> for Resourceish {
    fn from(resource: InMemoryResource) -> Self { Resourceish::Resource(resource.into()) }
}

impl From<&str> for Resourceish {
    fn from(value: &str) -> Self { Resourceish::Str(value.to_owned()) }
}

impl From<String> for Resourceish {
    fn from(value: String) -> Self { Resourceish::Str(value) }
}

impl From<&Path> for Resourceish {
    fn from(path: &Path) -> Self { Resourceish::Path(path.to_path_buf()) }
}

impl From<PathBuf> for Resourceish {
    fn from(path: PathBuf) -> Self { Resourceish::Path(path) }
}

impl From<Rawish> for Resourceish {
    fn from(raw: Rawish) -> Self { Resourceish::Raw(raw) }
}

impl From<Bytes> for Resourceish {
    fn from(data: Bytes) -> Self { Resourceish::Raw(data.into()) }
}

impl From<Vec<u8>> for Resourceish {
    fn from(data: Vec<u8>) -> Self { Resourceish::Raw(data.into()) }
}

impl From<&[u8]> for Resourceish {
    fn from(data: &[u8]) -> Self { Resourceish::Raw(data.into()) }
}

impl<const N: usize> From<&[u8; N]> for Resourceish {
    fn from(data: &[u8; N]) -> Self { Resourceish::Raw(data.into()) }
}

impl From<Cursor<Vec<u8>>> for Resourceish {
    fn from(buffer: Cursor<Vec<u8>>) -> Self { Resourceish::Raw(buffer.into()) }
}

impl From<Cursor<String>> for Resourceish {
    fn from(buffer: Cursor<String>) -> Self { Resourceish::Raw(buffer.into()) }
}

/// Classify `input` as a resource.
///
/// In order of precedence:
///
/// 1. a [`Resource`] is returned unchanged;
/// 2. raw bytes become an [`InMemoryResource`] with a generated filename;
/// 3. strings starting with `http://` or `https://` become a [`RemoteResource`];
/// 4. strings starting with `data:` are decoded into an [`InMemoryResource`].
///    A `data:` string that fails to decode is treated as a path instead;
/// 5. anything else is a [`LocalFileResource`].
///
/// Scheme prefixes win over paths, so a local file literally named
/// `https://...` cannot be reached through this function.
///
/// ```
/// use courier_files::{Streamable, ensure_resource};
///
/// let resource = ensure_resource("https://example.com/a.png");
/// assert!(resource.is_remote());
/// assert_eq!(resource.filename(), "a.png");
/// ```
pub fn ensure_resource(input: impl Into<Resourceish>) -> Resource {
    match input.into() {
        Resourceish::Resource(resource) => resource,
        Resourceish::Raw(raw) => {
            let data = unwrap_bytes(raw);
            let filename = generate_filename_from_details(None, None, Some(data.as_ref()));
            InMemoryResource::new(data, filename).into()
        }
        Resourceish::Str(value) => classify_str(value),
        Resourceish::Path(path) => match path.into_os_string().into_string() {
            Ok(value) => classify_str(value),
            Err(raw) => LocalFileResource::new(raw).into(),
        },
    }
}

fn classify_str(value: String) -> Resource {
    if value.starts_with("http://") || value.starts_with("https://") {
        return RemoteResource::new(value).into();
    }

    if value.starts_with("data:") {
        match InMemoryResource::from_data_uri(&value, None) {
            Ok(resource) => return resource.into(),
            Err(err) => {
                tracing::debug!(error = %err, "undecodable data URI, treating it as a path");
            }
        }
    }

    LocalFileResource::new(value).into()
}

/// Expand a path-like value the way [`ensure_resource`] would open it.
pub fn ensure_path(path: impl AsRef<Path>) -> PathBuf { courier_fs::expand_home(path) }
