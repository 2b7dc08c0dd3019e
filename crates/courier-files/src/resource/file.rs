use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::{Streamable, attachment_url, read_all, spoiler_filename};
use crate::error::Result;
use crate::handle::{Opener, ReaderHandle};
use crate::options::{SaveOptions, StreamOptions};

/// A file on the local filesystem.
///
/// The path is stored as given; `~` is expanded only when the file is opened.
#[derive(Clone)]
pub struct LocalFileResource {
    path: PathBuf,
    filename: Option<String>,
    spoiler: bool,
}

impl LocalFileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            filename: None,
            spoiler: false,
        }
    }

    /// Use `filename` instead of the final path component.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Prefix the visible filename with [`SPOILER_TAG`](crate::SPOILER_TAG).
    #[must_use]
    pub fn spoiler(mut self, spoiler: bool) -> Self {
        self.spoiler = spoiler;
        self
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn is_spoiler(&self) -> bool { self.spoiler }

    pub async fn read(&self, options: &StreamOptions) -> Result<Bytes> {
        read_all(self.stream(options)).await
    }

    /// Copy the file to `path`. See [`Resource::save`](crate::Resource::save).
    pub async fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<PathBuf> {
        let executor = options.stream.resolve_executor()?;
        let source = self.path.clone();
        let target = path.as_ref().to_path_buf();
        let filename = self.filename();
        let force = options.force;

        let saved = executor
            .run(move || courier_fs::copy_to(source, target, &filename, force))
            .await??;
        tracing::debug!(source = %self.path.display(), target = %saved.display(), "copied file");
        Ok(saved)
    }

    fn base_filename(&self) -> String {
        match &self.filename {
            Some(filename) => filename.clone(),
            None => self
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

impl Streamable for LocalFileResource {
    fn url(&self) -> String { attachment_url(&self.filename()) }

    fn filename(&self) -> String { spoiler_filename(self.base_filename(), self.spoiler) }

    fn stream(&self, options: &StreamOptions) -> ReaderHandle {
        let opener = Opener::File {
            path: self.path.clone(),
        };
        ReaderHandle::new(self.filename(), opener, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_path() {
        let resource = LocalFileResource::new("/tmp/foo.txt");
        assert_eq!(resource.filename(), "foo.txt");
        assert_eq!(resource.url(), "attachment://foo.txt");
    }

    #[test]
    fn test_spoiler() {
        let resource = LocalFileResource::new("/tmp/foo.txt").spoiler(true);
        assert_eq!(resource.filename(), "SPOILER_foo.txt");
        assert_eq!(resource.filename(), resource.filename());
        assert_eq!(resource.url(), "attachment://SPOILER_foo.txt");
        assert_eq!(resource.path(), Path::new("/tmp/foo.txt"));
    }

    #[test]
    fn test_explicit_filename() {
        let resource = LocalFileResource::new("~/data.bin").with_filename("upload.bin");
        assert_eq!(resource.filename(), "upload.bin");
        assert_eq!(resource.path(), Path::new("~/data.bin"));
    }

    #[tokio::test]
    async fn test_read_and_copy() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.txt");
        std::fs::write(&source, b"contents").unwrap();

        let resource = LocalFileResource::new(&source);
        assert_eq!(&resource.read(&StreamOptions::default()).await.unwrap()[..], b"contents");

        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let saved = resource.save(&out, &SaveOptions::new()).await.unwrap();
        assert_eq!(saved, out.join("in.txt"));
        assert_eq!(std::fs::read(saved).unwrap(), b"contents");
    }
}
