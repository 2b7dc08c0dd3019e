use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::{Streamable, read_all, save_streamed};
use crate::error::Result;
use crate::handle::{Opener, ReaderHandle};
use crate::naming::generate_filename_from_details;
use crate::options::{SaveOptions, StreamOptions};

/// A resource behind an HTTP(S) URL.
///
/// The filename is the last segment of the URL path. A URL whose path ends in
/// `/` gets a generated name instead.
///
/// ```
/// use courier_files::{RemoteResource, Streamable};
///
/// let resource = RemoteResource::new("https://example.com/media/cat.png?size=64");
/// assert_eq!(resource.filename(), "cat.png");
/// ```
#[derive(Clone)]
pub struct RemoteResource {
    url: String,
    filename: String,
}

impl RemoteResource {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let filename = match filename_from_url(&url) {
            segment if segment.is_empty() => generate_filename_from_details(None, None, None),
            segment => segment,
        };
        Self { url, filename }
    }

    /// Use `filename` instead of the last segment of the URL path.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub async fn read(&self, options: &StreamOptions) -> Result<Bytes> {
        read_all(self.stream(options)).await
    }

    pub async fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<PathBuf> {
        save_streamed(self.stream(&options.stream), self.filename(), path.as_ref(), options).await
    }
}

impl Streamable for RemoteResource {
    fn url(&self) -> String { self.url.clone() }

    fn filename(&self) -> String { self.filename.clone() }

    fn stream(&self, options: &StreamOptions) -> ReaderHandle {
        let opener = Opener::Remote {
            url: self.url.clone(),
        };
        ReaderHandle::new(self.filename(), opener, options)
    }
}

/// Last segment of the URL path, as written (no percent-decoding).
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url)
        && let Some(mut segments) = parsed.path_segments()
    {
        return segments.next_back().unwrap_or_default().to_owned();
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').next().unwrap_or_default().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("https://example.com/a.png"), "a.png");
        assert_eq!(filename_from_url("https://example.com/dir/b.gif#frag"), "b.gif");
        assert_eq!(filename_from_url("https://example.com/x%20y.txt"), "x%20y.txt");
        assert_eq!(filename_from_url("https://example.com/"), "");
        assert_eq!(filename_from_url("not a url/c.txt?q=1"), "c.txt");
    }

    #[test]
    fn test_explicit_filename_wins() {
        let resource = RemoteResource::new("https://example.com/a.png").with_filename("b.png");
        assert_eq!(resource.filename(), "b.png");
        assert_eq!(resource.url(), "https://example.com/a.png");
        assert_eq!(resource.filename(), resource.filename());
    }

    #[test]
    fn test_trailing_slash_gets_generated_name() {
        let resource = RemoteResource::new("https://example.com/media/");
        let filename = resource.filename();
        assert!(!filename.is_empty());
        assert_eq!(resource.filename(), filename);
        assert_eq!(resource.clone().filename(), filename);
    }
}
