use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::{Streamable, attachment_url, read_all, save_streamed, spoiler_filename};
use crate::data_uri::parse_data_uri;
use crate::error::Result;
use crate::handle::{Opener, ReaderHandle};
use crate::mime::guess_mimetype_from_filename;
use crate::naming::generate_filename_from_details;
use crate::options::{SaveOptions, StreamOptions};
use crate::source::LazySource;

const FALLBACK_MIMETYPE: &str = "text/plain;charset=UTF-8";

/// Content held in memory: a byte buffer or a lazy chunk producer.
///
/// ```
/// use courier_files::{InMemoryResource, Streamable};
///
/// let resource = InMemoryResource::new(b"GIF89a...".to_vec(), "dance.gif").spoiler(true);
/// assert_eq!(resource.filename(), "SPOILER_dance.gif");
/// assert_eq!(resource.mimetype(), "image/gif");
/// ```
#[derive(Clone)]
pub struct InMemoryResource {
    data: LazySource,
    filename: String,
    mimetype: String,
    spoiler: bool,
}

impl InMemoryResource {
    /// The mimetype is guessed from `filename`, falling back to UTF-8 text.
    pub fn new(data: impl Into<LazySource>, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let mimetype = guess_mimetype_from_filename(&filename)
            .unwrap_or(FALLBACK_MIMETYPE)
            .to_owned();

        Self {
            data: data.into(),
            filename,
            mimetype,
            spoiler: false,
        }
    }

    #[must_use]
    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = mimetype.into();
        self
    }

    /// Prefix the visible filename with [`SPOILER_TAG`](crate::SPOILER_TAG).
    #[must_use]
    pub fn spoiler(mut self, spoiler: bool) -> Self {
        self.spoiler = spoiler;
        self
    }

    /// Decode a `data:` URI. Without `filename` one is generated from the
    /// decoded mimetype.
    pub fn from_data_uri(uri: &str, filename: Option<&str>) -> Result<Self> {
        let decoded = parse_data_uri(uri)?;
        let filename = match filename {
            Some(filename) => filename.to_owned(),
            None => generate_filename_from_details(
                Some(decoded.mimetype.as_str()),
                None,
                Some(decoded.data.as_ref()),
            ),
        };

        Ok(Self::new(decoded.data, filename).with_mimetype(decoded.mimetype))
    }

    pub fn data(&self) -> &LazySource { &self.data }

    pub fn mimetype(&self) -> &str { &self.mimetype }

    pub fn is_spoiler(&self) -> bool { self.spoiler }

    pub async fn read(&self, options: &StreamOptions) -> Result<Bytes> {
        if let Some(data) = self.data.as_buffer() {
            return Ok(data.clone());
        }
        read_all(self.stream(options)).await
    }

    /// See [`Resource::save`](crate::Resource::save). A byte buffer is written
    /// in one call.
    pub async fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<PathBuf> {
        let Some(data) = self.data.as_buffer() else {
            return save_streamed(self.stream(&options.stream), self.filename(), path.as_ref(), options)
                .await;
        };

        let executor = options.stream.resolve_executor()?;
        let data = data.clone();
        let target = path.as_ref().to_path_buf();
        let filename = self.filename();
        let force = options.force;

        Ok(executor
            .run(move || courier_fs::write_bytes(target, &filename, &data, force))
            .await??)
    }
}

impl Streamable for InMemoryResource {
    fn url(&self) -> String { attachment_url(&self.filename()) }

    fn filename(&self) -> String { spoiler_filename(self.filename.clone(), self.spoiler) }

    fn stream(&self, options: &StreamOptions) -> ReaderHandle {
        let opener = Opener::Memory {
            source: self.data.clone(),
            mimetype: self.mimetype.clone(),
        };
        ReaderHandle::new(self.filename(), opener, options)
    }
}
