//! Interchangeable ways of producing the video bytes to ingest.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mime::Mime;
use snafu::{ResultExt, Snafu};

/// Video bytes ready for upload, with the metadata the upload needs.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    /// Raw container bytes
    pub bytes: Vec<u8>,
    /// Container MIME type
    pub mime_type: Mime,
    /// Display name for the uploaded resource
    pub display_name: String,
}

/// Errors that can occur while acquiring video bytes
#[derive(Debug, Snafu)]
pub enum AcquireError {
    /// A local path could not be read
    #[snafu(display("could not read video from '{}'", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The scratch directory for a download could not be created
    #[cfg(feature = "fetch")]
    #[snafu(display("could not create a scratch directory for the download"))]
    Scratch { source: std::io::Error },

    /// The external downloader failed
    #[cfg(feature = "fetch")]
    #[snafu(display("could not download video from '{url}'"))]
    Download {
        url: String,
        source: crate::fetch::Error,
    },
}

/// A source of video bytes.
///
/// Implementations cover the supported acquisition paths: a local file, an
/// in-memory buffer, and (with the `fetch` feature) a URL resolved through
/// the external downloader.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Produce the video bytes and their metadata.
    async fn acquire(&self) -> Result<MediaPayload, AcquireError>;
}

fn guess_mime(path: &Path) -> Mime {
    mime_guess::from_path(path).first_or_octet_stream()
}

fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string())
}

/// A video file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalVideo {
    path: PathBuf,
}

impl LocalVideo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MediaSource for LocalVideo {
    async fn acquire(&self) -> Result<MediaPayload, AcquireError> {
        let bytes = tokio::fs::read(&self.path).await.context(ReadSnafu {
            path: self.path.clone(),
        })?;

        Ok(MediaPayload {
            bytes,
            mime_type: guess_mime(&self.path),
            display_name: display_name_for(&self.path),
        })
    }
}

/// An in-memory video buffer.
#[derive(Debug, Clone)]
pub struct VideoBytes {
    bytes: Vec<u8>,
    mime_type: Mime,
    display_name: String,
}

impl VideoBytes {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        mime_type: Mime,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type,
            display_name: display_name.into(),
        }
    }
}

#[async_trait]
impl MediaSource for VideoBytes {
    async fn acquire(&self) -> Result<MediaPayload, AcquireError> {
        Ok(MediaPayload {
            bytes: self.bytes.clone(),
            mime_type: self.mime_type.clone(),
            display_name: self.display_name.clone(),
        })
    }
}

/// A video fetched from a URL through the external downloader.
///
/// The download lands in a scratch directory that is removed when
/// acquisition returns, whether it succeeded or not; only the bytes travel
/// onward.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct RemoteVideo {
    url: String,
    fetcher: crate::fetch::VideoFetcher,
}

#[cfg(feature = "fetch")]
impl RemoteVideo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fetcher: crate::fetch::VideoFetcher::default(),
        }
    }

    /// Use a customized downloader invocation.
    pub fn with_fetcher(mut self, fetcher: crate::fetch::VideoFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }
}

#[cfg(feature = "fetch")]
#[async_trait]
impl MediaSource for RemoteVideo {
    async fn acquire(&self) -> Result<MediaPayload, AcquireError> {
        let scratch = tempfile::tempdir().context(ScratchSnafu)?;

        let path = self
            .fetcher
            .fetch(&self.url, scratch.path())
            .await
            .context(DownloadSnafu {
                url: self.url.clone(),
            })?;

        let bytes = tokio::fs::read(&path)
            .await
            .context(ReadSnafu { path: path.clone() })?;

        Ok(MediaPayload {
            mime_type: guess_mime(&path),
            display_name: display_name_for(&path),
            bytes,
        })
    }
}
