//! Media ingestion: acquire video bytes from a source, upload them, and
//! poll until the service has finished processing.

pub mod source;

#[cfg(feature = "fetch")]
pub use source::RemoteVideo;
pub use source::{AcquireError, LocalVideo, MediaPayload, MediaSource, VideoBytes};

use std::time::Duration;

use snafu::{ensure, ResultExt, Snafu};
use tracing::{info, instrument};

use crate::{
    client::Error as ClientError,
    config::{Settings, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT},
    files::FileHandle,
    Gemini,
};

/// Video container subtypes accepted for ingestion.
const SUPPORTED_CONTAINERS: &[&str] = &["mp4", "mpeg", "quicktime", "x-msvideo", "webm"];

/// Errors that can occur while ingesting a video
#[derive(Debug, Snafu)]
pub enum Error {
    /// The source could not produce the video bytes
    #[snafu(display("could not acquire the video"))]
    Acquire { source: AcquireError },

    /// The payload is not a supported video container
    #[snafu(display("unsupported video container '{mime_type}'; expected one of mp4/mov/avi/webm/mpeg"))]
    UnsupportedContainer { mime_type: String },

    /// The upload itself was rejected
    #[snafu(display("video upload was rejected"))]
    Upload { source: Box<ClientError> },

    /// The video never reached the ready state (processing failed or the
    /// poll deadline expired)
    #[snafu(display("video never became ready for analysis"))]
    Processing { source: Box<ClientError> },
}

/// Uploads videos and polls them to readiness.
///
/// ```rust,ignore
/// let video = Ingestor::new(client.clone())
///     .with_poll_interval(Duration::from_secs(2))
///     .ingest(&LocalVideo::new("talk.mp4"))
///     .await?;
/// ```
pub struct Ingestor {
    client: Gemini,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl Ingestor {
    /// Create an ingestor with the default poll interval and deadline.
    pub fn new(client: Gemini) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Create an ingestor tuned from resolved [`Settings`].
    pub fn from_settings(client: Gemini, settings: &Settings) -> Self {
        Self {
            client,
            poll_interval: settings.poll_interval,
            poll_timeout: settings.poll_timeout,
        }
    }

    /// Interval between readiness polls. Two to five seconds is a sensible
    /// range; shorter intervals only add request volume.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Deadline for the video to finish remote processing.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Acquire a video from `source`, upload it, and poll until the service
    /// reports it ready.
    ///
    /// The returned handle is guaranteed to be in the active state. Every
    /// failure path (acquisition, an unsupported container, a rejected
    /// upload, remote processing failure, deadline expiry) surfaces as an
    /// [`Error`] and no session is started.
    #[instrument(skip_all)]
    pub async fn ingest<S: MediaSource + ?Sized>(&self, source: &S) -> Result<FileHandle, Error> {
        let payload = source.acquire().await.context(AcquireSnafu)?;

        let mime_type = payload.mime_type.clone();
        ensure!(
            mime_type.type_() == mime::VIDEO
                && SUPPORTED_CONTAINERS.contains(&mime_type.subtype().as_str()),
            UnsupportedContainerSnafu {
                mime_type: mime_type.to_string(),
            }
        );

        info!(
            size = payload.bytes.len(),
            mime = %mime_type,
            display_name = %payload.display_name,
            "uploading video"
        );

        let mut handle = self
            .client
            .create_file(payload.bytes)
            .display_name(payload.display_name)
            .with_mime_type(mime_type)
            .upload()
            .await
            .map_err(Box::new)
            .context(UploadSnafu)?;

        handle
            .wait_until_active(self.poll_interval, self.poll_timeout)
            .await
            .map_err(Box::new)
            .context(ProcessingSnafu)?;

        Ok(handle)
    }
}
