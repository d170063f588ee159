use std::sync::Arc;
use std::time::{Duration, Instant};

use snafu::OptionExt;
use tracing::{info, instrument};

use crate::client::{Error, FileFailedSnafu, FileTimeoutSnafu, GeminiClient, IncompleteFileSnafu};
use crate::files::model::{File, FileState};
use crate::models::FileData;

/// A handle to an uploaded file resource.
///
/// The handle carries the last metadata observed from the service. After
/// upload the file is typically still processing; use
/// [`wait_until_active`](Self::wait_until_active) to poll until the service
/// reports a terminal state.
#[derive(Debug, Clone)]
pub struct FileHandle {
    client: Arc<GeminiClient>,
    file: File,
}

impl FileHandle {
    pub(crate) fn new(client: Arc<GeminiClient>, file: File) -> Self {
        Self { client, file }
    }

    /// Resource name, e.g. `files/abc-123`.
    pub fn name(&self) -> &str {
        &self.file.name
    }

    /// Display name provided at upload time.
    pub fn display_name(&self) -> Option<&str> {
        self.file.display_name.as_deref()
    }

    /// URI used to reference the file in generation requests.
    pub fn uri(&self) -> Option<&str> {
        self.file.uri.as_deref()
    }

    /// Last observed processing state.
    pub fn state(&self) -> FileState {
        self.file.state
    }

    /// Full metadata as last observed.
    pub fn meta(&self) -> &File {
        &self.file
    }

    /// Typed reference for embedding this file in a message.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::IncompleteFile`] when the service has not yet
    /// reported a MIME type and URI for the file.
    pub fn file_data(&self) -> Result<FileData, Error> {
        let mime_type = self.file.mime_type.as_ref().context(IncompleteFileSnafu {
            name: self.file.name.clone(),
        })?;
        let uri = self.file.uri.as_deref().context(IncompleteFileSnafu {
            name: self.file.name.clone(),
        })?;
        Ok(FileData::new(mime_type.to_string(), uri))
    }

    /// Re-fetch the file metadata from the service.
    #[instrument(skip_all, fields(file.name = %self.file.name))]
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.file = self.client.get_file(&self.file.name).await?;
        Ok(())
    }

    /// Poll the service until the file leaves the processing state.
    ///
    /// Returns once the file is active. A file that the service marks failed
    /// surfaces [`Error::FileFailed`]; a file still processing when `timeout`
    /// expires surfaces [`Error::FileTimeout`], so a permanently stuck file
    /// cannot hang the caller forever.
    #[instrument(skip_all, fields(
        file.name = %self.file.name,
        poll.interval.secs = interval.as_secs(),
        poll.timeout.secs = timeout.as_secs(),
    ))]
    pub async fn wait_until_active(
        &mut self,
        interval: Duration,
        timeout: Duration,
    ) -> Result<(), Error> {
        let start = Instant::now();

        loop {
            match self.file.state {
                FileState::Active => {
                    info!(waited_secs = start.elapsed().as_secs(), "file is active");
                    return Ok(());
                }
                FileState::Failed => {
                    return FileFailedSnafu {
                        name: self.file.name.clone(),
                    }
                    .fail();
                }
                FileState::Processing | FileState::StateUnspecified => {
                    if start.elapsed() >= timeout {
                        return FileTimeoutSnafu {
                            name: self.file.name.clone(),
                            waited_secs: start.elapsed().as_secs(),
                        }
                        .fail();
                    }
                    tokio::time::sleep(interval).await;
                    self.refresh().await?;
                }
            }
        }
    }

    /// Delete the file resource from the server.
    ///
    /// Consumes the handle. If deletion fails, returns the handle and error
    /// information so it can be retried.
    #[instrument(skip_all, fields(file.name = %self.file.name))]
    pub async fn delete(self) -> Result<(), (Self, Error)> {
        match self.client.delete_file(&self.file.name).await {
            Ok(()) => Ok(()),
            Err(e) => Err((self, e)),
        }
    }
}
