use std::sync::Arc;

use mime::Mime;

use crate::{
    client::{Error as ClientError, GeminiClient},
    files::FileHandle,
};

/// A builder for uploading a file resource.
pub struct FileBuilder {
    client: Arc<GeminiClient>,
    file_bytes: Vec<u8>,
    display_name: Option<String>,
    mime_type: Option<Mime>,
}

impl FileBuilder {
    pub(crate) fn new<B: Into<Vec<u8>>>(client: Arc<GeminiClient>, file_bytes: B) -> Self {
        Self {
            client,
            file_bytes: file_bytes.into(),
            display_name: None,
            mime_type: None,
        }
    }

    /// The display name of the file.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// The MIME type of the file.
    pub fn with_mime_type(mut self, mime_type: Mime) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// Upload the file.
    ///
    /// The returned handle usually starts out in the processing state; poll
    /// it with [`FileHandle::wait_until_active`] before referencing the file
    /// in a generation request.
    pub async fn upload(self) -> Result<FileHandle, ClientError> {
        let mime_type = self.mime_type.unwrap_or(mime::APPLICATION_OCTET_STREAM);
        let file = self
            .client
            .upload_file(self.display_name, self.file_bytes, mime_type)
            .await?;

        Ok(FileHandle::new(self.client, file))
    }
}
