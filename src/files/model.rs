//! Metadata types for the Files API.

use mime::Mime;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::common::serde::{i64_as_string, mime_as_string};

/// Processing state of an uploaded file
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    /// The state is not known
    #[default]
    StateUnspecified,
    /// The service is still processing the file; it cannot be used yet
    Processing,
    /// The file is ready for use in generation requests
    Active,
    /// Processing failed; the file can never be used
    Failed,
}

impl FileState {
    /// Whether the state is terminal (the service will not change it again).
    pub fn is_terminal(self) -> bool {
        matches!(self, FileState::Active | FileState::Failed)
    }
}

/// Error detail reported for a failed file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    /// Status code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Metadata of a file resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Resource name, e.g. `files/abc-123`
    pub name: String,
    /// Display name provided at upload time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// MIME type of the stored bytes
    #[serde(default, with = "mime_as_string::optional")]
    pub mime_type: Option<Mime>,
    /// Size of the stored bytes
    #[serde(default, with = "i64_as_string::optional")]
    pub size_bytes: Option<i64>,
    /// Creation timestamp
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub create_time: Option<OffsetDateTime>,
    /// Last update timestamp
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub update_time: Option<OffsetDateTime>,
    /// When the service will delete the file
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration_time: Option<OffsetDateTime>,
    /// Hex SHA-256 of the stored bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256_hash: Option<String>,
    /// URI used to reference the file in generation requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Current processing state
    #[serde(default)]
    pub state: FileState,
    /// Error detail, populated when state is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FileStatus>,
}

/// One page of the file listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesResponse {
    /// Files on this page
    #[serde(default)]
    pub files: Vec<File>,
    /// Token for the next page, absent on the last page
    pub next_page_token: Option<String>,
}

/// Envelope returned by the upload finalize step
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadFileResponse {
    pub file: File,
}
