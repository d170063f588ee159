//! # Core Data Primitives
//!
//! This module defines the building blocks for constructing requests and
//! handling responses from the Gemini API. These data structures, such as
//! `Content`, `Part`, and `Role`, are shared between content generation and
//! the research-session transcript.

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the user
    User,
    /// Message from the model
    Model,
}

/// Reference to a file previously uploaded through the Files API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// The MIME type of the referenced file
    pub mime_type: String,
    /// The `https://` URI of the file resource
    pub file_uri: String,
}

impl FileData {
    /// Create a new file reference from a MIME type and URI
    pub fn new(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            file_uri: file_uri.into(),
        }
    }
}

/// Content part that can be included in a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text {
        /// The text content
        text: String,
    },
    /// Reference to an uploaded file
    FileData {
        /// Coordinates of the uploaded file
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

/// Content of a message
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Parts of the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
    /// Role of the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Content {
    /// Create a new text content
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: Some(vec![Part::Text { text: text.into() }]),
            role: None,
        }
    }

    /// Create a new content referencing an uploaded file
    pub fn file_data(file_data: FileData) -> Self {
        Self {
            parts: Some(vec![Part::FileData { file_data }]),
            role: None,
        }
    }

    /// Create a new content pairing an uploaded file with instruction text
    pub fn text_with_file(text: impl Into<String>, file_data: FileData) -> Self {
        Self {
            parts: Some(vec![
                Part::FileData { file_data },
                Part::Text { text: text.into() },
            ]),
            role: None,
        }
    }

    /// Add a role to this content
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Concatenated text of all text parts
    pub fn text_parts(&self) -> String {
        self.parts
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Content of the message
    pub content: Content,
    /// Role of the message
    pub role: Role,
}

impl Message {
    /// Create a new user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            content: Content::text(text).with_role(Role::User),
            role: Role::User,
        }
    }

    /// Create a new model message with text content
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            content: Content::text(text).with_role(Role::Model),
            role: Role::Model,
        }
    }
}
