//! # Prelude for the vidsage Crate
//!
//! This module re-exports the most commonly used types for convenience.
//!
//! Instead of importing each type individually, you can simply use:
//!
//! ```rust,ignore
//! use vidsage::prelude::*;
//! ```

pub use crate::client::{Error as ClientError, Gemini, Model};
pub use crate::config::Settings;
#[cfg(feature = "fetch")]
pub use crate::fetch::VideoFetcher;
pub use crate::files::{FileBuilder, FileHandle, FileState};
pub use crate::generation::{ContentBuilder, GenerationConfig, GenerationResponse};
#[cfg(feature = "fetch")]
pub use crate::media::RemoteVideo;
pub use crate::media::{Ingestor, LocalVideo, MediaSource, VideoBytes};
pub use crate::models::{Content, Message, Part, Role};
pub use crate::report::analyze_once;
pub use crate::session::ResearchSession;
