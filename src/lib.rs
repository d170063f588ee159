//! # vidsage
//!
//! A video research client for Google's Gemini API.
//!
//! The crate covers one flow end to end: acquire a video (local file, raw
//! bytes, or a URL fetched through `yt-dlp`), upload it to the Files API and
//! poll until the service has finished processing it, then either hold a
//! multi-turn [`ResearchSession`] about the video or produce a one-shot
//! report with [`analyze_once`].
//!
//! ```rust,ignore
//! use vidsage::{Gemini, Ingestor, LocalVideo, ResearchSession};
//!
//! let client = Gemini::new(std::env::var("GEMINI_API_KEY")?)?;
//! let video = Ingestor::new(client.clone())
//!     .ingest(&LocalVideo::new("lecture.mp4"))
//!     .await?;
//! let mut session = ResearchSession::start(client, video, "I'm preparing a talk")?;
//! let reply = session.send("What is the core argument of the video?").await?;
//! ```

mod client;
mod common;
pub mod config;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod files;
pub mod generation;
pub mod media;
mod models;
pub mod prelude;
pub mod report;
pub mod session;

#[cfg(test)]
mod tests;

pub use client::{Error as ClientError, Gemini, Model};
pub use config::Settings;
pub use files::{File, FileBuilder, FileHandle, FileState};
pub use generation::{
    Candidate, ContentBuilder, FinishReason, GenerationConfig, GenerationResponse, UsageMetadata,
};
#[cfg(feature = "fetch")]
pub use media::RemoteVideo;
pub use media::{Ingestor, LocalVideo, MediaPayload, MediaSource, VideoBytes};
pub use models::{Content, FileData, Message, Part, Role};
pub use report::analyze_once;
pub use session::ResearchSession;

/// Version of this client library, exposed for support diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
