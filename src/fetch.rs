//! URL-based video acquisition through the external `yt-dlp` downloader.
//!
//! The downloader is an external collaborator: it is driven as a
//! subprocess, never reimplemented. Anything `yt-dlp` can resolve (direct
//! file URLs as well as the usual video platforms) can be ingested.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use snafu::{ensure, ResultExt, Snafu};
use tokio::process::Command;
use tracing::{debug, instrument};

const DEFAULT_EXECUTABLE: &str = "yt-dlp";
const DEFAULT_FORMAT: &str = "mp4";

/// Errors that can occur while fetching a video from a URL
#[derive(Debug, Snafu)]
pub enum Error {
    /// The downloader executable could not be launched
    #[snafu(display("could not launch '{executable}'; is it installed and on PATH?"))]
    Spawn {
        executable: String,
        source: std::io::Error,
    },

    /// The downloader exited with a failure status
    #[snafu(display("downloader exited with {status}: {stderr}"))]
    Failed { status: ExitStatus, stderr: String },

    /// The destination directory could not be inspected afterwards
    #[snafu(display("could not inspect the download directory"))]
    Scan { source: std::io::Error },

    /// The downloader reported success but produced no file
    #[snafu(display("downloader reported success but produced no file"))]
    NoOutput,
}

/// Drives the `yt-dlp` executable to resolve a URL into a local video file.
#[derive(Debug, Clone)]
pub struct VideoFetcher {
    executable: String,
    format: String,
}

impl Default for VideoFetcher {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl VideoFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different downloader binary (e.g. an absolute path).
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Format selector passed to the downloader's `-f` flag.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Download `url` into `dest` and return the path of the produced file.
    ///
    /// `dest` must be an existing, empty directory; the first regular file
    /// found there after the run is taken as the result.
    #[instrument(skip(self, dest))]
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<PathBuf, Error> {
        let template = dest.join("video.%(ext)s");

        let output = Command::new(&self.executable)
            .arg("--no-playlist")
            .arg("-f")
            .arg(&self.format)
            .arg("-o")
            .arg(&template)
            .arg(url)
            .output()
            .await
            .context(SpawnSnafu {
                executable: self.executable.clone(),
            })?;

        ensure!(
            output.status.success(),
            FailedSnafu {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        );

        let mut entries = tokio::fs::read_dir(dest).await.context(ScanSnafu)?;
        while let Some(entry) = entries.next_entry().await.context(ScanSnafu)? {
            let path = entry.path();
            if path.is_file() {
                debug!(path = %path.display(), "downloader produced file");
                return Ok(path);
            }
        }

        NoOutputSnafu.fail()
    }
}
