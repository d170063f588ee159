//! Single-shot video analysis: one generation call, no retained context.

use snafu::{ensure, ResultExt, Snafu};
use tracing::instrument;

use crate::{
    client::Error as ClientError,
    files::{FileHandle, FileState},
    Gemini,
};

/// First half of the report prompt: what to pull out of the video.
const EXTRACT_PROMPT: &str =
    "Watch this video and extract the method it demonstrates, step by step.";

/// Second half: how to apply it, filled with the user's context.
fn apply_prompt(user_context: &str) -> String {
    format!(
        "Then explain how this specific user should apply the method, given \
         what they shared about themselves:\n\n{user_context}"
    )
}

/// Errors that can occur during single-shot analysis
#[derive(Debug, Snafu)]
pub enum Error {
    /// The video is not ready to be analyzed
    #[snafu(display("video '{name}' is not ready for analysis (state {state:?})"))]
    SourceNotReady { name: String, state: FileState },

    /// The video's metadata is too incomplete to reference
    #[snafu(display("could not reference the video"))]
    Reference { source: Box<ClientError> },

    /// Report generation failed
    #[snafu(display("report generation failed"))]
    Generate { source: Box<ClientError> },

    /// The model answered with no usable text
    #[snafu(display("the model returned no usable report"))]
    EmptyReply,
}

/// Analyze an ingested video in one shot and return the report text.
///
/// Combines the video reference with a fixed two-part prompt: extract the
/// method the video demonstrates, then apply it to the user's own context
/// (embedded verbatim). No conversational context is created or retained;
/// two calls with identical inputs are fully independent.
#[instrument(skip_all, fields(video = %video.name()))]
pub async fn analyze_once(
    client: &Gemini,
    video: &FileHandle,
    user_context: &str,
) -> Result<String, Error> {
    ensure!(
        video.state() == FileState::Active,
        SourceNotReadySnafu {
            name: video.name().to_string(),
            state: video.state(),
        }
    );

    let prompt = format!("{EXTRACT_PROMPT}\n\n{}", apply_prompt(user_context));

    let response = client
        .generate_content()
        .with_user_message_and_file(prompt, video)
        .map_err(Box::new)
        .context(ReferenceSnafu)?
        .execute()
        .await
        .map_err(Box::new)
        .context(GenerateSnafu)?;

    let report = response.text();
    ensure!(!report.trim().is_empty(), EmptyReplySnafu);

    Ok(report)
}
