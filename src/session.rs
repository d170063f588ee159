//! Multi-turn research sessions over an ingested video.
//!
//! A [`ResearchSession`] owns the conversational context for one video: the
//! ordered transcript, the system instruction built from the user's own
//! context text, and the handle to the video it discusses. Session state
//! lives in this object and nowhere else; dropping or finishing the session
//! destroys the context.
//!
//! The user-context text is embedded verbatim into the system instruction.
//! Callers exposing this to untrusted users should be aware that the text
//! can steer the model (prompt injection); no sanitization is applied.

use snafu::{ensure, ResultExt, Snafu};
use tracing::{info, instrument};

use crate::{
    client::Error as ClientError,
    files::{FileHandle, FileState},
    models::{Content, Role},
    Gemini,
};

/// Instruction paired with the video in the seed turn.
pub const SEED_INSTRUCTION: &str = "Analyze this video and be ready to discuss it.";

/// Fixed acknowledgment seeded as the model's first turn.
pub const SEED_ACKNOWLEDGMENT: &str =
    "I have analyzed the video and I'm ready to discuss it with you.";

/// Errors that can occur in a research session
#[derive(Debug, Snafu)]
pub enum Error {
    /// The video is not ready to be discussed
    #[snafu(display("video '{name}' is not ready for discussion (state {state:?})"))]
    SourceNotReady { name: String, state: FileState },

    /// The video's metadata is too incomplete to seed a conversation
    #[snafu(display("could not seed the conversation"))]
    Seed { source: Box<ClientError> },

    /// The user message is empty
    #[snafu(display("message must not be empty"))]
    EmptyMessage,

    /// Reply generation failed
    #[snafu(display("reply generation failed"))]
    Generate { source: Box<ClientError> },

    /// The model answered with no usable text
    #[snafu(display("the model returned no usable reply"))]
    EmptyReply,
}

fn system_instruction_for(user_context: &str) -> String {
    format!(
        "You are a video research assistant. The user has shared a video for \
         close study, along with background about themselves and their goal:\n\
         \n{user_context}\n\n\
         Ground every answer in the video's actual content, and relate it to \
         the user's goal where that helps."
    )
}

/// One research session: a video plus the ordered conversation about it.
///
/// The transcript is strictly append-only and strictly ordered by call
/// sequence. Sending requires `&mut self`, so two sends can never interleave
/// on the same session.
pub struct ResearchSession {
    client: Gemini,
    video: FileHandle,
    system_instruction: String,
    transcript: Vec<Content>,
}

impl ResearchSession {
    /// Open a session over an ingested video.
    ///
    /// The transcript is seeded with exactly two turns: a user turn carrying
    /// the video reference plus [`SEED_INSTRUCTION`], and the model's fixed
    /// [`SEED_ACKNOWLEDGMENT`]. `user_context` is embedded verbatim into the
    /// session's system instruction.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::SourceNotReady`] unless the handle's last
    /// observed state is active; ingest the video first (or call
    /// [`FileHandle::wait_until_active`]).
    #[instrument(skip_all, fields(video = %video.name()))]
    pub fn start(
        client: Gemini,
        video: FileHandle,
        user_context: &str,
    ) -> Result<Self, Error> {
        ensure!(
            video.state() == FileState::Active,
            SourceNotReadySnafu {
                name: video.name().to_string(),
                state: video.state(),
            }
        );

        let file_data = video.file_data().map_err(Box::new).context(SeedSnafu)?;
        let transcript = vec![
            Content::text_with_file(SEED_INSTRUCTION, file_data).with_role(Role::User),
            Content::text(SEED_ACKNOWLEDGMENT).with_role(Role::Model),
        ];

        info!("research session opened");
        Ok(Self {
            client,
            video,
            system_instruction: system_instruction_for(user_context),
            transcript,
        })
    }

    /// Send a user message and return the model's reply.
    ///
    /// The message is appended as a user turn, the whole ordered transcript
    /// is submitted for generation, and the reply is appended as a model
    /// turn. The call blocks until the service answers; on any failure the
    /// transcript is left exactly as it was before the call.
    #[instrument(skip_all, fields(transcript.turns = self.transcript.len()))]
    pub async fn send(&mut self, message: &str) -> Result<String, Error> {
        let message = message.trim();
        ensure!(!message.is_empty(), EmptyMessageSnafu);

        let user_turn = Content::text(message).with_role(Role::User);

        let response = self
            .client
            .generate_content()
            .with_system_instruction(&self.system_instruction)
            .with_contents(self.transcript.iter().cloned())
            .with_content(user_turn.clone())
            .execute()
            .await
            .map_err(Box::new)
            .context(GenerateSnafu)?;

        let reply = response.text();
        ensure!(!reply.trim().is_empty(), EmptyReplySnafu);

        self.transcript.push(user_turn);
        self.transcript
            .push(Content::text(reply.as_str()).with_role(Role::Model));

        Ok(reply)
    }

    /// The ordered transcript, seed turns included.
    pub fn transcript(&self) -> &[Content] {
        &self.transcript
    }

    /// The video this session discusses.
    pub fn video(&self) -> &FileHandle {
        &self.video
    }

    /// Discard every exchange, keeping only the seed turns.
    pub fn reset(&mut self) {
        self.transcript.truncate(2);
    }

    /// End the session, handing back the video so the caller can release
    /// the remote file. The conversational context is destroyed.
    pub fn finish(self) -> FileHandle {
        self.video
    }
}
