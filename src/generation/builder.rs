use std::sync::Arc;
use tracing::instrument;

use crate::{
    client::{Error as ClientError, GeminiClient},
    files::FileHandle,
    generation::{GenerateContentRequest, GenerationConfig, GenerationResponse},
    models::{Content, Message, Role},
};

/// Builder for content generation requests
#[derive(Clone)]
pub struct ContentBuilder {
    client: Arc<GeminiClient>,
    pub contents: Vec<Content>,
    generation_config: Option<GenerationConfig>,
    system_instruction: Option<Content>,
}

impl ContentBuilder {
    /// Creates a new `ContentBuilder`.
    pub(crate) fn new(client: Arc<GeminiClient>) -> Self {
        Self {
            client,
            contents: Vec::new(),
            generation_config: None,
            system_instruction: None,
        }
    }

    /// Sets the system instruction for the request.
    ///
    /// System instructions are used to provide high-level guidance to the
    /// model, such as setting a persona or providing context.
    pub fn with_system_instruction(mut self, text: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::text(text));
        self
    }

    /// Adds a user message to the conversation history.
    pub fn with_user_message(mut self, text: impl Into<String>) -> Self {
        let message = Message::user(text);
        self.contents.push(message.content);
        self
    }

    /// Adds a user message, together with coordinates for a previously
    /// uploaded file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata is incomplete (missing MIME
    /// type or URI).
    pub fn with_user_message_and_file(
        mut self,
        text: impl Into<String>,
        file: &FileHandle,
    ) -> Result<Self, ClientError> {
        let content = Content::text_with_file(text, file.file_data()?).with_role(Role::User);
        self.contents.push(content);
        Ok(self)
    }

    /// Adds a model message to the conversation history.
    pub fn with_model_message(mut self, text: impl Into<String>) -> Self {
        let message = Message::model(text);
        self.contents.push(message.content);
        self
    }

    /// Adds a `Content` turn to the conversation history as-is.
    pub fn with_content(mut self, content: Content) -> Self {
        self.contents.push(content);
        self
    }

    /// Adds multiple `Content` turns to the conversation history.
    pub fn with_contents(mut self, contents: impl IntoIterator<Item = Content>) -> Self {
        self.contents.extend(contents);
        self
    }

    /// Sets the generation configuration for the request.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Sets the temperature for the request.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation_config
            .get_or_insert_with(Default::default)
            .temperature = Some(temperature);
        self
    }

    /// Sets the maximum number of output tokens for the request.
    pub fn with_max_output_tokens(mut self, max_output_tokens: i32) -> Self {
        self.generation_config
            .get_or_insert_with(Default::default)
            .max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Builds the `GenerateContentRequest`.
    pub fn build(self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.contents,
            generation_config: self.generation_config,
            system_instruction: self.system_instruction,
        }
    }

    /// Executes the content generation request.
    #[instrument(skip_all, fields(
        messages.parts.count = self.contents.len(),
        system.instruction.present = self.system_instruction.is_some(),
    ))]
    pub async fn execute(self) -> Result<GenerationResponse, ClientError> {
        let client = self.client.clone();
        let request = self.build();
        client.generate_content_raw(request).await
    }
}
