//! Request and response types for content generation.

use serde::{Deserialize, Serialize};

use crate::models::Content;

/// Request to generate content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The ordered conversation contents
    pub contents: Vec<Content>,
    /// Generation parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// High-level guidance applied to the whole request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

/// Configuration for generation
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Randomness of the output; higher values produce more creative results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus-sampling probability mass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Number of highest-probability tokens to consider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,

    /// Maximum number of tokens in the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,

    /// Number of response candidates to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<i32>,

    /// Sequences that stop generation when encountered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Response from generating content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    /// The generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Token accounting for the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    /// The model version that produced the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerationResponse {
    /// Concatenated text of the first candidate's text parts.
    ///
    /// Returns an empty string when the response carries no candidates.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| candidate.content.text_parts())
            .unwrap_or_default()
    }
}

/// A response candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The candidate's content
    #[serde(default)]
    pub content: Content,
    /// Why generation stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Index of the candidate in the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
}

/// Reason generation of a candidate stopped
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Default value, unused by the service
    FinishReasonUnspecified,
    /// Natural stop point or stop sequence reached
    Stop,
    /// Token limit reached
    MaxTokens,
    /// Flagged by safety filters
    Safety,
    /// Flagged for recitation of training data
    Recitation,
    /// Unsupported response language
    Language,
    /// Flagged against the configured blocklist
    Blocklist,
    /// Flagged for prohibited content
    ProhibitedContent,
    /// Flagged for sensitive personally identifiable information
    Spii,
    /// The model produced a malformed function call
    MalformedFunctionCall,
    /// Unknown reason
    Other,
}

/// Token usage metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<i32>,
    /// Tokens across all candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<i32>,
    /// Total tokens for the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<i32>,
}
