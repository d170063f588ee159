use std::sync::Arc;

use futures::stream::Stream;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use snafu::{ensure, OptionExt, ResultExt, Snafu};
use tracing::instrument;
use url::Url;

use crate::{
    config::Settings,
    files::{File, FileBuilder, FileHandle, ListFilesResponse, UploadFileResponse},
    generation::{ContentBuilder, GenerateContentRequest, GenerationResponse},
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub(crate) const DEFAULT_MODEL: &str = "models/gemini-2.5-flash";

const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Errors that can occur when talking to the Gemini API
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Transport-level failure in the underlying HTTP client
    #[snafu(display("HTTP transport error"))]
    Http { source: reqwest::Error },

    /// The API answered with a non-success status
    #[snafu(display("Gemini API error: {status_code} - {message}"))]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error body returned by the service
        message: String,
    },

    /// A request URL could not be constructed
    #[snafu(display("invalid request URL '{url}'"))]
    BadUrl {
        url: String,
        source: url::ParseError,
    },

    /// The API key is empty or missing
    #[snafu(display("missing API key"))]
    MissingApiKey,

    /// The upload session did not hand back an upload URL
    #[snafu(display("upload session did not return an upload URL"))]
    UploadProtocol,

    /// File metadata lacks the MIME type or URI needed to reference it
    #[snafu(display("file '{name}' has incomplete metadata (missing MIME type or URI)"))]
    IncompleteFile { name: String },

    /// The service reported that processing of the file failed
    #[snafu(display("file '{name}' failed remote processing"))]
    FileFailed { name: String },

    /// The file did not leave the processing state before the deadline
    #[snafu(display("file '{name}' still processing after {waited_secs}s"))]
    FileTimeout { name: String, waited_secs: u64 },
}

/// Descriptor of a generative model available to the configured API key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Resource name, e.g. `models/gemini-2.5-flash`
    pub name: String,
    /// Model version string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Human-readable name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Short description of the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Maximum number of input tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_token_limit: Option<i64>,
    /// Maximum number of output tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_token_limit: Option<i64>,
    /// Generation methods the model supports, e.g. `generateContent`
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl Model {
    /// Whether this model can serve `generateContent` requests.
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|method| method == "generateContent")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<Model>,
    pub next_page_token: Option<String>,
}

/// Internal client for making requests to the Gemini API
#[derive(Debug)]
pub(crate) struct GeminiClient {
    http_client: Client,
    api_key: String,
    pub model: String,
    base_url: String,
}

impl GeminiClient {
    fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            http_client: Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    /// Generate content
    #[instrument(skip_all, fields(model = %self.model))]
    pub(crate) async fn generate_content_raw(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error> {
        let url = self.build_model_url("generateContent")?;

        let response = self
            .http_client
            .post(url)
            .json(&request)
            .send()
            .await
            .context(HttpSnafu)?;
        let response = Self::error_for_status(response).await?;

        response.json().await.context(HttpSnafu)
    }

    /// Upload a file through the resumable upload protocol: a start request
    /// opens an upload session, a second request transmits the bytes and
    /// finalizes the resource.
    #[instrument(skip_all, fields(size = bytes.len(), mime = %mime_type))]
    pub(crate) async fn upload_file(
        &self,
        display_name: Option<String>,
        bytes: Vec<u8>,
        mime_type: mime::Mime,
    ) -> Result<File, Error> {
        let start_url = self.build_upload_url()?;

        let mut metadata = serde_json::Map::new();
        if let Some(display_name) = display_name {
            metadata.insert("displayName".into(), display_name.into());
        }
        let body = serde_json::json!({ "file": metadata });

        let response = self
            .http_client
            .post(start_url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len())
            .header("X-Goog-Upload-Header-Content-Type", mime_type.as_ref())
            .json(&body)
            .send()
            .await
            .context(HttpSnafu)?;
        let response = Self::error_for_status(response).await?;

        let upload_url = response
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .context(UploadProtocolSnafu)?;

        let response = self
            .http_client
            .post(upload_url)
            .header(reqwest::header::CONTENT_LENGTH, bytes.len())
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await
            .context(HttpSnafu)?;
        let response = Self::error_for_status(response).await?;

        let uploaded: UploadFileResponse = response.json().await.context(HttpSnafu)?;
        Ok(uploaded.file)
    }

    /// Fetch current metadata for a file resource
    #[instrument(skip(self))]
    pub(crate) async fn get_file(&self, name: &str) -> Result<File, Error> {
        let url = self.build_resource_url(name)?;
        let response = self.http_client.get(url).send().await.context(HttpSnafu)?;
        let response = Self::error_for_status(response).await?;

        response.json().await.context(HttpSnafu)
    }

    /// Delete a file resource
    #[instrument(skip(self))]
    pub(crate) async fn delete_file(&self, name: &str) -> Result<(), Error> {
        let url = self.build_resource_url(name)?;
        let response = self
            .http_client
            .delete(url)
            .send()
            .await
            .context(HttpSnafu)?;
        Self::error_for_status(response).await?;

        Ok(())
    }

    /// List file resources, one page at a time
    pub(crate) async fn list_files(
        &self,
        page_size: Option<u32>,
        page_token: Option<String>,
    ) -> Result<ListFilesResponse, Error> {
        let url = self.build_paged_url("files", page_size, page_token)?;
        let response = self.http_client.get(url).send().await.context(HttpSnafu)?;
        let response = Self::error_for_status(response).await?;

        response.json().await.context(HttpSnafu)
    }

    /// List available models, one page at a time
    pub(crate) async fn list_models(
        &self,
        page_size: Option<u32>,
        page_token: Option<String>,
    ) -> Result<ListModelsResponse, Error> {
        let url = self.build_paged_url("models", page_size, page_token)?;
        let response = self.http_client.get(url).send().await.context(HttpSnafu)?;
        let response = Self::error_for_status(response).await?;

        response.json().await.context(HttpSnafu)
    }

    async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.context(HttpSnafu)?;
            return ApiSnafu {
                status_code: status.as_u16(),
                message,
            }
            .fail();
        }
        Ok(response)
    }

    /// Build a URL for a model-scoped action, e.g. `models/x:generateContent`
    fn build_model_url(&self, action: &str) -> Result<Url, Error> {
        let url_str = format!(
            "{}{}:{}?key={}",
            self.base_url, self.model, action, self.api_key
        );
        Url::parse(&url_str).context(BadUrlSnafu { url: url_str.clone() })
    }

    /// Build a URL for a named resource, e.g. `files/abc123`
    fn build_resource_url(&self, name: &str) -> Result<Url, Error> {
        let url_str = format!("{}{}?key={}", self.base_url, name, self.api_key);
        Url::parse(&url_str).context(BadUrlSnafu { url: url_str.clone() })
    }

    fn build_paged_url(
        &self,
        collection: &str,
        page_size: Option<u32>,
        page_token: Option<String>,
    ) -> Result<Url, Error> {
        let mut url = self.build_resource_url(collection)?;
        if let Some(size) = page_size {
            url.query_pairs_mut()
                .append_pair("pageSize", &size.to_string());
        }
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", &token);
        }
        Ok(url)
    }

    /// The media upload endpoint lives under an `/upload` prefix:
    /// `https://host/v1beta/` becomes `https://host/upload/v1beta/files`.
    fn build_upload_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url).context(BadUrlSnafu {
            url: self.base_url.clone(),
        })?;
        let path = format!("/upload{}files", url.path());
        url.set_path(&path);
        url.set_query(Some(&format!("key={}", self.api_key)));
        Ok(url)
    }
}

/// Client for the Gemini API
#[derive(Clone)]
pub struct Gemini {
    client: Arc<GeminiClient>,
}

impl Gemini {
    /// Create a new client with the specified API key and the default model
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    /// Create a new client with the specified API key and model
    pub fn with_model(api_key: impl Into<String>, model: String) -> Result<Self, Error> {
        Self::with_model_and_base_url(api_key, model, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new client with the specified API key, model, and base URL
    pub fn with_model_and_base_url(
        api_key: impl Into<String>,
        model: String,
        base_url: String,
    ) -> Result<Self, Error> {
        let api_key = api_key.into();
        ensure!(!api_key.trim().is_empty(), MissingApiKeySnafu);

        Ok(Self {
            client: Arc::new(GeminiClient::with_base_url(api_key, model, base_url)),
        })
    }

    /// Create a new client from resolved [`Settings`]
    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        Self::with_model(settings.api_key.clone(), settings.model.clone())
    }

    /// Version string of this client library, for support diagnostics
    pub fn version() -> &'static str {
        crate::VERSION
    }

    /// Start building a content generation request
    pub fn generate_content(&self) -> ContentBuilder {
        ContentBuilder::new(self.client.clone())
    }

    /// Start building a file upload
    pub fn create_file<B: Into<Vec<u8>>>(&self, file_bytes: B) -> FileBuilder {
        FileBuilder::new(self.client.clone(), file_bytes)
    }

    /// Build a handle around already-known file metadata, without a fetch.
    #[cfg(test)]
    pub(crate) fn handle_from_meta(&self, file: File) -> FileHandle {
        FileHandle::new(self.client.clone(), file)
    }

    /// Get a handle to an uploaded file by its resource name
    pub async fn get_file(&self, name: &str) -> Result<FileHandle, Error> {
        let file = self.client.get_file(name).await?;
        Ok(FileHandle::new(self.client.clone(), file))
    }

    /// Lists uploaded files.
    ///
    /// This method returns a stream that handles pagination automatically.
    pub fn list_files(
        &self,
        page_size: impl Into<Option<u32>>,
    ) -> impl Stream<Item = Result<FileHandle, Error>> + Send {
        let client = self.client.clone();
        let page_size = page_size.into();
        async_stream::try_stream! {
            let mut page_token: Option<String> = None;
            loop {
                let response = client.list_files(page_size, page_token.clone()).await?;

                for file in response.files {
                    yield FileHandle::new(client.clone(), file);
                }

                if let Some(next_page_token) = response.next_page_token {
                    page_token = Some(next_page_token);
                } else {
                    break;
                }
            }
        }
    }

    /// Lists the models available to the configured API key.
    ///
    /// This method returns a stream that handles pagination automatically.
    pub fn list_models(
        &self,
        page_size: impl Into<Option<u32>>,
    ) -> impl Stream<Item = Result<Model, Error>> + Send {
        let client = self.client.clone();
        let page_size = page_size.into();
        async_stream::try_stream! {
            let mut page_token: Option<String> = None;
            loop {
                let response = client.list_models(page_size, page_token.clone()).await?;

                for model in response.models {
                    yield model;
                }

                if let Some(next_page_token) = response.next_page_token {
                    page_token = Some(next_page_token);
                } else {
                    break;
                }
            }
        }
    }
}
