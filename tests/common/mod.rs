//! In-process fake of the Gemini API surface vidsage talks to: resumable
//! file upload, file status/delete, content generation, and model listing.
//! Each test scripts the sequence of file states the fake serves and
//! inspects the requests it recorded afterwards.

// Each test binary compiles this module separately and uses a different
// subset of the helpers.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const FILE_NAME: &str = "files/fake-video-1";

#[derive(Default)]
pub struct ServiceState {
    /// File states served in order; the last one repeats forever.
    pub file_states: VecDeque<&'static str>,
    /// Replies served to generation requests; "ok" once drained.
    pub replies: VecDeque<String>,
    /// When set, the next generation request fails with a 500.
    pub fail_next_generate: bool,

    pub uploads: usize,
    pub polls: usize,
    pub deletes: usize,
    pub generate_requests: Vec<Value>,
}

impl ServiceState {
    fn next_file_state(&mut self) -> &'static str {
        if self.file_states.len() > 1 {
            self.file_states.pop_front().unwrap_or("ACTIVE")
        } else {
            self.file_states.front().copied().unwrap_or("ACTIVE")
        }
    }
}

pub struct FakeGemini {
    pub base_url: String,
    upload_url: String,
    pub state: Arc<Mutex<ServiceState>>,
}

type Shared = Arc<Mutex<ServiceState>>;

fn file_json(state: &str) -> Value {
    let mut file = json!({
        "name": FILE_NAME,
        "displayName": "fake-video.mp4",
        "mimeType": "video/mp4",
        "sizeBytes": "2048",
        "uri": format!("https://fake.example/{FILE_NAME}"),
        "state": state,
    });
    if state == "FAILED" {
        file["error"] = json!({ "code": 13, "message": "video processing failed" });
    }
    file
}

async fn start_upload(State(fake): State<(Shared, String)>) -> Response {
    let (_, upload_url) = fake;
    ([("x-goog-upload-url", upload_url)], Json(json!({}))).into_response()
}

async fn finish_upload(State(fake): State<(Shared, String)>) -> Response {
    let (state, _) = fake;
    let mut state = state.lock().unwrap();
    state.uploads += 1;
    let file_state = state.next_file_state();
    Json(json!({ "file": file_json(file_state) })).into_response()
}

async fn get_file(State(state): State<Shared>, Path(_id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    state.polls += 1;
    let file_state = state.next_file_state();
    Json(file_json(file_state)).into_response()
}

async fn delete_file(State(state): State<Shared>, Path(_id): Path<String>) -> Response {
    state.lock().unwrap().deletes += 1;
    Json(json!({})).into_response()
}

async fn list_files(State(state): State<Shared>) -> Response {
    let mut state = state.lock().unwrap();
    let file_state = state.next_file_state();
    Json(json!({ "files": [file_json(file_state)] })).into_response()
}

async fn list_models(Query(params): Query<Vec<(String, String)>>) -> Response {
    let page_token = params
        .iter()
        .find(|(key, _)| key == "pageToken")
        .map(|(_, value)| value.as_str());

    let body = match page_token {
        None => json!({
            "models": [
                {
                    "name": "models/gemini-2.5-flash",
                    "displayName": "Gemini 2.5 Flash",
                    "supportedGenerationMethods": ["generateContent", "countTokens"],
                },
                {
                    "name": "models/text-embedding-004",
                    "displayName": "Text Embedding 004",
                    "supportedGenerationMethods": ["embedContent"],
                },
            ],
            "nextPageToken": "page-2",
        }),
        Some("page-2") => json!({
            "models": [
                {
                    "name": "models/gemini-2.5-pro",
                    "displayName": "Gemini 2.5 Pro",
                    "supportedGenerationMethods": ["generateContent"],
                },
            ],
        }),
        Some(other) => json!({ "error": format!("unknown page token {other}") }),
    };
    Json(body).into_response()
}

async fn generate(
    State(state): State<Shared>,
    Path(_model_action): Path<String>,
    Json(request): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.generate_requests.push(request);

    if state.fail_next_generate {
        state.fail_next_generate = false;
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": "internal error" } })),
        )
            .into_response();
    }

    let reply = state
        .replies
        .pop_front()
        .unwrap_or_else(|| "ok".to_string());
    Json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": reply }], "role": "model" },
            "finishReason": "STOP",
            "index": 0,
        }],
    }))
    .into_response()
}

impl FakeGemini {
    /// Bind the fake service on an ephemeral port and serve it in the
    /// background for the rest of the test.
    pub async fn spawn(file_states: &[&'static str]) -> Self {
        let state = Arc::new(Mutex::new(ServiceState {
            file_states: file_states.iter().copied().collect(),
            ..ServiceState::default()
        }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let upload_url = format!("http://{addr}/upload-session");

        let router = Router::new()
            .route(
                "/upload/v1beta/files",
                post(start_upload).with_state((state.clone(), upload_url.clone())),
            )
            .route(
                "/upload-session",
                post(finish_upload).with_state((state.clone(), upload_url.clone())),
            )
            .route("/v1beta/files", get(list_files).with_state(state.clone()))
            .route(
                "/v1beta/files/{id}",
                get(get_file)
                    .delete(delete_file)
                    .with_state(state.clone()),
            )
            .route("/v1beta/models", get(list_models))
            .route(
                "/v1beta/models/{model_action}",
                post(generate).with_state(state.clone()),
            );

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/v1beta/"),
            upload_url,
            state,
        }
    }

    pub fn client(&self) -> vidsage::Gemini {
        vidsage::Gemini::with_model_and_base_url(
            "test-key",
            "models/gemini-2.5-flash".to_string(),
            self.base_url.clone(),
        )
        .unwrap()
    }

    pub fn uploads(&self) -> usize {
        self.state.lock().unwrap().uploads
    }

    pub fn polls(&self) -> usize {
        self.state.lock().unwrap().polls
    }

    pub fn deletes(&self) -> usize {
        self.state.lock().unwrap().deletes
    }

    pub fn generate_requests(&self) -> Vec<Value> {
        self.state.lock().unwrap().generate_requests.clone()
    }

    pub fn queue_replies(&self, replies: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.replies = replies.iter().map(|reply| reply.to_string()).collect();
    }

    pub fn fail_next_generate(&self) {
        self.state.lock().unwrap().fail_next_generate = true;
    }
}
