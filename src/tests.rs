use crate::{Content, FileState, FinishReason, GenerationResponse, Part, Role};
use crate::files::File;
use serde_json::json;

#[test]
fn test_generation_response_deserialization() {
    // Response shape as returned by generateContent
    let json_response = json!({
        "candidates": [
            {
                "content": {
                    "parts": [
                        { "text": "The video demonstrates a three-step warm-up " },
                        { "text": "routine for distance runners." }
                    ],
                    "role": "model"
                },
                "finishReason": "STOP",
                "index": 0
            }
        ],
        "usageMetadata": {
            "promptTokenCount": 1043,
            "candidatesTokenCount": 18,
            "totalTokenCount": 1061
        },
        "modelVersion": "gemini-2.5-flash",
        "responseId": "CCm8aJjzBaWh1MkP"
    });

    let response: GenerationResponse = serde_json::from_value(json_response).unwrap();

    assert_eq!(response.candidates.len(), 1);
    let candidate = &response.candidates[0];
    assert_eq!(candidate.finish_reason, Some(FinishReason::Stop));
    assert_eq!(candidate.content.role, Some(Role::Model));

    // text() joins the candidate's text parts in order
    assert_eq!(
        response.text(),
        "The video demonstrates a three-step warm-up routine for distance runners."
    );

    let usage = response.usage_metadata.as_ref().unwrap();
    assert_eq!(usage.total_token_count, Some(1061));
}

#[test]
fn test_empty_generation_response_yields_empty_text() {
    let response: GenerationResponse = serde_json::from_value(json!({})).unwrap();
    assert!(response.candidates.is_empty());
    assert_eq!(response.text(), "");
}

#[test]
fn test_file_metadata_deserialization() {
    // Metadata shape as returned by the Files API while processing
    let file: File = serde_json::from_value(json!({
        "name": "files/65b3qjjdjqmx",
        "displayName": "lecture.mp4",
        "mimeType": "video/mp4",
        "sizeBytes": "8212831",
        "createTime": "2025-03-18T10:26:52.828905Z",
        "updateTime": "2025-03-18T10:26:52.828905Z",
        "expirationTime": "2025-03-20T10:26:52.803607Z",
        "sha256Hash": "OTJlOTBhOGVkMzM0NWQ5ZDQ5ZTE4NzY1NmQzOTY3ZDlkNjY2OWzNmI=",
        "uri": "https://generativelanguage.googleapis.com/v1beta/files/65b3qjjdjqmx",
        "state": "PROCESSING"
    }))
    .unwrap();

    assert_eq!(file.name, "files/65b3qjjdjqmx");
    assert_eq!(file.state, FileState::Processing);
    assert!(!file.state.is_terminal());
    assert_eq!(file.size_bytes, Some(8_212_831));
    assert_eq!(file.mime_type.as_ref().unwrap().essence_str(), "video/mp4");

    // Round-trip: size goes back out as a string, state stays screaming-case
    let serialized = serde_json::to_value(&file).unwrap();
    assert_eq!(serialized["sizeBytes"], "8212831");
    assert_eq!(serialized["state"], "PROCESSING");
}

#[test]
fn test_failed_file_carries_error_detail() {
    let file: File = serde_json::from_value(json!({
        "name": "files/broken",
        "state": "FAILED",
        "error": { "code": 3, "message": "Unsupported video codec" }
    }))
    .unwrap();

    assert_eq!(file.state, FileState::Failed);
    assert!(file.state.is_terminal());
    assert_eq!(
        file.error.unwrap().message.as_deref(),
        Some("Unsupported video codec")
    );
}

#[test]
fn test_video_turn_serialization() {
    // A seed turn pairs the file reference with instruction text
    let content = Content::text_with_file(
        "Analyze this video and be ready to discuss it.",
        crate::FileData::new("video/mp4", "https://example.com/files/abc"),
    )
    .with_role(Role::User);

    let serialized = serde_json::to_value(&content).unwrap();
    assert_eq!(serialized["role"], "user");
    assert_eq!(serialized["parts"][0]["fileData"]["mimeType"], "video/mp4");
    assert_eq!(
        serialized["parts"][0]["fileData"]["fileUri"],
        "https://example.com/files/abc"
    );
    assert_eq!(
        serialized["parts"][1]["text"],
        "Analyze this video and be ready to discuss it."
    );

    // And the same shape parses back into typed parts
    let parsed: Content = serde_json::from_value(serialized).unwrap();
    let parts = parsed.parts.as_deref().unwrap();
    assert!(matches!(parts[0], Part::FileData { .. }));
    assert!(matches!(parts[1], Part::Text { .. }));
}
