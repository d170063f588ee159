mod common;

use common::FakeGemini;
use futures::TryStreamExt;
use std::time::Duration;
use vidsage::{media, ClientError, FileState, Ingestor, VideoBytes};

fn mp4_source() -> VideoBytes {
    VideoBytes::new(vec![0u8; 64], "video/mp4".parse().unwrap(), "clip.mp4")
}

fn fast_ingestor(fake: &FakeGemini) -> Ingestor {
    Ingestor::new(fake.client())
        .with_poll_interval(Duration::from_millis(10))
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn ingest_polls_until_the_file_is_active() {
    let fake = FakeGemini::spawn(&["PROCESSING", "PROCESSING", "PROCESSING", "ACTIVE"]).await;

    let handle = fast_ingestor(&fake).ingest(&mp4_source()).await.unwrap();

    assert_eq!(handle.state(), FileState::Active);
    assert_eq!(handle.name(), common::FILE_NAME);
    assert!(handle.uri().is_some());
    assert_eq!(fake.uploads(), 1);
    // upload answered PROCESSING, so at least two status polls were needed
    assert!(fake.polls() >= 2, "polls = {}", fake.polls());
}

#[tokio::test]
async fn ingest_surfaces_remote_processing_failure() {
    let fake = FakeGemini::spawn(&["PROCESSING", "FAILED"]).await;

    let err = fast_ingestor(&fake).ingest(&mp4_source()).await.unwrap_err();

    match err {
        media::Error::Processing { source } => {
            assert!(matches!(*source, ClientError::FileFailed { .. }))
        }
        other => panic!("expected Processing, got {other:?}"),
    }
    // the failed ingestion must not have triggered any generation
    assert!(fake.generate_requests().is_empty());
}

#[tokio::test]
async fn ingest_times_out_when_processing_never_finishes() {
    let fake = FakeGemini::spawn(&["PROCESSING"]).await;

    let err = Ingestor::new(fake.client())
        .with_poll_interval(Duration::from_millis(10))
        .with_timeout(Duration::from_millis(80))
        .ingest(&mp4_source())
        .await
        .unwrap_err();

    match err {
        media::Error::Processing { source } => {
            assert!(matches!(*source, ClientError::FileTimeout { .. }))
        }
        other => panic!("expected Processing, got {other:?}"),
    }
}

#[tokio::test]
async fn unsupported_container_is_rejected_before_any_upload() {
    let fake = FakeGemini::spawn(&["ACTIVE"]).await;
    let source = VideoBytes::new(b"subtitles".to_vec(), mime::TEXT_PLAIN, "notes.txt");

    let err = fast_ingestor(&fake).ingest(&source).await.unwrap_err();

    assert!(matches!(err, media::Error::UnsupportedContainer { .. }));
    assert_eq!(fake.uploads(), 0);
}

#[tokio::test]
async fn an_ingested_file_can_be_deleted() {
    let fake = FakeGemini::spawn(&["ACTIVE"]).await;

    let handle = fast_ingestor(&fake).ingest(&mp4_source()).await.unwrap();
    handle.delete().await.map_err(|(_, e)| e).unwrap();

    assert_eq!(fake.deletes(), 1);
}

#[tokio::test]
async fn listing_files_yields_handles() {
    let fake = FakeGemini::spawn(&["ACTIVE"]).await;

    let files: Vec<_> = fake.client().list_files(None).try_collect().await.unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name(), common::FILE_NAME);
}

#[tokio::test]
async fn model_listing_paginates_and_reports_generation_support() {
    let fake = FakeGemini::spawn(&["ACTIVE"]).await;

    let models: Vec<_> = fake.client().list_models(2).try_collect().await.unwrap();

    assert_eq!(models.len(), 3);
    let generators: Vec<_> = models
        .iter()
        .filter(|model| model.supports_generation())
        .map(|model| model.name.as_str())
        .collect();
    assert_eq!(
        generators,
        ["models/gemini-2.5-flash", "models/gemini-2.5-pro"]
    );
}

#[test]
fn the_client_reports_its_version() {
    assert_eq!(vidsage::Gemini::version(), env!("CARGO_PKG_VERSION"));
    assert_eq!(vidsage::VERSION, env!("CARGO_PKG_VERSION"));
}
