//! One-shot analysis of a video fetched from a URL.
//!
//! Usage: `url_report <url> [context about you and your goal...]`
//!
//! Fetches the video through `yt-dlp`, ingests it, generates a single
//! method-extraction report applied to your context, and prints it. No
//! conversation state is kept.
use display_error_chain::DisplayErrorChain;
use std::process::ExitCode;
use tracing::{info, warn};
use vidsage::{analyze_once, config::Settings, Gemini, Ingestor, RemoteVideo};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    match do_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error_chain = DisplayErrorChain::new(e.as_ref());
            tracing::error!(error.chained = %error_chain, "execution failed");
            ExitCode::FAILURE
        }
    }
}

async fn do_main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let mut args = std::env::args().skip(1);
    let url = args.next().ok_or("usage: url_report <url> [context...]")?;
    let context = args.collect::<Vec<_>>().join(" ");

    let client = Gemini::from_settings(&settings)?;

    info!(url, "fetching and ingesting video");
    let video = Ingestor::from_settings(client.clone(), &settings)
        .ingest(&RemoteVideo::new(&url))
        .await?;

    let report = analyze_once(&client, &video, &context).await?;
    println!("{report}");

    if let Err((_, e)) = video.delete().await {
        warn!(error = %e, "failed to delete the remote file");
    }

    Ok(())
}
