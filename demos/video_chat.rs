//! Conversational research over a local video file.
//!
//! Usage: `video_chat <video.mp4> [context about you and your goal...]`
//!
//! Ingests the video, opens a research session seeded with your context,
//! then relays chat turns from stdin until an empty line.
use display_error_chain::DisplayErrorChain;
use std::io::{BufRead, Write};
use std::process::ExitCode;
use tracing::{info, warn};
use vidsage::{config::Settings, Gemini, Ingestor, LocalVideo, ResearchSession};

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
    let path = args
        .next()
        .ok_or("usage: video_chat <video.mp4> [context...]")?;
    let context = args.collect::<Vec<_>>().join(" ");

    let client = Gemini::from_settings(&settings)?;

    info!(path, "uploading video and waiting for processing");
    let video = Ingestor::from_settings(client.clone(), &settings)
        .ingest(&LocalVideo::new(&path))
        .await?;

    let mut session = ResearchSession::start(client, video, &context)?;
    println!("Video is ready. Ask about it (empty line to quit).");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            break;
        }

        // A failed turn is reported and the session stays usable; nothing
        // is retried automatically.
        match session.send(message).await {
            Ok(reply) => println!("\n{reply}\n"),
            Err(e) => eprintln!("error: {}", DisplayErrorChain::new(&e)),
        }
    }

    info!("cleaning up the remote file");
    if let Err((_, e)) = session.finish().delete().await {
        warn!(error = %e, "failed to delete the remote file");
    }

    Ok(())
}
