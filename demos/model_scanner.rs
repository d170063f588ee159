//! Scan the configured API key for usable models.
//!
//! Lists every model the key can reach and reports the ones that support
//! content generation. Handy for diagnosing an invalid key or a blocked
//! region before blaming the ingestion flow.
use display_error_chain::DisplayErrorChain;
use futures::TryStreamExt;
use std::process::ExitCode;
use vidsage::{config::Settings, Gemini};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    match do_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error_chain = DisplayErrorChain::new(e.as_ref());
            eprintln!("scanner error: {error_chain}");
            ExitCode::FAILURE
        }
    }
}

async fn do_main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let client = Gemini::from_settings(&settings)?;

    println!("vidsage {} model scanner", Gemini::version());
    println!("Scanning your API key for available models...");

    let models: Vec<_> = client.list_models(None).try_collect().await?;

    let mut found_any = false;
    for model in &models {
        if model.supports_generation() {
            println!("AVAILABLE: {}", model.name);
            found_any = true;
        }
    }

    if !found_any {
        return Err("no generation-capable models found; \
                    your API key might be invalid or your region is blocked"
            .into());
    }

    Ok(())
}
