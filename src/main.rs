use clap::Parser;
use prescription_ocr::cli::{Args, Command};
use prescription_ocr::config::Config;
use prescription_ocr::{engines, server, OcrProcessor, Prescription};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(&args);

    match args.command {
        Some(Command::Extract { path }) => extract(config, &path).await,
        Some(Command::Serve) | None => {
            tracing::info!(
                "Starting prescription-ocr v{}",
                env!("CARGO_PKG_VERSION")
            );
            tracing::info!("Binding to {}:{}", config.host, config.port);

            server::run(config).await
        }
    }
}

/// Run the whole pipeline on one file and print the text
async fn extract(config: Config, path: &Path) -> anyhow::Result<()> {
    tracing::info!("Processing prescription image: {}", path.display());

    let path = path.to_path_buf();
    let prescription = tokio::task::spawn_blocking(move || -> anyhow::Result<Prescription> {
        let engine = engines::default_engine(&config)?;
        Ok(OcrProcessor::new(engine).process_prescription(&path)?)
    })
    .await?
    .inspect_err(|e| tracing::error!("Error processing prescription: {}", e))?;

    println!("Extracted text from prescription:");
    println!("{}", prescription.text);

    Ok(())
}
