use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prescription-ocr")]
#[command(about = "Extract text from photos of paper prescriptions")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Host address to bind to
    #[arg(long, global = true, env = "RX_OCR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, global = true, env = "RX_OCR_PORT", default_value = "9292")]
    pub port: u16,

    /// Tesseract language code (e.g., "eng", "deu", "fra")
    #[arg(long, global = true, env = "RX_OCR_LANGUAGE", default_value = "eng")]
    pub language: String,

    /// Maximum upload size in bytes (default: 16MB)
    #[arg(long, global = true, env = "RX_OCR_MAX_FILE_SIZE", default_value = "16777216")]
    pub max_file_size: usize,

    /// Path to tessdata directory (downloaded to the cache dir if not set)
    #[arg(long, global = true, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the upload server (default)
    Serve,
    /// Extract text from a single prescription photo and print it
    Extract {
        /// Path to a PNG or JPEG photo
        path: PathBuf,
    },
}
