use crate::cli::Args;
use std::path::PathBuf;

/// File extensions accepted by the upload endpoint
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub language: String,
    pub max_file_size: usize,
    pub tessdata_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9292,
            language: "eng".to_string(),
            max_file_size: 16 * 1024 * 1024,
            tessdata_path: None,
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            language: args.language.clone(),
            max_file_size: args.max_file_size,
            tessdata_path: args.tessdata_path.clone(),
        }
    }
}

/// Whether an uploaded file name carries an accepted image extension
pub fn is_allowed_filename(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    ALLOWED_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}
