use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse `UPLOAD_ALLOWED_EXTENSIONS` (comma-separated, lowercased).
fn parse_allowed_extensions() -> Vec<String> {
    match env::var("UPLOAD_ALLOWED_EXTENSIONS") {
        Ok(val) if !val.is_empty() => val
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => default_allowed_extensions(),
    }
}

fn default_allowed_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Immutable application configuration, assembled once at startup and
/// passed down through service state. Both binaries read the same set of
/// variables so a shared `.env` configures the whole deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub ingress: ServerConfig,
    pub recognition: ServerConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
    pub ocr: OcrConfig,
    pub recognition_client: RecognitionClientConfig,
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory shared by both services; the de facto asset-transfer
    /// medium (no binary payload crosses the service boundary).
    pub upload_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Allow-list checked against the *claimed* filename, before any
    /// content inspection.
    pub allowed_extensions: Vec<String>,
    pub max_file_size: usize,
}

impl UploadConfig {
    pub fn is_allowed_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.allowed_extensions.iter().any(|e| *e == ext)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Comma-separated ISO 639-2 language codes for the engine.
    pub languages: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeConfig {
    /// Size of the blocking worker pool the normalizer runs on. Requests
    /// beyond this queue rather than occupying the accept loop.
    pub max_concurrent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ingress: ServerConfig {
                host: env::var("INGRESS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("INGRESS_PORT", 5000),
            },
            recognition: ServerConfig {
                host: env::var("OCR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("OCR_PORT", 5001),
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from(
                    env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
                ),
            },
            upload: UploadConfig {
                allowed_extensions: parse_allowed_extensions(),
                max_file_size: parse_env_or("UPLOAD_MAX_FILE_SIZE", 25 * 1024 * 1024),
            },
            ocr: OcrConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "eng".to_string()),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
            },
            recognition_client: RecognitionClientConfig {
                base_url: env::var("RECOGNITION_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:5001".to_string()),
                timeout_secs: parse_env_or("RECOGNITION_TIMEOUT", 10),
            },
            normalize: NormalizeConfig {
                max_concurrent: parse_env_or("NORMALIZE_MAX_CONCURRENT", 4),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
