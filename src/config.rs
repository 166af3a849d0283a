//! Fixed client configuration.
//!
//! Every value here is a startup constant. Components receive the structs by
//! value as props instead of reading module-level state.

use serde::{Deserialize, Serialize};

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MiB
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx"];

pub const UPLOAD_URL: &str = "/upload";
pub const LISTING_URL: &str = "/files";
pub const STATS_URL: &str = "/stats";
pub const FILES_API_URL: &str = "/api/files";
pub const DOWNLOAD_PREFIX: &str = "/download";
pub const DELETE_PREFIX: &str = "/delete";

pub const REFRESH_INTERVAL_MS: u32 = 30_000;
pub const REDIRECT_DELAY_MS: u32 = 1_500;

/// Settings for the upload intake surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeConfig {
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
    pub upload_url: String,
    pub listing_url: String,
    pub redirect_delay_ms: u32,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            upload_url: UPLOAD_URL.to_string(),
            listing_url: LISTING_URL.to_string(),
            redirect_delay_ms: REDIRECT_DELAY_MS,
        }
    }
}

/// Settings for the stats poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    pub stats_url: String,
    pub refresh_interval_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            stats_url: STATS_URL.to_string(),
            refresh_interval_ms: REFRESH_INTERVAL_MS,
        }
    }
}

/// Everything the browser app needs, handed to `App` at mount time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub intake: IntakeConfig,
    pub poll: PollConfig,
    pub files_api_url: String,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            files_api_url: FILES_API_URL.to_string(),
            ..Self::default()
        }
    }
}

pub fn download_url(stored_name: &str) -> String {
    format!("{}/{}", DOWNLOAD_PREFIX, stored_name)
}

pub fn delete_url(stored_name: &str) -> String {
    format!("{}/{}", DELETE_PREFIX, stored_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = ClientConfig::new();
        assert_eq!(config.intake.max_file_size, 10_485_760);
        assert_eq!(config.intake.allowed_extensions.len(), 8);
        assert_eq!(config.intake.upload_url, "/upload");
        assert_eq!(config.poll.refresh_interval_ms, 30_000);
        assert_eq!(config.files_api_url, "/api/files");
    }

    #[test]
    fn file_urls() {
        assert_eq!(download_url("abc_notes.txt"), "/download/abc_notes.txt");
        assert_eq!(delete_url("abc_notes.txt"), "/delete/abc_notes.txt");
    }
}
