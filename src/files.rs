use serde::{Deserialize, Serialize};

use crate::format::file_extension;

/// One stored file, as listed by `GET /api/files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub stored_name: String,
    pub size: u64,
    pub size_formatted: String,
    /// Unix seconds.
    pub uploaded_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilesResponse {
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Coarse file category, used to pick icons and the preview element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Text,
    Document,
    Other,
}

impl FileKind {
    pub fn from_name(filename: &str) -> Self {
        match file_extension(filename).as_str() {
            "jpg" | "jpeg" | "png" | "gif" => Self::Image,
            "pdf" => Self::Pdf,
            "txt" => Self::Text,
            "doc" | "docx" => Self::Document,
            _ => Self::Other,
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Image => "fas fa-file-image",
            Self::Pdf => "fas fa-file-pdf",
            Self::Text => "fas fa-file-alt",
            Self::Document => "fas fa-file-word",
            Self::Other => "fas fa-file",
        }
    }

    /// Whether the browser can render the blob inline.
    pub const fn can_preview(self) -> bool {
        matches!(self, Self::Image | Self::Pdf | Self::Text)
    }
}

/// Keeps alphanumerics, `.`, `-` and `_`, and strips leading dots.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '-' || *c == '_')
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

/// Original name of a stored `<uuid>_<name>` file.
pub fn display_name(stored_name: &str) -> &str {
    match stored_name.split_once('_') {
        Some((_, name)) if !name.is_empty() => name,
        _ => stored_name,
    }
}
