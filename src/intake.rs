//! Upload intake: selection, validation and the submit lifecycle.
//!
//! `Intake` owns the only selected file. The frontend feeds it browser
//! events and acts on what it returns; nothing in here touches the DOM, so
//! every branch of the flow is exercised natively.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::IntakeConfig;
use crate::format::{file_extension, format_file_size};
use crate::notify::Notice;
use crate::progress::SimulatedProgress;

pub const MSG_UPLOAD_OK: &str = "File uploaded successfully!";
pub const MSG_UPLOAD_REJECTED: &str = "Upload failed!";
pub const MSG_UPLOAD_NETWORK: &str = "Upload failed! Check console for details.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File too large! Maximum size is {limit}")]
    TooLarge { size: u64, limit: String },
    #[error("File type not allowed!")]
    TypeNotAllowed { extension: String },
    #[error("Please select a file!")]
    NoFile,
    #[error("An upload is already in progress")]
    Busy,
}

/// Name, size and declared MIME type of a picked or dropped file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// What the selection panel shows for an accepted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub size: String,
    pub kind: String,
    pub wants_preview: bool,
}

impl From<&SelectedFile> for FileSummary {
    fn from(file: &SelectedFile) -> Self {
        let kind = if file.mime_type.is_empty() {
            "Unknown".to_string()
        } else {
            file.mime_type.clone()
        };
        Self {
            name: file.name.clone(),
            size: format_file_size(file.size),
            kind,
            wants_preview: file.is_image(),
        }
    }
}

impl IntakeConfig {
    pub fn check_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size,
                limit: format_file_size(self.max_file_size),
            });
        }
        Ok(())
    }

    pub fn check_name(&self, name: &str) -> Result<(), ValidationError> {
        let extension = file_extension(name);
        if self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            Ok(())
        } else {
            Err(ValidationError::TypeNotAllowed { extension })
        }
    }

    /// Size first, then extension.
    pub fn validate(&self, file: &SelectedFile) -> Result<(), ValidationError> {
        self.check_size(file.size)?;
        self.check_name(&file.name)
    }
}

/// How the upload request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The request completed with this HTTP status.
    Status(u16),
    /// The request never produced a response.
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub url: String,
    pub delay_ms: u32,
}

/// What the view should do once an upload settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub notice: Notice,
    pub redirect: Option<Redirect>,
}

#[derive(Debug, Clone)]
pub struct Intake {
    config: IntakeConfig,
    selected: Option<SelectedFile>,
    submit_enabled: bool,
    progress: Option<SimulatedProgress>,
    in_flight: bool,
    pending_redirect: Option<Redirect>,
}

impl Intake {
    pub fn new(config: IntakeConfig) -> Self {
        Self {
            config,
            selected: None,
            submit_enabled: false,
            progress: None,
            in_flight: false,
            pending_redirect: None,
        }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled && !self.is_busy()
    }

    /// Uploading, or finished and waiting to leave for the listing.
    fn is_busy(&self) -> bool {
        self.in_flight || self.pending_redirect.is_some()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn progress(&self) -> Option<SimulatedProgress> {
        self.progress
    }

    /// Validates and, on success, replaces the current selection. A rejected
    /// file leaves the previous selection in place but disables submit.
    pub fn select(&mut self, file: SelectedFile) -> Result<FileSummary, ValidationError> {
        if let Err(err) = self.config.validate(&file) {
            log::info!("rejected {}: {}", file.name, err);
            self.submit_enabled = false;
            return Err(err);
        }

        let summary = FileSummary::from(&file);
        self.selected = Some(file);
        self.submit_enabled = true;
        Ok(summary)
    }

    /// Returns the file to send and starts the progress simulation. Nothing
    /// should be sent when this fails.
    pub fn begin_submit(&mut self) -> Result<SelectedFile, ValidationError> {
        if self.is_busy() {
            return Err(ValidationError::Busy);
        }
        let file = match &self.selected {
            Some(file) if self.submit_enabled && file.size > 0 => file.clone(),
            _ => return Err(ValidationError::NoFile),
        };

        self.in_flight = true;
        self.progress = Some(SimulatedProgress::new());
        Ok(file)
    }

    /// Advances the simulated bar. `None` when no upload is running.
    pub fn tick(&mut self) -> Option<crate::progress::Tick> {
        if !self.in_flight {
            return None;
        }
        self.progress.as_mut().map(SimulatedProgress::advance)
    }

    pub fn finish(&mut self, outcome: UploadOutcome) -> Completion {
        self.in_flight = false;

        match outcome {
            UploadOutcome::Status(status) if (200..300).contains(&status) => {
                if let Some(progress) = self.progress.as_mut() {
                    progress.complete();
                }
                let redirect = Redirect {
                    url: self.config.listing_url.clone(),
                    delay_ms: self.config.redirect_delay_ms,
                };
                self.pending_redirect = Some(redirect.clone());
                Completion {
                    notice: Notice::success(MSG_UPLOAD_OK),
                    redirect: Some(redirect),
                }
            }
            UploadOutcome::Status(status) => {
                log::warn!("upload rejected with status {}", status);
                self.progress = None;
                Completion {
                    notice: Notice::error(MSG_UPLOAD_REJECTED),
                    redirect: None,
                }
            }
            UploadOutcome::Network(reason) => {
                log::error!("upload error: {}", reason);
                self.progress = None;
                Completion {
                    notice: Notice::error(MSG_UPLOAD_NETWORK),
                    redirect: None,
                }
            }
        }
    }

    /// Hands out the pending redirect once its delay has elapsed. `None` if
    /// it was already followed or abandoned.
    pub fn take_redirect(&mut self) -> Option<Redirect> {
        self.pending_redirect.take()
    }

    /// Drops a pending redirect, e.g. when the form is unmounted first.
    pub fn abandon_redirect(&mut self) {
        if self.pending_redirect.take().is_some() {
            log::debug!("pending redirect abandoned");
        }
    }
}
