pub mod config;
pub mod files;
pub mod filter;
pub mod format;
pub mod intake;
pub mod notify;
pub mod progress;
pub mod stats;
pub mod theme;

pub use config::{ClientConfig, IntakeConfig, PollConfig};
pub use files::{ApiResponse, FileEntry, FileKind, FilesResponse};
pub use format::format_file_size;
pub use intake::{Intake, SelectedFile, ValidationError};
pub use notify::{Notice, NotificationCenter, Severity};
pub use stats::StatsSnapshot;
pub use theme::Theme;

#[cfg(feature = "frontend")]
pub mod frontend;

#[cfg(feature = "frontend")]
pub use frontend::run;
