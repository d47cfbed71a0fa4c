//! Centralized error handling for cpustat

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a cpustat run
#[derive(Debug, Error)]
pub enum CpustatError {
    /// A mandatory pseudo-file is missing or unreadable
    #[error("cannot read {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A mandatory pseudo-file was read but its contents make no sense
    #[error("malformed {}: {detail}", path.display())]
    Malformed { path: PathBuf, detail: String },
    /// uname(2) itself failed
    #[error("kernel identity unavailable: {0}")]
    Kernel(#[source] io::Error),
    /// Configuration file present but unusable
    #[error("config error in {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },
    /// JSON serialization failed
    #[error("cannot render JSON: {0}")]
    Render(#[from] serde_json::Error),
}

impl CpustatError {
    pub(crate) fn unavailable(source: io::Error, path: impl Into<PathBuf>) -> Self {
        CpustatError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        CpustatError::Malformed {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// True for failures of a mandatory data source (cpuinfo, meminfo, uname)
    pub fn is_fatal_source(&self) -> bool {
        matches!(
            self,
            CpustatError::SourceUnavailable { .. }
                | CpustatError::Malformed { .. }
                | CpustatError::Kernel(_)
        )
    }
}

/// Type alias for Results in cpustat
pub type Result<T> = std::result::Result<T, CpustatError>;
