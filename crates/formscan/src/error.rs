//! Host-facing errors
//!
//! Classification itself never fails; these cover loading documents.

use std::path::PathBuf;

use formscan_html::ParseError;

/// Scan error
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type ScanResult<T> = Result<T, ScanError>;
