use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a scan before any archive is inspected.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot access directory {}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },
}
