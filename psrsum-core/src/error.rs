use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SumError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Header error in {}: {reason}", .path.display())]
    Header { path: PathBuf, reason: String },

    #[error("Data directory {} does not exist!", .0.display())]
    MissingDataDir(PathBuf),

    #[error("Output directory {} does not exist!", .0.display())]
    MissingOutputDir(PathBuf),

    #[error("There is already a file named {}!", .0.display())]
    OutputExists(PathBuf),

    #[error("scan declined at confirmation prompt")]
    Declined,

    #[error("Timestamp format error: {0}")]
    Timestamp(#[from] time::error::Format),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, SumError>;
