use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiskTesterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("write size {size} is not a positive multiple of {quantum} bytes")]
    InvalidSize { size: u64, quantum: u64 },

    #[error(
        "insufficient space in {}: {} bytes requested, {} available",
        .dest.display(),
        .requested,
        .available
    )]
    InsufficientSpace {
        dest: PathBuf,
        requested: u64,
        available: u64,
    },

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("digest file is empty: {}", .0.display())]
    EmptyDigest(PathBuf),

    #[error(
        "digest file {} does not hold a 40-character lowercase hex digest (got {:?})",
        .path.display(),
        .value
    )]
    MalformedDigest { path: PathBuf, value: String },

    #[error("digest mismatch for {}", .0.display())]
    DigestMismatch(PathBuf),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, DiskTesterError>;
