// Error types for the reelpipe core
// None of these are fatal - callers turn them into empty scans, missing grants or inactive routes

use thiserror::Error;

/// A location string that can't be turned into a usable handle
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Malformed location '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("Unsupported location scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Location has no document identifier: {0}")]
    NoDocumentId(String),
}

/// Failures while resolving or listing a folder handle
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Folder cannot be resolved: {0}")]
    Unresolvable(String),

    #[error("Not a folder: {0}")]
    NotAFolder(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Location(#[from] LocationError),
}

/// Failures reported by a platform collaborator (audio subsystem, playback engine host)
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Platform service unavailable: {0}")]
    Unavailable(String),

    #[error("Platform rejected request: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while probing a container for its audio stream
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Location is not readable: {0}")]
    Unreadable(String),

    #[error("Container could not be parsed: {0}")]
    Container(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Location(#[from] LocationError),
}
