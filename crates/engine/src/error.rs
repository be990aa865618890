use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to open scan root '{path}': {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Failed to read metadata of '{path}': {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    /// Path of the file or directory the error refers to, when known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::RootUnreadable { path, .. }
            | Self::Metadata { path, .. }
            | Self::FileRead { path, .. } => Some(path.as_path()),
            Self::Walk(err) => walk_error_path(err),
            Self::Config(_) => None,
        }
    }
}

fn walk_error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        ignore::Error::Partial(errs) => errs.iter().find_map(walk_error_path),
        _ => None,
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
