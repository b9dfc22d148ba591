//! Error types for defect analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by an [`ImageSource`](crate::ImageSource) while loading a raster.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Image file '{path}' not found")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported image format in '{path}': {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("Image '{path}' is {width}x{height}, at least {min}x{min} is required")]
    ImageTooSmall {
        path: PathBuf,
        width: usize,
        height: usize,
        min: usize,
    },

    #[error("Failed to allocate {bytes} bytes for image '{path}'")]
    AllocationFailure { path: PathBuf, bytes: usize },

    #[error("Failed to read image '{path}': {reason}")]
    ReadFailure { path: PathBuf, reason: String },
}

/// Errors that can occur during defect analysis.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported window size {window_size}, expected one of {supported:?}")]
    InvalidWindowSize {
        window_size: usize,
        supported: &'static [usize],
    },

    #[error("{width}x{height} image is too small for a {window_size}x{window_size} window")]
    ImageTooSmall {
        width: usize,
        height: usize,
        window_size: usize,
    },

    #[error("Threshold {0} must lie strictly between 0 and 1")]
    InvalidThreshold(f64),

    #[error(transparent)]
    Load(#[from] LoadError),
}

pub type Result<T> = std::result::Result<T, Error>;
