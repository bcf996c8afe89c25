use std::path::PathBuf;
use thiserror::Error;

/// Failures of the label exporter
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("invalid image dimensions {width}x{height}: both sides must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to write label file {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while processing one image end to end
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to read image {}: {source}", .path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("detection failed for {}: {source}", .path.display())]
    Detection {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error("failed to save annotated image {}: {source}", .path.display())]
    SaveImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
