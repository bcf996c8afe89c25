//! YOLO detection runner and label exporter
//!
//! This library runs an object detector over images, folders, videos or a
//! camera and writes normalized YOLO label files for detector training.

pub mod annotate;
pub mod config;
pub mod conversion;
pub mod detector;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod types;
pub mod utils;

#[cfg(feature = "opencv")]
pub mod capture;
#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export commonly used types and functions
pub use config::{Args, Mode};
pub use detector::{Detector, DetectorParams};
pub use error::{LabelError, ProcessError};
pub use io::{export_labels, label_path_for};
pub use pipeline::{process_folder, process_single_image, FolderReport, ImageReport};
pub use types::{BoundingBox, Detection, ImageDimensions, LabelRecord, OutputDirs, StreamSource};
