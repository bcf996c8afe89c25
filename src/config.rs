use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::detector::DetectorParams;

/// Run a YOLO detector over an image, a folder, a video or a camera and
/// export YOLO label files.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Path to the ONNX detector model
    #[arg(short = 'm', long = "model", default_value = "yolov8tennis.onnx")]
    pub model: PathBuf,

    /// Minimum class score for a detection to be kept
    #[arg(long = "conf", default_value_t = 0.25, value_parser = validate_threshold)]
    pub conf: f32,

    /// IoU threshold for non-maximum suppression
    #[arg(long = "iou", default_value_t = 0.7, value_parser = validate_threshold)]
    pub iou: f32,

    /// Square model input size in pixels
    #[arg(long = "imgsz", default_value_t = 640)]
    pub imgsz: u32,

    /// Optional file with one class name per line
    #[arg(long = "names")]
    pub names: Option<PathBuf>,

    #[command(subcommand)]
    pub mode: Mode,
}

/// What to run the detector over
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Mode {
    /// Detect on one image, save the annotated copy and its label file
    #[command(name = "image")]
    SingleImage {
        path: PathBuf,

        #[arg(long = "output_dir", default_value = "single_output")]
        output_dir: PathBuf,

        #[arg(long = "label_dir", default_value = "single_labels")]
        label_dir: PathBuf,

        /// How long the result window stays open, in milliseconds
        #[arg(long = "show_ms", default_value_t = 5000)]
        show_ms: i32,
    },

    /// Live detection on a camera (ESC quits)
    Camera {
        #[arg(long = "index", default_value_t = 0)]
        index: i32,
    },

    /// Detection on a video file (ESC quits)
    Video { path: PathBuf },

    /// Batch detection and label export over a folder of images
    Folder {
        dir: PathBuf,

        #[arg(long = "output_dir", default_value = "output_images")]
        output_dir: PathBuf,

        #[arg(long = "label_dir", default_value = "output_labels")]
        label_dir: PathBuf,
    },
}

impl Args {
    pub fn detector_params(&self) -> DetectorParams {
        DetectorParams {
            conf_threshold: self.conf,
            iou_threshold: self.iou,
            input_size: self.imgsz,
            ..DetectorParams::default()
        }
    }
}

// Validate that a threshold is between 0.0 and 1.0
pub fn validate_threshold(s: &str) -> Result<f32, String> {
    match f32::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("threshold must be between 0.0 and 1.0".to_string()),
    }
}

