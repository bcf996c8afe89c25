//! Camera / video capture and window display through OpenCV.

use anyhow::{bail, Context, Result};
use image::RgbImage;
use log::{info, warn};
use opencv::{
    core::{Mat, Scalar, CV_8UC3},
    highgui,
    prelude::*,
    videoio,
};

use crate::annotate::draw_detections;
use crate::detector::Detector;
use crate::types::StreamSource;

const WINDOW_NAME: &str = "YOLOv8";
const ESC_KEY: i32 = 27;

/// Detect and display frames until the source runs dry or ESC is pressed.
/// Returns the number of frames shown.
pub fn run_stream(source: &StreamSource, detector: &dyn Detector) -> Result<usize> {
    let mut cap = match source {
        StreamSource::Camera(index) => videoio::VideoCapture::new(*index, videoio::CAP_ANY)
            .with_context(|| format!("Failed to open camera {}", index))?,
        StreamSource::Video(path) => {
            videoio::VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)
                .with_context(|| format!("Failed to open video {}", path.display()))?
        }
    };
    if !cap.is_opened()? {
        bail!("Capture source {:?} could not be opened", source);
    }

    highgui::named_window(WINDOW_NAME, highgui::WINDOW_AUTOSIZE)?;
    let mut frame = Mat::default();
    let mut shown = 0;

    loop {
        if !cap.read(&mut frame)? || frame.empty() {
            warn!("Could not read a frame from {:?}, stopping", source);
            break;
        }

        let mut rgb = mat_to_rgb_image(&frame)?;
        let detections = detector.detect(&rgb)?;
        draw_detections(&mut rgb, &detections, detector.class_names());

        highgui::imshow(WINDOW_NAME, &rgb_image_to_mat(&rgb)?)?;
        shown += 1;

        if highgui::wait_key(1)? == ESC_KEY {
            info!("ESC pressed, stopping");
            break;
        }
    }

    cap.release()?;
    highgui::destroy_all_windows()?;
    Ok(shown)
}

/// Show an annotated image for `delay_ms` milliseconds
pub fn show_image(image: &RgbImage, delay_ms: i32) -> Result<()> {
    highgui::imshow(WINDOW_NAME, &rgb_image_to_mat(image)?)?;
    highgui::wait_key(delay_ms)?;
    highgui::destroy_all_windows()?;
    Ok(())
}

fn mat_to_rgb_image(mat: &Mat) -> Result<RgbImage> {
    if mat.typ() != CV_8UC3 {
        bail!("Unsupported frame type {}", mat.typ());
    }
    // a fresh copy is always continuous
    let mat = mat.try_clone()?;
    let (cols, rows) = (mat.cols() as u32, mat.rows() as u32);

    let mut rgb = mat.data_bytes()?.to_vec();
    for pixel in rgb.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }

    RgbImage::from_raw(cols, rows, rgb).context("Frame buffer does not match its dimensions")
}

fn rgb_image_to_mat(image: &RgbImage) -> Result<Mat> {
    let (width, height) = image.dimensions();
    let mut mat =
        Mat::new_rows_cols_with_default(height as i32, width as i32, CV_8UC3, Scalar::all(0.0))?;

    let bgr = mat.data_bytes_mut()?;
    for (dst, src) in bgr.chunks_exact_mut(3).zip(image.as_raw().chunks_exact(3)) {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
    }

    Ok(mat)
}
