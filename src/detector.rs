//! Detector abstraction and the model-independent parts of YOLO inference.
//!
//! Backends implement [`Detector`]; letterbox preprocessing, output decoding
//! and non-maximum suppression live here so they can be shared and tested
//! without a runtime.

use image::{imageops::FilterType, RgbImage};

use crate::types::{BoundingBox, Detection};

/// Produces pixel-space detections for an image.
///
/// One instance is built at startup and shared by reference across all
/// processed images, including from parallel workers.
pub trait Detector: Send + Sync {
    fn detect(&self, image: &RgbImage) -> anyhow::Result<Vec<Detection>>;

    /// Class names indexed by class id, empty when unknown
    fn class_names(&self) -> &[String] {
        &[]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    pub input_size: u32,
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            conf_threshold: 0.25,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }
}

/// Letterbox fill value, the usual 114 grey scaled to [0, 1]
pub const PAD_VALUE: f32 = 114.0 / 255.0;

/// Resize keeping aspect ratio into a `size x size` CHW tensor, top-left
/// aligned and padded. Returns the tensor data and the scale ratio applied.
pub fn letterbox(image: &RgbImage, size: u32) -> (Vec<f32>, f32) {
    let (w0, h0) = image.dimensions();
    let ratio = (size as f32 / w0 as f32).min(size as f32 / h0 as f32);
    let w_new = ((w0 as f32 * ratio).round() as u32).clamp(1, size);
    let h_new = ((h0 as f32 * ratio).round() as u32).clamp(1, size);
    let resized = image::imageops::resize(image, w_new, h_new, FilterType::Triangle);

    let plane = (size * size) as usize;
    let mut input = vec![PAD_VALUE; 3 * plane];
    for (x, y, pixel) in resized.enumerate_pixels() {
        let offset = (y * size + x) as usize;
        input[offset] = pixel[0] as f32 / 255.0;
        input[plane + offset] = pixel[1] as f32 / 255.0;
        input[2 * plane + offset] = pixel[2] as f32 / 255.0;
    }

    (input, ratio)
}

/// Decode a YOLOv8-style `[4 + nc, anchors]` output (batch dimension
/// already stripped) into source-image detections.
pub fn decode_predictions(
    data: &[f32],
    num_channels: usize,
    num_anchors: usize,
    ratio: f32,
    image_size: (u32, u32),
    params: &DetectorParams,
) -> Vec<Detection> {
    const CXYWH_OFFSET: usize = 4;
    if num_channels <= CXYWH_OFFSET || data.len() < num_channels * num_anchors {
        return Vec::new();
    }

    let width_original = image_size.0 as f64;
    let height_original = image_size.1 as f64;
    let ratio = ratio as f64;
    let at = |channel: usize, anchor: usize| data[channel * num_anchors + anchor];

    let mut detections = Vec::new();
    for anchor in 0..num_anchors {
        let (class_id, confidence) = (CXYWH_OFFSET..num_channels)
            .map(|c| (c - CXYWH_OFFSET, at(c, anchor)))
            .fold((0, f32::MIN), |best, x| if x.1 > best.1 { x } else { best });

        if confidence < params.conf_threshold {
            continue;
        }

        let cx = at(0, anchor) as f64 / ratio;
        let cy = at(1, anchor) as f64 / ratio;
        let w = at(2, anchor) as f64 / ratio;
        let h = at(3, anchor) as f64 / ratio;

        let bbox = BoundingBox::new(
            (cx - w / 2.0).clamp(0.0, width_original),
            (cy - h / 2.0).clamp(0.0, height_original),
            (cx + w / 2.0).clamp(0.0, width_original),
            (cy + h / 2.0).clamp(0.0, height_original),
        );
        detections.push(Detection::new(class_id as u32, bbox, confidence));
    }

    non_max_suppression(&mut detections, params.iou_threshold);
    detections.truncate(params.max_detections);
    detections
}

/// Class-aware NMS. Leaves survivors sorted by descending confidence.
pub fn non_max_suppression(detections: &mut Vec<Detection>, iou_threshold: f32) {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut current_index = 0;
    for index in 0..detections.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            let prev = &detections[prev_index];
            let cur = &detections[index];
            if prev.class_id == cur.class_id
                && prev.bbox.iou(&cur.bbox) > iou_threshold as f64
            {
                drop = true;
                break;
            }
        }
        if !drop {
            detections.swap(current_index, index);
            current_index += 1;
        }
    }
    detections.truncate(current_index);
}

