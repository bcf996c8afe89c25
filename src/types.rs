use std::path::PathBuf;

// Image extensions picked up in folder mode
pub const IMG_FORMATS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

/// Axis-aligned box in source-image pixel coordinates.
///
/// `x1 <= x2` and `y1 <= y2` is expected but not enforced; an inverted box
/// produces a negative normalized width or height in the label file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn is_inverted(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }

    /// Intersection over union with another box
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let ix = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let iy = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let inter = ix * iy;
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// One object instance reported by a detector
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub class_id: u32,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

impl Detection {
    pub fn new(class_id: u32, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            class_id,
            bbox,
            confidence,
        }
    }
}

/// Pixel size of the image a set of detections belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A normalized label row: `class_id x_center y_center width height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRecord {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// Where live frames come from in the stream modes
#[derive(Debug, Clone, PartialEq)]
pub enum StreamSource {
    Camera(i32),
    Video(PathBuf),
}

// Output locations for annotated images and label files
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub total_images: usize,
    pub labeled_images: usize,
    pub empty_labels: usize,
    pub skipped_unreadable: usize,
    pub failed_images: usize,
    pub total_detections: usize,
    pub inverted_boxes: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_labeled(&mut self, detections: usize, inverted: usize) {
        self.total_images += 1;
        self.labeled_images += 1;
        if detections == 0 {
            self.empty_labels += 1;
        }
        self.total_detections += detections;
        self.inverted_boxes += inverted;
    }

    pub fn record_unreadable(&mut self) {
        self.total_images += 1;
        self.skipped_unreadable += 1;
    }

    pub fn record_failed(&mut self) {
        self.total_images += 1;
        self.failed_images += 1;
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Total images: {}", self.total_images);
        log::info!("Labeled images: {}", self.labeled_images);
        log::info!("Images without detections: {}", self.empty_labels);
        log::info!("Total detections: {}", self.total_detections);
        log::info!("Failed images: {}", self.failed_images);

        if self.skipped_unreadable > 0 {
            log::warn!("Skipped (unreadable image): {}", self.skipped_unreadable);
        }
        if self.inverted_boxes > 0 {
            log::warn!(
                "Boxes with inverted corners written as-is: {}",
                self.inverted_boxes
            );
        }
    }
}
