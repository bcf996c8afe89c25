use crate::types::{Detection, ImageDimensions, LabelRecord};

/// Normalize a pixel-space detection to YOLO center/size form.
///
/// Inverted boxes are not corrected: `x1 > x2` yields a negative width.
pub fn calculate_bounding_box(detection: &Detection, dims: ImageDimensions) -> LabelRecord {
    let image_width = dims.width as f64;
    let image_height = dims.height as f64;
    let bbox = &detection.bbox;

    LabelRecord {
        class_id: detection.class_id,
        x_center: ((bbox.x1 + bbox.x2) / 2.0) / image_width,
        y_center: ((bbox.y1 + bbox.y2) / 2.0) / image_height,
        width: (bbox.x2 - bbox.x1) / image_width,
        height: (bbox.y2 - bbox.y1) / image_height,
    }
}

/// Render one label row, without the trailing newline.
///
/// `{:.6}` rounds the exact binary value of each float, ties to even.
pub fn format_record(record: &LabelRecord) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        record.class_id, record.x_center, record.y_center, record.width, record.height
    )
}

/// Convert a detection list to the full contents of a label file
pub fn convert_to_yolo_format(detections: &[Detection], dims: ImageDimensions) -> String {
    let mut yolo_data = String::with_capacity(detections.len() * 48);

    for detection in detections {
        let record = calculate_bounding_box(detection, dims);
        yolo_data.push_str(&format_record(&record));
        yolo_data.push('\n');
    }

    yolo_data
}

