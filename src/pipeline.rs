use dashmap::DashMap;
use image::RgbImage;
use log::{error, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::annotate::draw_detections;
use crate::detector::Detector;
use crate::error::ProcessError;
use crate::io::{export_labels, label_path_for};
use crate::types::{ImageDimensions, OutputDirs, ProcessingStats};
use crate::utils::{class_label, collect_images, create_output_directory, create_progress_bar};

/// Result of running one image through detection, labeling and annotation
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub image_path: PathBuf,
    pub label_path: PathBuf,
    pub annotated_path: PathBuf,
    pub class_ids: Vec<u32>,
    pub inverted_boxes: usize,
}

/// Outcome of a folder run
#[derive(Debug, Default)]
pub struct FolderReport {
    pub stats: ProcessingStats,
    pub class_counts: Vec<(u32, usize)>,
}

impl FolderReport {
    pub fn print_summary(&self, names: &[String]) {
        self.stats.print_summary();
        for (class_id, count) in &self.class_counts {
            info!("  {}: {} objects", class_label(names, *class_id), count);
        }
    }
}

/// Detect on one image, write its label file and save the annotated copy.
///
/// The label file is written even when nothing is detected.
pub fn process_single_image(
    image_path: &Path,
    detector: &dyn Detector,
    output_dirs: &OutputDirs,
) -> Result<ImageReport, ProcessError> {
    let image = image::open(image_path)
        .map_err(|source| ProcessError::UnreadableImage {
            path: image_path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    let (annotated, report) = label_image(image_path, image, detector, &output_dirs.labels_dir)?;

    create_output_directory(&output_dirs.images_dir).map_err(|source| {
        ProcessError::CreateDir {
            path: output_dirs.images_dir.clone(),
            source,
        }
    })?;
    let file_name = image_path.file_name().unwrap_or_default();
    let annotated_path = output_dirs.images_dir.join(file_name);
    annotated
        .save(&annotated_path)
        .map_err(|source| ProcessError::SaveImage {
            path: annotated_path.clone(),
            source,
        })?;

    Ok(ImageReport {
        annotated_path,
        ..report
    })
}

/// Detection and label export on an already decoded image. Returns the
/// annotated image; the report's `annotated_path` is left empty.
pub fn label_image(
    image_path: &Path,
    mut image: RgbImage,
    detector: &dyn Detector,
    labels_dir: &Path,
) -> Result<(RgbImage, ImageReport), ProcessError> {
    let dims = ImageDimensions::new(image.width(), image.height());
    let detections = detector
        .detect(&image)
        .map_err(|e| ProcessError::Detection {
            path: image_path.to_path_buf(),
            source: e.into(),
        })?;

    let inverted_boxes = detections.iter().filter(|d| d.bbox.is_inverted()).count();
    if inverted_boxes > 0 {
        warn!(
            "{} detection(s) with inverted corners in {}; writing negative sizes as-is",
            inverted_boxes,
            image_path.display()
        );
    }

    let label_path = label_path_for(image_path, labels_dir);
    export_labels(&detections, dims, &label_path)?;

    draw_detections(&mut image, &detections, detector.class_names());

    let report = ImageReport {
        image_path: image_path.to_path_buf(),
        label_path,
        annotated_path: PathBuf::new(),
        class_ids: detections.iter().map(|d| d.class_id).collect(),
        inverted_boxes,
    };
    Ok((image, report))
}

/// Run every image of a folder through [`process_single_image`] in parallel.
///
/// Per-image failures are logged and counted; the run continues.
pub fn process_folder(
    dir: &Path,
    detector: &dyn Detector,
    output_dirs: &OutputDirs,
) -> FolderReport {
    let images = collect_images(dir);
    if images.is_empty() {
        warn!("No images found in folder {}", dir.display());
        return FolderReport::default();
    }

    info!("Found {} images, starting batch processing...", images.len());

    let class_counts: DashMap<u32, usize> = DashMap::new();
    let pb = create_progress_bar(images.len() as u64, "Images");

    let results: Vec<_> = images
        .par_iter()
        .map(|image_path| {
            let result = process_single_image(image_path, detector, output_dirs);
            match &result {
                Ok(report) => {
                    for class_id in &report.class_ids {
                        *class_counts.entry(*class_id).or_insert(0) += 1;
                    }
                    info!("Processed: {}", report.annotated_path.display());
                }
                Err(ProcessError::UnreadableImage { path, source }) => {
                    warn!("Skipping unreadable image {}: {}", path.display(), source);
                }
                Err(e) => error!("Failed to process {}: {}", image_path.display(), e),
            }
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_with_message("Batch processing complete");

    let mut stats = ProcessingStats::new();
    for result in &results {
        match result {
            Ok(report) => stats.record_labeled(report.class_ids.len(), report.inverted_boxes),
            Err(ProcessError::UnreadableImage { .. }) => stats.record_unreadable(),
            Err(_) => stats.record_failed(),
        }
    }

    let mut class_counts: Vec<(u32, usize)> = class_counts.into_iter().collect();
    class_counts.sort_by_key(|&(class_id, _)| class_id);

    FolderReport {
        stats,
        class_counts,
    }
}
