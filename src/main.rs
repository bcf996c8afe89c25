use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};

use yolo_labeler::onnx::OnnxDetector;
use yolo_labeler::utils::load_class_names;
use yolo_labeler::{
    process_folder, process_single_image, Args, Detector, Mode, OutputDirs, StreamSource,
};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let names = match &args.names {
        Some(path) => load_class_names(path)
            .with_context(|| format!("Failed to read class names from {}", path.display()))?,
        None => Vec::new(),
    };
    let detector = OnnxDetector::load(&args.model, args.detector_params())?.with_class_names(names);

    match &args.mode {
        Mode::SingleImage {
            path,
            output_dir,
            label_dir,
            show_ms,
        } => {
            let output_dirs = OutputDirs {
                images_dir: output_dir.clone(),
                labels_dir: label_dir.clone(),
            };
            let report = process_single_image(path, &detector, &output_dirs)?;
            info!("Labels saved: {}", report.label_path.display());
            info!("Annotated image saved: {}", report.annotated_path.display());
            show_result(&report.annotated_path, *show_ms)
        }
        Mode::Camera { index } => {
            info!("Starting camera {} (ESC to quit)...", index);
            stream(StreamSource::Camera(*index), &detector)
        }
        Mode::Video { path } => {
            info!("Playing {} (ESC to quit)...", path.display());
            stream(StreamSource::Video(path.clone()), &detector)
        }
        Mode::Folder {
            dir,
            output_dir,
            label_dir,
        } => {
            if !dir.exists() {
                bail!("The specified folder does not exist: {}", dir.display());
            }
            let output_dirs = OutputDirs {
                images_dir: output_dir.clone(),
                labels_dir: label_dir.clone(),
            };
            let report = process_folder(dir, &detector, &output_dirs);
            report.print_summary(detector.class_names());
            info!("Batch processing complete.");
            Ok(())
        }
    }
}

#[cfg(feature = "opencv")]
fn stream(source: StreamSource, detector: &dyn Detector) -> Result<()> {
    let frames = yolo_labeler::capture::run_stream(&source, detector)?;
    info!("Displayed {} frames", frames);
    Ok(())
}

#[cfg(not(feature = "opencv"))]
fn stream(_source: StreamSource, _detector: &dyn Detector) -> Result<()> {
    bail!("Camera and video modes need the `opencv` feature")
}

#[cfg(feature = "opencv")]
fn show_result(annotated_path: &std::path::Path, show_ms: i32) -> Result<()> {
    let image = image::open(annotated_path)
        .with_context(|| format!("Failed to reopen {}", annotated_path.display()))?
        .to_rgb8();
    yolo_labeler::capture::show_image(&image, show_ms)
}

#[cfg(not(feature = "opencv"))]
fn show_result(annotated_path: &std::path::Path, _show_ms: i32) -> Result<()> {
    log::warn!(
        "Result window not shown for {}: built without the `opencv` feature",
        annotated_path.display()
    );
    Ok(())
}
