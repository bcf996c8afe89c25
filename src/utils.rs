use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::types::IMG_FORMATS;

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Create an output directory if it is missing. Existing contents are kept.
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

/// List the images directly inside `dir`, sorted and without duplicates
pub fn collect_images(dir: &Path) -> Vec<PathBuf> {
    let escaped_dir = Pattern::escape(&dir.to_string_lossy());
    let mut images = BTreeSet::new();

    for ext in IMG_FORMATS {
        let pattern = format!("{}/*.{}", escaped_dir, ext);
        match glob(&pattern) {
            Ok(paths) => images.extend(paths.filter_map(|entry| entry.ok())),
            Err(e) => warn!("Invalid image glob pattern {}: {}", pattern, e),
        }
    }

    images.into_iter().collect()
}

/// Load class names, one per line, skipping blank lines
pub fn load_class_names(path: &Path) -> std::io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Display name for a class id, falling back to the numeric id
pub fn class_label(names: &[String], class_id: u32) -> String {
    names
        .get(class_id as usize)
        .cloned()
        .unwrap_or_else(|| class_id.to_string())
}

