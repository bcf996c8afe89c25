use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::conversion::convert_to_yolo_format;
use crate::error::LabelError;
use crate::types::{Detection, ImageDimensions};

/// Write the YOLO label file for one image.
///
/// The parent directory is created when missing and an existing file is
/// truncated. An empty detection list produces a zero-byte file. Dimensions
/// are validated before anything touches the filesystem.
pub fn export_labels(
    detections: &[Detection],
    dims: ImageDimensions,
    output_path: &Path,
) -> Result<(), LabelError> {
    if dims.width == 0 || dims.height == 0 {
        return Err(LabelError::InvalidDimensions {
            width: dims.width,
            height: dims.height,
        });
    }

    let yolo_data = convert_to_yolo_format(detections, dims);

    let io_failure = |source: std::io::Error| LabelError::IoFailure {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_failure)?;
        }
    }

    let mut writer = BufWriter::new(File::create(output_path).map_err(io_failure)?);
    writer.write_all(yolo_data.as_bytes()).map_err(io_failure)?;
    writer.flush().map_err(io_failure)
}

/// Label file location for a source image: `<label_dir>/<stem>.txt`.
///
/// The stem is kept byte for byte, so distinct image names never share a
/// label file.
pub fn label_path_for(image_path: &Path, label_dir: &Path) -> PathBuf {
    let mut file_name = image_path
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    file_name.push(".txt");
    label_dir.join(file_name)
}
