//! ONNX Runtime backend for YOLOv8-style detection exports.

use anyhow::{anyhow, bail, Context, Result};
use image::RgbImage;
use log::info;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

use crate::detector::{decode_predictions, letterbox, Detector, DetectorParams};
use crate::types::Detection;

pub struct OnnxDetector {
    session: Mutex<Session>,
    params: DetectorParams,
    names: Vec<String>,
}

impl OnnxDetector {
    pub fn load(path: &Path, params: DetectorParams) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load ONNX model {}", path.display()))?;

        info!(
            "Loaded model {} (input {}x{}, conf {}, iou {})",
            path.display(),
            params.input_size,
            params.input_size,
            params.conf_threshold,
            params.iou_threshold
        );

        Ok(Self {
            session: Mutex::new(session),
            params,
            names: Vec::new(),
        })
    }

    pub fn with_class_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }
}

impl Detector for OnnxDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>> {
        let size = self.params.input_size;
        let (input, ratio) = letterbox(image, size);
        let input_shape = vec![1i64, 3, size as i64, size as i64];
        let input_tensor = Tensor::from_array((input_shape, input))?;

        let (dims, data) = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| anyhow!("ONNX session lock poisoned"))?;
            let outputs = session.run(ort::inputs![input_tensor])?;
            let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;
            let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
            (dims, data.to_vec())
        };

        // [1, 4 + nc, anchors]
        if dims.len() != 3 || dims[0] != 1 {
            bail!("Unexpected model output shape {:?}", dims);
        }

        Ok(decode_predictions(
            &data,
            dims[1],
            dims[2],
            ratio,
            image.dimensions(),
            &self.params,
        ))
    }

    fn class_names(&self) -> &[String] {
        &self.names
    }
}
