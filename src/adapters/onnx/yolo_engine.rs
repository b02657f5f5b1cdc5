use anyhow::Result;
use image::imageops::FilterType;
use ndarray::{s, Array4, ArrayViewD, Axis, IxDyn};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;

use crate::adapters::onnx::{build_session, load_rgb};
use crate::application::ports::InferenceEngine;
use crate::domain::model::{ClassFilter, DetectorParams};
use crate::domain::raw::RawOutput;

/// Motor de la familia YOLO: salida `[1, 4+nc, N]` que se decodifica a filas
/// `[xmin, ymin, xmax, ymax, confianza, clase]` en píxeles de la imagen
/// original. El filtro de clases se aplica aquí, dentro de la sección
/// crítica del handle.
pub struct OnnxYoloEngine {
    session: Session,
    params: DetectorParams,
    class_names: Vec<String>,
}

impl OnnxYoloEngine {
    pub fn load(path: &str, params: DetectorParams, class_names: Vec<String>) -> Result<Self> {
        let session = build_session(path)?;
        Ok(Self {
            session,
            params,
            class_names,
        })
    }
}

impl InferenceEngine for OnnxYoloEngine {
    fn family(&self) -> &'static str {
        "yolo"
    }

    fn infer(&mut self, image_path: &Path, filter: &ClassFilter) -> Result<RawOutput> {
        let rgb = load_rgb(image_path)?;

        let imgsz = self.params.input_size as usize;
        let resized =
            image::imageops::resize(&rgb, imgsz as u32, imgsz as u32, FilterType::Nearest);

        let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
        for (x, y, pixel) in resized.enumerate_pixels() {
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }

        let input_shape = vec![1, 3, imgsz as i64, imgsz as i64];
        let input_tensor = Value::from_array((input_shape, input.into_raw_vec()))?;

        let outputs = self.session.run(ort::inputs![input_tensor])?;
        let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape_out.into_iter().map(|&x| x as usize).collect();
        let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
        let view = array_view.index_axis(Axis(0), 0);

        let num_candidates = view.shape()[1];
        let sx = rgb.width() as f32 / imgsz as f32;
        let sy = rgb.height() as f32 / imgsz as f32;

        let mut rows: Vec<[f32; 6]> = Vec::new();

        for i in 0..num_candidates {
            let scores = view.slice(s![4.., i]);
            let Some((class_id, &max_score)) =
                scores.indexed_iter().max_by(|(_, a), (_, b)| a.total_cmp(b))
            else {
                continue;
            };

            if max_score <= self.params.conf_threshold || !filter.allows(class_id as i64) {
                continue;
            }

            let cx = view[[0, i]];
            let cy = view[[1, i]];
            let w = view[[2, i]];
            let h = view[[3, i]];

            rows.push([
                ((cx - w / 2.0) * sx).max(0.0),
                ((cy - h / 2.0) * sy).max(0.0),
                ((cx + w / 2.0) * sx).max(0.0),
                ((cy + h / 2.0) * sy).max(0.0),
                max_score,
                class_id as f32,
            ]);
        }

        rows.sort_unstable_by(|a, b| b[4].total_cmp(&a[4]));
        rows.truncate(self.params.max_detections);

        Ok(RawOutput::Rows {
            rows,
            class_names: self.class_names.clone(),
        })
    }
}
