use anyhow::Result;
use image::imageops::FilterType;
use ndarray::{s, Array4, ArrayViewD, Axis, IxDyn};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;

use crate::adapters::onnx::{build_session, load_rgb};
use crate::application::ports::InferenceEngine;
use crate::domain::model::{ClassFilter, DetectorParams};
use crate::domain::raw::{DetectionTable, RawOutput};

/// Motor de la familia DETR: consultas de transformer, sin NMS. La salida
/// `[1, N, 4+nc]` trae cajas `cxcywh` normalizadas a 0..1 y se publica como
/// tabla de columnas paralelas, en el orden de las consultas.
pub struct OnnxDetrEngine {
    session: Session,
    params: DetectorParams,
    class_names: Vec<String>,
}

impl OnnxDetrEngine {
    pub fn load(path: &str, params: DetectorParams, class_names: Vec<String>) -> Result<Self> {
        let session = build_session(path)?;
        Ok(Self {
            session,
            params,
            class_names,
        })
    }
}

impl InferenceEngine for OnnxDetrEngine {
    fn family(&self) -> &'static str {
        "detr"
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

        let num_queries = view.shape()[0];
        let img_w = rgb.width() as f32;
        let img_h = rgb.height() as f32;

        let mut table = DetectionTable::default();

        for i in 0..num_queries {
            if table.len() >= self.params.max_detections {
                break;
            }
            let scores = view.slice(s![i, 4..]);
            let Some((class_id, &max_score)) =
                scores.indexed_iter().max_by(|(_, a), (_, b)| a.total_cmp(b))
            else {
                continue;
            };

            if max_score <= self.params.conf_threshold || !filter.allows(class_id as i64) {
                continue;
            }

            let cx = view[[i, 0]] * img_w;
            let cy = view[[i, 1]] * img_h;
            let w = view[[i, 2]] * img_w;
            let h = view[[i, 3]] * img_h;

            table.xmin.push((cx - w / 2.0).max(0.0));
            table.ymin.push((cy - h / 2.0).max(0.0));
            table.xmax.push((cx + w / 2.0).max(0.0));
            table.ymax.push((cy + h / 2.0).max(0.0));
            table.confidence.push(max_score);
            table.class_id.push(class_id as i64);
            table.class_name.push(
                self.class_names
                    .get(class_id)
                    .cloned()
                    .unwrap_or_else(|| format!("clase_{class_id}")),
            );
        }

        Ok(RawOutput::Table(table))
    }
}
