pub mod detr_engine;
pub mod labels;
pub mod model_catalog;
pub mod yolo_engine;

use anyhow::{Context, Result};
use image::RgbImage;
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use std::fs;
use std::path::Path;

/// Construcción de sesión común a todas las familias.
pub(crate) fn build_session(path: &str) -> Result<Session> {
    let mut builder = Session::builder()?.with_intra_threads(4)?;

    // CUDA es opcional: si está disponible se registra, si no seguimos en CPU.
    let cuda = CUDAExecutionProvider::default().build();
    if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda]) {
        builder = builder_with_cuda;
    }

    // Con `ort` sin default-features, usamos commit_from_memory.
    let model_bytes =
        fs::read(path).with_context(|| format!("no se pudo leer el modelo {path}"))?;
    let session = builder.commit_from_memory(&model_bytes)?;
    Ok(session)
}

/// Carga el frame desde la ruta compartida. Este es el punto donde un
/// identificador que no corresponde a ningún frame se convierte en error.
pub(crate) fn load_rgb(image_path: &Path) -> Result<RgbImage> {
    let img = image::open(image_path)
        .with_context(|| format!("no se pudo leer la imagen {}", image_path.display()))?;
    Ok(img.to_rgb8())
}
