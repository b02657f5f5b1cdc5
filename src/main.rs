mod adapters;
mod application;
mod domain;

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::{
    camera::CameraRpc,
    http::{router, state::HttpState},
    onnx::{
        labels,
        model_catalog::{ModelCatalog, ModelSpec},
    },
};
use crate::application::services::DetectionService;
use crate::domain::model::{DetectorParams, ModelFamily, ModelId};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn model_spec(name: &str, path_var: &str, family_var: &str, default_path: &str, class_names: Vec<String>) -> anyhow::Result<ModelSpec> {
    let onnx_path = env_or(path_var, default_path);
    let family_raw = env_or(family_var, "yolo");
    let family = ModelFamily::parse(&family_raw)
        .ok_or_else(|| anyhow::anyhow!("familia desconocida '{family_raw}' en {family_var}"))?;
    Ok(ModelSpec {
        id: ModelId {
            name: name.to_string(),
            onnx_path,
        },
        family,
        params: DetectorParams::default(),
        class_names,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Inicializar logs (RUST_LOG=info por defecto)
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("🔧 Inicializando adaptadores del nodo de detección...");

    // 2. Cliente RPC del nodo de cámara (adquisición, métricas y buffer)
    let camera_api = env_or("CAMERA_API", "http://127.0.0.1:8080");
    let camera = Arc::new(CameraRpc::new(&camera_api));
    if !camera.wait_ready(30).await {
        tracing::warn!("el nodo de cámara no respondió; se arranca igualmente");
    }

    // 3. Catálogo de modelos: objetos genéricos + residuos
    let catalog = Arc::new(ModelCatalog::load(
        vec![
            model_spec(
                "objects",
                "OBJECTS_MODEL",
                "OBJECTS_FAMILY",
                "models/yolo11n.onnx",
                labels::to_vec(&labels::COCO),
            )?,
            model_spec(
                "trash",
                "TRASH_MODEL",
                "TRASH_FAMILY",
                "models/trashnet.onnx",
                labels::to_vec(&labels::TRASH),
            )?,
        ],
        "objects",
    )?);

    // 4. Caso de uso de detección
    let frames_dir = PathBuf::from(env_or("FRAMES_DIR", "/tmp/rs_d435_images"));
    let service = Arc::new(DetectionService::new(
        camera.clone(),
        camera.clone(),
        camera.clone(),
        frames_dir,
    ));

    // 5. Estado y router de Axum
    let state = HttpState {
        detect: service,
        catalog,
    };
    let app = router(state);

    // 6. Lanzar el servidor
    let port: u16 = env_or("DETECT_PORT", "8090").parse().unwrap_or(8090);
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("🚀 Nodo de detección escuchando en http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
