use std::sync::Arc;

use crate::adapters::onnx::model_catalog::ModelCatalog;
use crate::application::services::DetectionService;

/// Estado compartido para los manejadores HTTP de Axum. Siguiendo la
/// arquitectura hexagonal, el estado contiene el caso de uso y el catálogo
/// de modelos; la capa HTTP solo traduce DTOs.
#[derive(Clone)]
pub struct HttpState {
    pub detect: Arc<DetectionService>,
    pub catalog: Arc<ModelCatalog>,
}
