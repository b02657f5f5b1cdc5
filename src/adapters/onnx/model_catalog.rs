use anyhow::{bail, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::adapters::onnx::{detr_engine::OnnxDetrEngine, yolo_engine::OnnxYoloEngine};
use crate::application::{model_handle::ModelHandle, ports::InferenceEngine};
use crate::domain::errors::{DetectError, DomainResult};
use crate::domain::model::{DetectorParams, ModelFamily, ModelId};

/// Especificación de un modelo configurado al arrancar.
pub struct ModelSpec {
    pub id: ModelId,
    pub family: ModelFamily,
    pub params: DetectorParams,
    pub class_names: Vec<String>,
}

/// Catálogo de modelos cargados. Cada entrada es un handle con su propia
/// sección crítica, de modo que peticiones a modelos distintos avanzan en
/// paralelo.
#[derive(Debug)]
pub struct ModelCatalog {
    models: HashMap<String, Arc<ModelHandle>>,
    default_model: String,
}

impl ModelCatalog {
    pub fn load(specs: Vec<ModelSpec>, default_model: &str) -> Result<Self> {
        let mut models = HashMap::new();
        for spec in specs {
            Self::validate(&spec.id)?;
            let engine: Box<dyn InferenceEngine> = match spec.family {
                ModelFamily::Yolo => Box::new(OnnxYoloEngine::load(
                    &spec.id.onnx_path,
                    spec.params,
                    spec.class_names,
                )?),
                ModelFamily::Detr => Box::new(OnnxDetrEngine::load(
                    &spec.id.onnx_path,
                    spec.params,
                    spec.class_names,
                )?),
            };
            info!(model = %spec.id.name, family = engine.family(), "modelo cargado");
            models.insert(
                spec.id.name.clone(),
                Arc::new(ModelHandle::new(spec.id.name, engine)),
            );
        }
        if !models.contains_key(default_model) {
            bail!("el modelo por defecto '{default_model}' no está configurado");
        }
        Ok(Self {
            models,
            default_model: default_model.to_string(),
        })
    }

    /// Los pesos son de aprovisionamiento previo: un fichero ausente es un
    /// error de arranque, nunca una descarga.
    fn validate(id: &ModelId) -> Result<()> {
        if id.onnx_path.trim().is_empty() {
            bail!("modelo '{}': onnx_path vacío", id.name);
        }
        if !Path::new(&id.onnx_path).exists() {
            bail!(
                "modelo '{}': no existe el fichero {}",
                id.name,
                id.onnx_path
            );
        }
        Ok(())
    }

    /// Resuelve el selector de modelo de la petición; sin selector se usa el
    /// modelo por defecto.
    pub fn get(&self, name: Option<&str>) -> DomainResult<Arc<ModelHandle>> {
        let name = name.unwrap_or(&self.default_model);
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| DetectError::UnknownModel(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn default_name(&self) -> &str {
        &self.default_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ClassFilter;
    use crate::domain::raw::RawOutput;

    fn spec(name: &str, path: &str) -> ModelSpec {
        ModelSpec {
            id: ModelId {
                name: name.into(),
                onnx_path: path.into(),
            },
            family: ModelFamily::Yolo,
            params: DetectorParams::default(),
            class_names: vec![],
        }
    }

    #[test]
    fn ruta_vacia_falla_al_cargar() {
        let err = ModelCatalog::load(vec![spec("objects", "  ")], "objects").unwrap_err();
        assert!(err.to_string().contains("vacío"), "{err}");
    }

    #[test]
    fn fichero_inexistente_falla_al_cargar() {
        let err = ModelCatalog::load(
            vec![spec("objects", "/no/existe/yolo11n.onnx")],
            "objects",
        )
        .unwrap_err();
        assert!(err.to_string().contains("no existe"), "{err}");
    }

    struct NullEngine;

    impl InferenceEngine for NullEngine {
        fn family(&self) -> &'static str {
            "null"
        }

        fn infer(
            &mut self,
            _image_path: &std::path::Path,
            _filter: &ClassFilter,
        ) -> Result<RawOutput> {
            Ok(RawOutput::Rows {
                rows: vec![],
                class_names: vec![],
            })
        }
    }

    fn catalogo_de_prueba() -> ModelCatalog {
        let mut models = HashMap::new();
        models.insert(
            "objects".to_string(),
            Arc::new(ModelHandle::new("objects", Box::new(NullEngine))),
        );
        ModelCatalog {
            models,
            default_model: "objects".to_string(),
        }
    }

    #[test]
    fn sin_selector_resuelve_el_modelo_por_defecto() {
        let catalog = catalogo_de_prueba();
        assert_eq!(catalog.get(None).unwrap().name(), "objects");
    }

    #[test]
    fn selector_desconocido_es_error_de_dominio() {
        let catalog = catalogo_de_prueba();
        let err = catalog.get(Some("caras")).unwrap_err();
        assert!(matches!(err, DetectError::UnknownModel(n) if n == "caras"));
    }
}
