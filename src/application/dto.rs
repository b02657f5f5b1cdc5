use serde::{Deserialize, Serialize};

use crate::domain::model::ClassFilter;

/// Petición de detección tal y como la expone la capa HTTP. `image_id == 0`
/// (o ausente) pide capturar un frame nuevo; `classes` vacío no restringe.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub image_id: i64,
    pub model: Option<String>,
    #[serde(default)]
    pub classes: Vec<i64>,
}

impl DetectRequest {
    pub fn class_filter(&self) -> ClassFilter {
        ClassFilter::only(self.classes.iter().copied())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub default: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_id_ausente_significa_capturar() {
        let req: DetectRequest = serde_json::from_str(r#"{ "model": "trash" }"#).unwrap();
        assert_eq!(req.image_id, 0);
        assert!(req.class_filter().is_unrestricted());
    }

    #[test]
    fn clases_explicitas_restringen_el_filtro() {
        let req: DetectRequest =
            serde_json::from_str(r#"{ "image_id": 42, "classes": [39] }"#).unwrap();
        assert_eq!(req.image_id, 42);
        assert!(req.class_filter().allows(39));
        assert!(!req.class_filter().allows(0));
    }
}
