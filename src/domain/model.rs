use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,      // nombre lógico, p. ej. "objects"
    pub onnx_path: String, // ruta en disco del .onnx
}

/// Familia del modelo: determina la forma de la salida cruda que el motor
/// entrega al adaptador de detecciones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Yolo,
    Detr,
}

impl ModelFamily {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yolo" => Some(Self::Yolo),
            "detr" | "rtdetr" => Some(Self::Detr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorParams {
    pub input_size: u32,       // 640 típico
    pub conf_threshold: f32,   // 0..1
    pub max_detections: usize, // p. ej. 100
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            conf_threshold: 0.25,
            max_detections: 100,
        }
    }
}

/// Filtro de clases que acompaña a cada inferencia. Nunca es estado
/// ambiente: el valor viaja con la llamada y se aplica dentro de la sección
/// crítica del handle. Un filtro vacío significa "todas las clases" y
/// sustituye cualquier restricción anterior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassFilter(Option<BTreeSet<i64>>);

impl ClassFilter {
    pub fn all() -> Self {
        Self(None)
    }

    pub fn only<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        let set: BTreeSet<i64> = ids.into_iter().collect();
        if set.is_empty() {
            Self(None)
        } else {
            Self(Some(set))
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_none()
    }

    pub fn allows(&self, class_id: i64) -> bool {
        match &self.0 {
            None => true,
            Some(set) => set.contains(&class_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtro_vacio_no_restringe() {
        let f = ClassFilter::only(std::iter::empty());
        assert!(f.is_unrestricted());
        assert!(f.allows(39));
    }

    #[test]
    fn filtro_restringe_a_las_clases_dadas() {
        let f = ClassFilter::only([39, 41]);
        assert!(f.allows(39));
        assert!(f.allows(41));
        assert!(!f.allows(0));
    }
}
