use serde::{Deserialize, Serialize};

use crate::domain::frame::FrameHeader;

/// Caja delimitadora en píxeles de la imagen original.
/// Invariante: `xmax >= xmin` y `ymax >= ymin` (lo garantiza el adaptador).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        (self.xmax - self.xmin).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.ymax - self.ymin).max(0) as u32
    }
}

/// Detección canónica, independiente de la familia de modelo que la produjo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDetection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_id: i64,
    pub class_name: String,
}

impl CanonicalDetection {
    /// Región de interés derivada de la caja: el offset es la esquina
    /// superior izquierda y el tamaño es `xmax-xmin` × `ymax-ymin`.
    pub fn roi(&self) -> RegionOfInterest {
        RegionOfInterest {
            x_offset: self.bbox.xmin.max(0) as u32,
            y_offset: self.bbox.ymin.max(0) as u32,
            width: self.bbox.width(),
            height: self.bbox.height(),
            do_rectify: true,
        }
    }
}

/// Rectángulo en píxeles con el que se pide una medición de profundidad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub x_offset: u32,
    pub y_offset: u32,
    pub width: u32,
    pub height: u32,
    pub do_rectify: bool,
}

/// Carga opaca devuelta por el servicio de métricas para una ROI. El núcleo
/// no interpreta su contenido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricResult(pub serde_json::Value);

/// Tripleta posicional: la métrica `i` corresponde siempre a la detección `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDetection {
    pub detection: CanonicalDetection,
    pub roi: RegionOfInterest,
    pub metric: MetricResult,
}

/// Respuesta completa de una petición de detección.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub header: FrameHeader,
    pub detections: Vec<EnrichedDetection>,
    /// La liberación del buffer falló tras calcular la respuesta. La
    /// respuesta sigue siendo válida; el frame queda huérfano en el nodo
    /// de cámara.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_warning: Option<String>,
}
