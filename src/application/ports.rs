use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::domain::{
    detection::{MetricResult, RegionOfInterest},
    frame::FrameHeader,
    model::ClassFilter,
    raw::RawOutput,
};

/// Instantánea devuelta por el servicio de adquisición.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub image_id: i64,
    pub header: FrameHeader,
}

#[async_trait]
pub trait SnapshotPort: Send + Sync {
    /// Captura un frame nuevo. Con `add_buffer` el nodo de cámara retiene el
    /// frame en el buffer compartido hasta que alguien lo libere.
    async fn capture(&self, add_buffer: bool) -> Result<Snapshot>;
}

#[async_trait]
pub trait MetricsPort: Send + Sync {
    /// Medición de distancia para una ROI de un frame concreto.
    async fn measure(&self, image_id: i64, roi: &RegionOfInterest) -> Result<MetricResult>;
}

#[async_trait]
pub trait FrameBufferPort: Send + Sync {
    /// Señala al nodo de cámara que el frame transitorio puede descartarse.
    /// Cualquier error se propaga, nunca se silencia.
    async fn release(&self, image_id: i64) -> Result<()>;
}

/// Motor de inferencia síncrono de una familia de modelos. Recibe `&mut self`
/// porque aplicar el filtro de clases puede reconfigurar el propio motor; el
/// `ModelHandle` garantiza exclusión mutua sobre la secuencia completa
/// configurar+inferir.
pub trait InferenceEngine: Send {
    fn family(&self) -> &'static str;

    fn infer(&mut self, image_path: &Path, filter: &ClassFilter) -> Result<RawOutput>;
}
