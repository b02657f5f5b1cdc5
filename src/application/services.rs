use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::{
    adapter::DetectionAdapter,
    buffer::BufferLifecycle,
    enrich::MetricsEnricher,
    model_handle::ModelHandle,
    ports::{FrameBufferPort, MetricsPort, SnapshotPort},
};
use crate::domain::{
    detection::DetectResponse,
    errors::{DetectError, DomainResult},
    frame::{color_frame_path, FrameHeader, FrameLease},
    model::ClassFilter,
};

/// Orquestador de detección: decide si hay que capturar un frame nuevo,
/// ejecuta la inferencia a través del handle recibido, normaliza la salida,
/// enriquece cada detección con su métrica de distancia y libera el buffer
/// cuando el frame lo capturó esta misma petición.
pub struct DetectionService {
    snapshot: Arc<dyn SnapshotPort>,
    enricher: MetricsEnricher,
    buffer: BufferLifecycle,
    frames_dir: PathBuf,
}

impl DetectionService {
    pub fn new(
        snapshot: Arc<dyn SnapshotPort>,
        metrics: Arc<dyn MetricsPort>,
        frames: Arc<dyn FrameBufferPort>,
        frames_dir: PathBuf,
    ) -> Self {
        Self {
            snapshot,
            enricher: MetricsEnricher::new(metrics),
            buffer: BufferLifecycle::new(frames),
            frames_dir,
        }
    }

    /// Caso de uso único del nodo: `imageID == 0` significa "captura un
    /// frame nuevo"; cualquier otro valor, negativos incluidos, referencia
    /// un frame ya existente cuyo ciclo de vida no nos pertenece.
    pub async fn detect(
        &self,
        model: &ModelHandle,
        image_id: i64,
        filter: &ClassFilter,
    ) -> DomainResult<DetectResponse> {
        // 1. Decisión de adquisición. La propiedad del buffer se fija aquí,
        //    una sola vez, y viaja como estado explícito del lease.
        let (mut lease, header) = if image_id == 0 {
            let snap = self
                .snapshot
                .capture(true)
                .await
                .map_err(|e| DetectError::Acquisition(e.to_string()))?;
            info!(image_id = snap.image_id, "frame capturado para la petición");
            (FrameLease::owned(snap.image_id), snap.header)
        } else {
            (FrameLease::external(image_id), FrameHeader::default())
        };
        let image_id = lease.image_id();
        let image_path = color_frame_path(&self.frames_dir, image_id);

        // 2. Inferencia dentro de la sección crítica del handle.
        let raw = match model.detect(&image_path, filter).await {
            Ok(raw) => raw,
            Err(e) => {
                self.buffer.abandon(&mut lease);
                return Err(DetectError::ImageUnreadable {
                    image_id,
                    reason: e.to_string(),
                });
            }
        };

        // 3. Normalización a la secuencia canónica.
        let adapter = match DetectionAdapter::normalize(raw) {
            Ok(adapter) => adapter,
            Err(reason) => {
                self.buffer.abandon(&mut lease);
                return Err(DetectError::Adaptation { image_id, reason });
            }
        };
        info!(
            model = model.name(),
            image_id,
            detections = adapter.len(),
            "inferencia normalizada"
        );

        // 4. Enriquecimiento en orden. Un fallo aborta la petición entera y
        //    el frame propio queda fugado a propósito: la profundidad del
        //    frame transitorio aún no se ha leído completa y no sabemos en
        //    qué estado quedó el colaborador.
        let detections = match self.enricher.enrich(image_id, adapter.into_detections()).await {
            Ok(detections) => detections,
            Err(err) => {
                self.buffer.abandon(&mut lease);
                return Err(err);
            }
        };

        // 5. Liberación solo después de enriquecer todas las detecciones.
        let release_warning = match self.buffer.settle(&mut lease).await {
            Ok(()) => None,
            Err(err) => {
                warn!(%err, "la respuesta ya estaba calculada y se devuelve igualmente");
                Some(err.to_string())
            }
        };

        Ok(DetectResponse {
            header,
            detections,
            release_warning,
        })
    }
}
