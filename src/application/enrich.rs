use std::sync::Arc;

use crate::application::ports::MetricsPort;
use crate::domain::{
    detection::{CanonicalDetection, EnrichedDetection},
    errors::{DetectError, DomainResult},
};

/// Enriquecedor de métricas: para cada detección deriva su ROI y pide la
/// medición al colaborador de métricas, manteniendo la correspondencia 1:1
/// con la detección de origen. El resultado se escribe posicionalmente, de
/// forma que la métrica `i` siempre acompaña a la detección `i`.
pub struct MetricsEnricher {
    metrics: Arc<dyn MetricsPort>,
}

impl MetricsEnricher {
    pub fn new(metrics: Arc<dyn MetricsPort>) -> Self {
        Self { metrics }
    }

    /// El fallo de una sola métrica aborta la petición completa: nunca se
    /// devuelve una respuesta con métricas parciales o de relleno.
    pub async fn enrich(
        &self,
        image_id: i64,
        detections: Vec<CanonicalDetection>,
    ) -> DomainResult<Vec<EnrichedDetection>> {
        let mut enriched = Vec::with_capacity(detections.len());
        for (index, detection) in detections.into_iter().enumerate() {
            let roi = detection.roi();
            let metric = self
                .metrics
                .measure(image_id, &roi)
                .await
                .map_err(|e| DetectError::Metrics {
                    image_id,
                    index,
                    reason: e.to_string(),
                })?;
            enriched.push(EnrichedDetection {
                detection,
                roi,
                metric,
            });
        }
        Ok(enriched)
    }
}
