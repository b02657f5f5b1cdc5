use std::sync::Arc;
use tracing::warn;

use crate::application::ports::FrameBufferPort;
use crate::domain::{
    errors::{DetectError, DomainResult},
    frame::FrameLease,
};

/// Gestor del ciclo de vida del buffer: libera como mucho una vez por
/// petición, y solo los frames que la propia petición capturó. Los frames
/// aportados por el cliente nunca se tocan.
pub struct BufferLifecycle {
    frames: Arc<dyn FrameBufferPort>,
}

impl BufferLifecycle {
    pub fn new(frames: Arc<dyn FrameBufferPort>) -> Self {
        Self { frames }
    }

    /// Liberación tras completar el enriquecimiento. Si el colaborador falla
    /// el lease queda fugado y el error se devuelve para que el orquestador
    /// lo degrade a aviso: la respuesta ya está calculada y sigue valiendo.
    pub async fn settle(&self, lease: &mut FrameLease) -> DomainResult<()> {
        if !lease.owns_buffer() {
            return Ok(());
        }
        match self.frames.release(lease.image_id()).await {
            Ok(()) => {
                lease.mark_released();
                Ok(())
            }
            Err(e) => {
                lease.mark_leaked();
                Err(DetectError::Release {
                    image_id: lease.image_id(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Abandono explícito: la petición falló antes de llegar a liberar. No se
    /// intenta ninguna limpieza adicional; solo queda constancia de la fuga
    /// para que el operador decida.
    pub fn abandon(&self, lease: &mut FrameLease) {
        if lease.owns_buffer() {
            lease.mark_leaked();
            warn!(
                image_id = lease.image_id(),
                "frame capturado queda sin liberar tras un fallo"
            );
        }
    }
}
