use thiserror::Error;

/// Errores del núcleo de detección. Cada variante identifica la etapa que
/// falló y el frame implicado, para que la capa de servicio pueda registrar
/// el fallo con contexto suficiente.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("fallo de adquisición: {0}")]
    Acquisition(String),
    #[error("imagen ilegible (frame {image_id}): {reason}")]
    ImageUnreadable { image_id: i64, reason: String },
    #[error("salida del modelo no normalizable (frame {image_id}): {reason}")]
    Adaptation { image_id: i64, reason: String },
    #[error("métrica no disponible (frame {image_id}, detección {index}): {reason}")]
    Metrics {
        image_id: i64,
        index: usize,
        reason: String,
    },
    #[error("no se pudo liberar el frame {image_id}: {reason}")]
    Release { image_id: i64, reason: String },
    #[error("modelo desconocido: {0}")]
    UnknownModel(String),
}

pub type DomainResult<T> = Result<T, DetectError>;
