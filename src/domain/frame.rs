// src/domain/frame.rs
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cabecera del frame tal y como la publica el nodo de cámara al capturar.
/// Para frames aportados por el cliente no hay captura y la cabecera queda
/// vacía.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    #[serde(default)]
    pub stamp_ns: u64,
    #[serde(default)]
    pub frame_id: String,
}

/// Convención de nombres compartida con el nodo de cámara: el frame de color
/// `N` vive en `<frames_dir>/color_N.jpg`.
pub fn color_frame_path(frames_dir: &Path, image_id: i64) -> PathBuf {
    frames_dir.join(format!("color_{image_id}.jpg"))
}

/// Quién es responsable de la entrada del buffer durante esta petición.
/// Se decide una sola vez al inicio (centinela `imageID == 0`) y a partir
/// de ahí se consulta el enum, nunca se re-deriva del valor numérico.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// El frame ya existía; su ciclo de vida pertenece a otro.
    External,
    /// La petición capturó el frame y debe liberarlo al terminar.
    Owned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseState {
    Held,
    Released,
    Leaked,
}

/// Estado del buffer para una petición. Transiciones válidas:
/// `Held -> Released` (enriquecimiento completo y liberación correcta) o
/// `Held -> Leaked` (la petición abortó o la liberación falló). Ambos
/// estados finales son terminales.
#[derive(Debug)]
pub struct FrameLease {
    image_id: i64,
    ownership: Ownership,
    state: LeaseState,
}

impl FrameLease {
    pub fn external(image_id: i64) -> Self {
        Self {
            image_id,
            ownership: Ownership::External,
            state: LeaseState::Held,
        }
    }

    pub fn owned(image_id: i64) -> Self {
        Self {
            image_id,
            ownership: Ownership::Owned,
            state: LeaseState::Held,
        }
    }

    pub fn image_id(&self) -> i64 {
        self.image_id
    }

    pub fn state(&self) -> LeaseState {
        self.state
    }

    /// Solo un lease propio y todavía en vuelo debe disparar la liberación.
    pub fn owns_buffer(&self) -> bool {
        self.ownership == Ownership::Owned && self.state == LeaseState::Held
    }

    pub fn mark_released(&mut self) {
        if self.owns_buffer() {
            self.state = LeaseState::Released;
        }
    }

    pub fn mark_leaked(&mut self) {
        if self.owns_buffer() {
            self.state = LeaseState::Leaked;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn convencion_de_ruta_del_frame() {
        let p = color_frame_path(Path::new("/tmp/rs_d435_images"), 1707574283);
        assert_eq!(p, Path::new("/tmp/rs_d435_images/color_1707574283.jpg"));
        // los identificadores negativos son literales, no centinelas
        let n = color_frame_path(Path::new("/tmp/rs_d435_images"), -3);
        assert_eq!(n, Path::new("/tmp/rs_d435_images/color_-3.jpg"));
    }

    #[test]
    fn lease_externo_nunca_posee_el_buffer() {
        let mut lease = FrameLease::external(42);
        assert!(!lease.owns_buffer());
        lease.mark_released();
        assert_eq!(lease.state(), LeaseState::Held);
    }

    #[test]
    fn lease_propio_transiciona_una_sola_vez() {
        let mut lease = FrameLease::owned(7);
        assert!(lease.owns_buffer());
        lease.mark_released();
        assert_eq!(lease.state(), LeaseState::Released);
        // los estados finales son terminales
        lease.mark_leaked();
        assert_eq!(lease.state(), LeaseState::Released);
    }

    #[test]
    fn lease_propio_puede_quedar_fugado() {
        let mut lease = FrameLease::owned(7);
        lease.mark_leaked();
        assert_eq!(lease.state(), LeaseState::Leaked);
        lease.mark_released();
        assert_eq!(lease.state(), LeaseState::Leaked);
    }
}
