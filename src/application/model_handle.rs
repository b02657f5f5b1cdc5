use anyhow::Result;
use std::fmt;
use std::path::Path;
use tokio::sync::Mutex;

use crate::application::ports::InferenceEngine;
use crate::domain::{model::ClassFilter, raw::RawOutput};

/// Handle compartido sobre un motor de inferencia. La secuencia
/// configurar+inferir es una sección crítica por handle: dos peticiones
/// concurrentes sobre el mismo modelo se serializan aquí, mientras que
/// peticiones sobre modelos distintos avanzan en paralelo.
pub struct ModelHandle {
    name: String,
    engine: Mutex<Box<dyn InferenceEngine>>,
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ModelHandle {
    pub fn new(name: impl Into<String>, engine: Box<dyn InferenceEngine>) -> Self {
        Self {
            name: name.into(),
            engine: Mutex::new(engine),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn detect(&self, image_path: &Path, filter: &ClassFilter) -> Result<RawOutput> {
        let mut engine = self.engine.lock().await;
        engine.infer(image_path, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct SlowEngine {
        in_flight: Arc<AtomicUsize>,
        overlap_seen: Arc<AtomicUsize>,
    }

    impl InferenceEngine for SlowEngine {
        fn family(&self) -> &'static str {
            "lento"
        }

        fn infer(&mut self, _image_path: &Path, _filter: &ClassFilter) -> Result<RawOutput> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            if now > 1 {
                self.overlap_seen.fetch_add(1, Ordering::SeqCst);
            }
            std::thread::sleep(std::time::Duration::from_millis(25));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(RawOutput::Rows {
                rows: vec![],
                class_names: vec![],
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn inferencias_sobre_el_mismo_handle_se_serializan() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let overlap = Arc::new(AtomicUsize::new(0));
        let handle = Arc::new(ModelHandle::new(
            "objects",
            Box::new(SlowEngine {
                in_flight: in_flight.clone(),
                overlap_seen: overlap.clone(),
            }),
        ));

        let mut tasks = Vec::new();
        for _ in 0..4 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle
                    .detect(Path::new("/tmp/color_1.jpg"), &ClassFilter::all())
                    .await
                    .unwrap();
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        assert_eq!(overlap.load(Ordering::SeqCst), 0);
    }
}
