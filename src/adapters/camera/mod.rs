use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::ports::{FrameBufferPort, MetricsPort, Snapshot, SnapshotPort};
use crate::domain::detection::{MetricResult, RegionOfInterest};
use crate::domain::frame::FrameHeader;

/// Cliente HTTP del nodo de cámara: adquisición de instantáneas, métricas de
/// profundidad por ROI y liberación de entradas del buffer compartido.
pub struct CameraRpc {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SnapshotReply {
    image_id: i64,
    #[serde(default)]
    header: FrameHeader,
}

#[derive(Debug, Deserialize)]
struct MetricsReply {
    metrics: serde_json::Value,
}

impl CameraRpc {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Espera a que el nodo de cámara responda antes de aceptar peticiones.
    /// Devuelve `false` si se agotan los intentos; el nodo arranca igual y
    /// las peticiones fallarán como errores de adquisición.
    pub async fn wait_ready(&self, attempts: u32) -> bool {
        let url = format!("{}/api/health", self.base_url);
        for attempt in 1..=attempts {
            match self.http.get(&url).send().await {
                Ok(res) if res.status().is_success() => {
                    info!("✅ Nodo de cámara disponible en {}", self.base_url);
                    return true;
                }
                _ => {
                    warn!(
                        attempt,
                        attempts, "esperando al nodo de cámara en {}", self.base_url
                    );
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
        false
    }
}

#[async_trait]
impl SnapshotPort for CameraRpc {
    async fn capture(&self, add_buffer: bool) -> Result<Snapshot> {
        let url = format!("{}/api/take_snapshot", self.base_url);
        let reply: SnapshotReply = self
            .http
            .post(&url)
            .json(&json!({ "add_buffer": add_buffer }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if reply.image_id == 0 {
            // el 0 está reservado como centinela de captura; un frame real
            // nunca puede llamarse así
            return Err(anyhow!("el nodo de cámara devolvió image_id 0"));
        }
        Ok(Snapshot {
            image_id: reply.image_id,
            header: reply.header,
        })
    }
}

#[async_trait]
impl MetricsPort for CameraRpc {
    async fn measure(&self, image_id: i64, roi: &RegionOfInterest) -> Result<MetricResult> {
        let url = format!("{}/api/frames/metrics", self.base_url);
        let reply: MetricsReply = self
            .http
            .post(&url)
            .json(&json!({ "image_id": image_id, "roi": roi }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(MetricResult(reply.metrics))
    }
}

#[async_trait]
impl FrameBufferPort for CameraRpc {
    async fn release(&self, image_id: i64) -> Result<()> {
        let url = format!("{}/api/frames/clear", self.base_url);
        self.http
            .post(&url)
            .json(&json!({ "image_id": image_id }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
