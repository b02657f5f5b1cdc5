use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::adapters::http::state::HttpState;
use crate::application::dto::{DetectRequest, ModelsResponse};
use crate::domain::errors::DetectError;

pub async fn detect(State(st): State<HttpState>, Json(req): Json<DetectRequest>) -> impl IntoResponse {
    let model = match st.catalog.get(req.model.as_deref()) {
        Ok(model) => model,
        Err(e) => {
            return (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() })))
                .into_response()
        }
    };

    let filter = req.class_filter();
    match st.detect.detect(&model, req.image_id, &filter).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => (status_for(&e), Json(json!({ "error": e.to_string() }))).into_response(),
    }
}

pub async fn list_models(State(st): State<HttpState>) -> impl IntoResponse {
    Json(ModelsResponse {
        models: st.catalog.names(),
        default: st.catalog.default_name().to_string(),
    })
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// El código HTTP distingue fallos de esta petición (entrada/imagen) de
/// fallos de los colaboradores externos.
fn status_for(err: &DetectError) -> StatusCode {
    match err {
        DetectError::UnknownModel(_) => StatusCode::NOT_FOUND,
        DetectError::ImageUnreadable { .. } | DetectError::Adaptation { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DetectError::Acquisition(_)
        | DetectError::Metrics { .. }
        | DetectError::Release { .. } => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codigos_http_por_etapa() {
        assert_eq!(
            status_for(&DetectError::UnknownModel("caras".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DetectError::ImageUnreadable {
                image_id: 7,
                reason: "no existe".into()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&DetectError::Acquisition("sin cámara".into())),
            StatusCode::BAD_GATEWAY
        );
    }
}
