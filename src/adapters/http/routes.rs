use axum::{extract::{Query, State}, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use crate::adapters::frame::surface::StillFrameSurface;
use crate::adapters::http::state::HttpState;
use crate::application::dto::{HitQuery, LoadVideoRequest, OverlayQuery, PauseRequest, PauseResponse};
use crate::domain::errors::DomainError;

fn error_response(e: DomainError) -> Response {
    let status = match &e {
        DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Upstream(_) | DomainError::Unauthorized(_) => StatusCode::BAD_GATEWAY,
        DomainError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

fn respond<T: serde::Serialize>(res: Result<T, DomainError>) -> Response {
    match res {
        Ok(v) => Json(v).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_config(State(st): State<HttpState>) -> impl IntoResponse {
    Json(st.public_config.as_ref().clone())
}

pub async fn get_session(State(st): State<HttpState>) -> impl IntoResponse {
    respond(st.shopping.snapshot())
}

pub async fn load_video(State(st): State<HttpState>, Json(req): Json<LoadVideoRequest>) -> impl IntoResponse {
    respond(st.shopping.load_video(req.source))
}

pub async fn reset_video(State(st): State<HttpState>) -> impl IntoResponse {
    respond(st.shopping.reset())
}

pub async fn play(State(st): State<HttpState>) -> impl IntoResponse {
    respond(st.shopping.play())
}

/// El frame se decodifica junto con la captura, fuera del executor.
/// Un frame ilegible responde 400; la pausa queda registrada y los productos no cambian.
pub async fn pause(State(st): State<HttpState>, Json(req): Json<PauseRequest>) -> impl IntoResponse {
    let frame = req.frame;
    let outcome = match st.shopping.pause_with(move || StillFrameSurface::from_encoded(&frame)).await {
        Ok(o) => o,
        Err(e) => {
            tracing::warn!("Pausa rechazada: {}", e);
            return error_response(e);
        }
    };
    respond(st.shopping.snapshot().map(|snapshot| PauseResponse { outcome, snapshot }))
}

pub async fn overlay(State(st): State<HttpState>, Query(q): Query<OverlayQuery>) -> impl IntoResponse {
    respond(st.shopping.overlay(q.into()))
}

pub async fn overlay_hit(State(st): State<HttpState>, Query(q): Query<HitQuery>) -> impl IntoResponse {
    let (rect, x, y) = q.into();
    match st.shopping.hit(rect, x, y) {
        Ok(Some(region)) => Json(region).into_response(),
        Ok(None) => error_response(DomainError::NotFound(format!("ningún producto en ({x}, {y})"))),
        Err(e) => error_response(e),
    }
}
