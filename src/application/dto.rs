use serde::{Deserialize, Serialize};

use crate::application::services::{PauseOutcome, SessionSnapshot};
use crate::domain::frame::RenderedRect;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadVideoRequest {
    pub source: String,
}

/// Frame en pausa a resolución nativa: base64 plano o data URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseRequest {
    pub frame: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PauseResponse {
    pub outcome: PauseOutcome,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OverlayQuery {
    pub width: f64,
    pub height: f64,
}

impl From<OverlayQuery> for RenderedRect {
    fn from(q: OverlayQuery) -> Self {
        RenderedRect { width: q.width, height: q.height }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HitQuery {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl From<HitQuery> for (RenderedRect, f64, f64) {
    fn from(q: HitQuery) -> Self {
        (RenderedRect { width: q.width, height: q.height }, q.x, q.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicConfigResponse {
    pub model: String,
    pub detect_timeout_secs: Option<u64>,
    pub jpeg_quality: u8,
}
