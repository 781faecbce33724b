pub mod routes;
pub mod state;

use axum::{routing::{get, post}, Router};
use crate::adapters::http::state::HttpState;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/config", get(routes::get_config))
        .route("/api/session", get(routes::get_session))
        .route("/api/video", post(routes::load_video).delete(routes::reset_video))
        .route("/api/player/play", post(routes::play))
        .route("/api/player/pause", post(routes::pause))
        .route("/api/overlay", get(routes::overlay))
        .route("/api/overlay/hit", get(routes::overlay_hit))
        .with_state(state)
}
