mod domain;
mod application;
mod adapters;
mod config;

use std::sync::Arc;
use tower_http::services::ServeDir;
use crate::application::{dto::PublicConfigResponse, services::ShoppingService};
use crate::adapters::{
    frame::capture::{JpegFrameCapturer, JPEG_QUALITY},
    gemini::client::GeminiDetectionClient,
    http::{state::HttpState, router},
};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Inicializar logs (RUST_LOG=info por defecto)
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cfg = AppConfig::from_env()?;
    if cfg.gemini.api_key.is_empty() {
        tracing::warn!("⚠️ API_KEY vacía: las detecciones fallarán por autenticación");
    }

    tracing::info!("🔧 Inicializando adaptadores de infraestructura...");

    // 2. Adaptadores: captura JPEG y cliente del modelo de visión
    let capturer = Arc::new(JpegFrameCapturer::new());
    let detector = Arc::new(GeminiDetectionClient::new(cfg.gemini.clone()));

    // 3. Servicio (caso de uso): dueño del estado de la sesión
    let shopping = Arc::new(ShoppingService::new(capturer, detector, cfg.detect_timeout));

    let state = HttpState {
        shopping,
        public_config: Arc::new(PublicConfigResponse {
            model: cfg.gemini.model.clone(),
            detect_timeout_secs: cfg.detect_timeout.map(|d| d.as_secs()),
            jpeg_quality: JPEG_QUALITY,
        }),
    };

    // 4. Router de Axum y archivos estáticos del reproductor
    let app = router(state)
        .fallback_service(ServeDir::new(&cfg.static_dir));

    tracing::info!("🚀 ShopVision escuchando en http://{} (modelo {})", cfg.addr, cfg.gemini.model);
    tracing::info!("📂 Archivos estáticos servidos desde '{}'", cfg.static_dir);

    let listener = tokio::net::TcpListener::bind(&cfg.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
