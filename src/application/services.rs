use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    application::ports::{FrameCapturePort, ProductDetectionPort, VideoSurface},
    domain::{
        detection::{DetectedProduct, DetectionResult},
        errors::{DomainError, DomainResult},
        frame::RenderedRect,
        overlay::{self, OverlayRegion},
        session::{PlaybackState, PlayerSession, VideoSourceId},
    },
};

/// Qué pasó con una pausa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseOutcome {
    /// Resultado aplicado a la sesión.
    Applied,
    /// No se pudo capturar el frame; nada cambia.
    CaptureSkipped,
    /// Llegó tarde (play, otra pausa o vídeo nuevo entretanto) y se descartó.
    Stale,
    /// Fallo de transporte; la lista queda vacía.
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub source: Option<String>,
    pub analyzing: bool,
    pub products: Vec<DetectedProduct>,
}

/// Orquestador del pipeline: pausa -> captura -> detección -> overlay.
/// Es el dueño único del estado de la sesión.
#[derive(Clone)]
pub struct ShoppingService {
    session: Arc<Mutex<PlayerSession>>,
    capturer: Arc<dyn FrameCapturePort>,
    detector: Arc<dyn ProductDetectionPort>,
    detect_timeout: Option<Duration>,
}

impl ShoppingService {
    pub fn new(
        capturer: Arc<dyn FrameCapturePort>,
        detector: Arc<dyn ProductDetectionPort>,
        detect_timeout: Option<Duration>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(PlayerSession::new())),
            capturer,
            detector,
            detect_timeout,
        }
    }

    fn session(&self) -> DomainResult<MutexGuard<'_, PlayerSession>> {
        self.session
            .lock()
            .map_err(|_| DomainError::OperationFailed("Lock de sesión fallido".into()))
    }

    pub fn snapshot(&self) -> DomainResult<SessionSnapshot> {
        let s = self.session()?;
        Ok(SessionSnapshot {
            state: s.state(),
            source: s.source().map(|v| v.0.clone()),
            analyzing: s.is_analyzing(),
            products: s.products().to_vec(),
        })
    }

    pub fn load_video(&self, source: String) -> DomainResult<SessionSnapshot> {
        if source.trim().is_empty() {
            return Err(DomainError::InvalidInput("source vacío".into()));
        }
        info!("🎬 Vídeo cargado: {}", source);
        self.session()?.load_video(VideoSourceId(source));
        self.snapshot()
    }

    pub fn reset(&self) -> DomainResult<SessionSnapshot> {
        self.session()?.reset();
        self.snapshot()
    }

    pub fn play(&self) -> DomainResult<SessionSnapshot> {
        self.session()?.play()?;
        self.snapshot()
    }

    /// Pausa y lanza la detección sobre el frame actual de `surface`.
    pub async fn pause<S: VideoSurface + 'static>(&self, surface: S) -> DomainResult<PauseOutcome> {
        self.pause_with(move || Ok(surface)).await
    }

    /// Igual que `pause`, pero la superficie la construye `load` (por ejemplo
    /// decodificando el frame subido). El ticket se reserva antes de nada; la
    /// decodificación y la captura corren en `spawn_blocking`, y el lock de sesión
    /// nunca se mantiene durante un `.await`.
    pub async fn pause_with<S, F>(&self, load: F) -> DomainResult<PauseOutcome>
    where
        S: VideoSurface + 'static,
        F: FnOnce() -> DomainResult<S> + Send + 'static,
    {
        let ticket = self.session()?.pause()?;

        let capturer = self.capturer.clone();
        let captured = tokio::task::spawn_blocking(move || {
            let surface = load()?;
            Ok::<_, DomainError>(capturer.capture(&surface))
        })
        .await
        .map_err(|e| DomainError::OperationFailed(format!("tarea de captura abortada: {e}")))??;

        let Some(frame) = captured else {
            return Ok(PauseOutcome::CaptureSkipped);
        };

        if !self.session()?.begin_detection(ticket) {
            warn!("Pausa #{} descartada: la sesión cambió durante la captura", ticket.seq());
            return Ok(PauseOutcome::Stale);
        }
        info!("Detección #{} iniciada", ticket.seq());

        let outcome = match self.run_detection(&frame).await {
            Ok(result) => {
                let count = result.len();
                if self.session()?.complete(ticket, result) {
                    info!("Detección #{} aplicada ({} productos)", ticket.seq(), count);
                    PauseOutcome::Applied
                } else {
                    warn!("Detección #{} descartada: llegó tarde", ticket.seq());
                    PauseOutcome::Stale
                }
            }
            Err(e) => {
                error!("❌ Detección #{} fallida: {}", ticket.seq(), e);
                if self.session()?.fail(ticket) {
                    PauseOutcome::Failed
                } else {
                    PauseOutcome::Stale
                }
            }
        };
        Ok(outcome)
    }

    async fn run_detection(
        &self,
        frame: &crate::domain::frame::CapturedFrame,
    ) -> DomainResult<DetectionResult> {
        match self.detect_timeout {
            Some(limit) => tokio::time::timeout(limit, self.detector.detect(frame))
                .await
                .map_err(|_| DomainError::Upstream(format!("sin respuesta tras {:?}", limit)))?,
            None => self.detector.detect(frame).await,
        }
    }

    /// Regiones para el rectángulo renderizado en este momento.
    pub fn overlay(&self, rect: RenderedRect) -> DomainResult<Vec<OverlayRegion>> {
        if !(rect.width.is_finite() && rect.height.is_finite()) || rect.width < 0.0 || rect.height < 0.0 {
            return Err(DomainError::InvalidInput(format!("rectángulo inválido: {:?}", rect)));
        }
        let s = self.session()?;
        if !s.overlay_visible() {
            return Ok(Vec::new());
        }
        Ok(overlay::layout(s.products(), rect))
    }

    pub fn hit(&self, rect: RenderedRect, x: f64, y: f64) -> DomainResult<Option<OverlayRegion>> {
        let regions = self.overlay(rect)?;
        Ok(overlay::hit_test(&regions, x, y).cloned())
    }
}
