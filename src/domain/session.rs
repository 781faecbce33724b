use serde::{Deserialize, Serialize};

use super::detection::{DetectedProduct, DetectionResult};
use super::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSourceId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Detecting,
}

/// Identifica una petición de detección. Solo el ticket vigente puede aplicar resultados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionTicket {
    seq: u64,
}

impl DetectionTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Estado de reproducción y productos visibles de una sesión.
/// Cualquier transición que invalide el frame actual avanza `seq`, y con ello
/// descarta las respuestas que lleguen tarde.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    source: Option<VideoSourceId>,
    state: PlaybackState,
    seq: u64,
    products: Vec<DetectedProduct>,
}

impl Default for PlayerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerSession {
    pub fn new() -> Self {
        Self { source: None, state: PlaybackState::Idle, seq: 0, products: Vec::new() }
    }

    pub fn source(&self) -> Option<&VideoSourceId> {
        self.source.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn products(&self) -> &[DetectedProduct] {
        &self.products
    }

    pub fn is_analyzing(&self) -> bool {
        self.state == PlaybackState::Detecting
    }

    /// El overlay solo se muestra con el vídeo en pausa (con o sin detección en curso).
    pub fn overlay_visible(&self) -> bool {
        self.source.is_some()
            && matches!(self.state, PlaybackState::Paused | PlaybackState::Detecting)
    }

    pub fn load_video(&mut self, source: VideoSourceId) {
        self.source = Some(source);
        self.invalidate(PlaybackState::Idle);
    }

    pub fn reset(&mut self) {
        self.source = None;
        self.invalidate(PlaybackState::Idle);
    }

    /// Reanudar borra los productos de inmediato, haya o no una detección pendiente.
    pub fn play(&mut self) -> DomainResult<()> {
        self.require_source()?;
        self.invalidate(PlaybackState::Playing);
        Ok(())
    }

    /// Marca la pausa y reserva el ticket antes de capturar, de modo que cualquier
    /// transición posterior (play, otra pausa, vídeo nuevo) lo deja obsoleto.
    /// Los productos no cambian hasta que la captura termine.
    pub fn pause(&mut self) -> DomainResult<DetectionTicket> {
        self.require_source()?;
        self.seq += 1;
        self.state = PlaybackState::Paused;
        Ok(DetectionTicket { seq: self.seq })
    }

    /// Arranca la detección con el frame ya capturado. Devuelve `false` si el
    /// ticket quedó obsoleto mientras se capturaba.
    pub fn begin_detection(&mut self, ticket: DetectionTicket) -> bool {
        if ticket.seq != self.seq || self.state != PlaybackState::Paused {
            return false;
        }
        self.state = PlaybackState::Detecting;
        self.products.clear();
        true
    }

    pub fn is_current(&self, ticket: DetectionTicket) -> bool {
        ticket.seq == self.seq && self.state == PlaybackState::Detecting
    }

    /// Sustituye los productos por completo si el ticket sigue vigente.
    /// Devuelve `false` cuando la respuesta llega tarde y se descarta.
    pub fn complete(&mut self, ticket: DetectionTicket, result: DetectionResult) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.products = result.products;
        self.state = PlaybackState::Paused;
        true
    }

    /// Fallo de transporte: se apaga el indicador y la lista queda vacía.
    pub fn fail(&mut self, ticket: DetectionTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.products.clear();
        self.state = PlaybackState::Paused;
        true
    }

    fn invalidate(&mut self, next: PlaybackState) {
        self.seq += 1;
        self.state = next;
        self.products.clear();
    }

    fn require_source(&self) -> DomainResult<()> {
        match self.source {
            Some(_) => Ok(()),
            None => Err(DomainError::InvalidInput("no hay ningún vídeo cargado".into())),
        }
    }
}
