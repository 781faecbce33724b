use serde::{Deserialize, Serialize};

/// Resolución nativa del vídeo (videoWidth / videoHeight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn is_decoded(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Rectángulo que ocupa el vídeo en pantalla, en píxeles CSS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderedRect {
    pub width: f64,
    pub height: f64,
}

/// Frame comprimido listo para enviarse al modelo.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    /// JPEG en base64, sin cabecera `data:`.
    pub jpeg_base64: String,
    pub width: u32,
    pub height: u32,
}

pub const JPEG_MIME: &str = "image/jpeg";

/// Quita la cabecera de un data URL (`data:image/jpeg;base64,`) y deja solo el payload.
/// Si no hay cabecera devuelve la entrada tal cual.
pub fn strip_data_url_header(input: &str) -> &str {
    let trimmed = input.trim();
    match trimmed.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, payload)| payload).unwrap_or(""),
        None => trimmed,
    }
}
