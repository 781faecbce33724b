use base64::{prelude::BASE64_STANDARD, Engine};
use image::{GenericImage, RgbImage};

use crate::application::ports::VideoSurface;
use crate::domain::{
    errors::{DomainError, DomainResult},
    frame::{strip_data_url_header, FrameSize},
};

/// Superficie construida a partir del frame en pausa que envía el reproductor.
pub struct StillFrameSurface {
    frame: RgbImage,
}

impl StillFrameSurface {
    pub fn new(frame: RgbImage) -> Self {
        Self { frame }
    }

    /// Acepta base64 plano o un data URL de cualquier formato que decodifique `image`.
    pub fn from_encoded(encoded: &str) -> DomainResult<Self> {
        let payload = strip_data_url_header(encoded);
        if payload.is_empty() {
            return Err(DomainError::InvalidInput("frame vacío".into()));
        }
        let bytes = BASE64_STANDARD
            .decode(payload)
            .map_err(|e| DomainError::InvalidInput(format!("base64 inválido: {e}")))?;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| DomainError::InvalidInput(format!("imagen no decodificable: {e}")))?;
        Ok(Self::new(img.to_rgb8()))
    }
}

impl VideoSurface for StillFrameSurface {
    fn native_size(&self) -> FrameSize {
        FrameSize { width: self.frame.width(), height: self.frame.height() }
    }

    fn draw_frame(&self, target: &mut RgbImage) -> DomainResult<()> {
        target
            .copy_from(&self.frame, 0, 0)
            .map_err(|e| DomainError::OperationFailed(e.to_string()))
    }
}
