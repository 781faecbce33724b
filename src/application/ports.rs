use async_trait::async_trait;
use image::RgbImage;

use crate::domain::{
    detection::DetectionResult,
    errors::DomainResult,
    frame::{CapturedFrame, FrameSize},
};

/// Superficie de vídeo en pausa: expone su resolución nativa y sabe pintar su frame actual.
pub trait VideoSurface: Send + Sync {
    fn native_size(&self) -> FrameSize;
    /// `target` ya viene dimensionado a `native_size()`.
    fn draw_frame(&self, target: &mut RgbImage) -> DomainResult<()>;
}

pub trait FrameCapturePort: Send + Sync {
    /// `None` cuando la captura no es posible; nunca es un error visible.
    fn capture(&self, surface: &dyn VideoSurface) -> Option<CapturedFrame>;
}

#[async_trait]
pub trait ProductDetectionPort: Send + Sync {
    /// Solo los fallos de transporte o autenticación llegan como `Err`;
    /// una respuesta mal formada se traduce en un resultado vacío.
    async fn detect(&self, frame: &CapturedFrame) -> DomainResult<DetectionResult>;
}
