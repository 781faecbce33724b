use std::sync::{Mutex, TryLockError};

use base64::{prelude::BASE64_STANDARD, Engine};
use image::RgbImage;
use tracing::{debug, warn};

use crate::application::ports::{FrameCapturePort, VideoSurface};
use crate::domain::frame::CapturedFrame;

/// Calidad JPEG fija (0.8).
pub const JPEG_QUALITY: u8 = 80;

/// Captura el frame en pausa a resolución nativa y lo comprime a JPEG.
/// El buffer se reutiliza entre capturas mientras no cambien las dimensiones.
pub struct JpegFrameCapturer {
    buffer: Mutex<RgbImage>,
    quality: u8,
}

impl JpegFrameCapturer {
    pub fn new() -> Self {
        Self::with_quality(JPEG_QUALITY)
    }

    pub fn with_quality(quality: u8) -> Self {
        Self { buffer: Mutex::new(RgbImage::new(0, 0)), quality }
    }
}

impl Default for JpegFrameCapturer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCapturePort for JpegFrameCapturer {
    fn capture(&self, surface: &dyn VideoSurface) -> Option<CapturedFrame> {
        let size = surface.native_size();
        if !size.is_decoded() {
            debug!("Captura omitida: el vídeo aún no tiene dimensiones");
            return None;
        }

        // Si otra captura está usando el buffer compartido se pinta en uno temporal.
        let mut shared = match self.buffer.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::WouldBlock) => None,
            Err(TryLockError::Poisoned(_)) => {
                warn!("Captura omitida: buffer de captura no disponible");
                return None;
            }
        };
        let mut scratch = RgbImage::new(0, 0);
        let buf: &mut RgbImage = match shared.as_deref_mut() {
            Some(b) => b,
            None => &mut scratch,
        };
        if buf.dimensions() != (size.width, size.height) {
            *buf = RgbImage::new(size.width, size.height);
        }

        if let Err(e) = surface.draw_frame(buf) {
            warn!("Captura omitida: no se pudo pintar el frame: {}", e);
            return None;
        }

        let mut jpeg = Vec::new();
        let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, self.quality);
        if let Err(e) = enc.encode(buf.as_raw(), size.width, size.height, image::ExtendedColorType::Rgb8) {
            warn!("Captura omitida: fallo al codificar JPEG: {}", e);
            return None;
        }

        debug!("Frame capturado {}x{} ({} bytes JPEG)", size.width, size.height, jpeg.len());
        Some(CapturedFrame {
            jpeg_base64: BASE64_STANDARD.encode(jpeg),
            width: size.width,
            height: size.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::frame::surface::StillFrameSurface;
    use crate::domain::{errors::{DomainError, DomainResult}, frame::FrameSize};

    struct UnloadedSurface;

    impl VideoSurface for UnloadedSurface {
        fn native_size(&self) -> FrameSize {
            FrameSize { width: 0, height: 0 }
        }
        fn draw_frame(&self, _: &mut RgbImage) -> DomainResult<()> {
            panic!("no debería pintarse un vídeo sin dimensiones");
        }
    }

    struct BrokenSurface;

    impl VideoSurface for BrokenSurface {
        fn native_size(&self) -> FrameSize {
            FrameSize { width: 4, height: 4 }
        }
        fn draw_frame(&self, _: &mut RgbImage) -> DomainResult<()> {
            Err(DomainError::OperationFailed("sin contexto".into()))
        }
    }

    fn decode(frame: &CapturedFrame) -> image::DynamicImage {
        assert!(!frame.jpeg_base64.starts_with("data:"));
        let bytes = BASE64_STANDARD.decode(&frame.jpeg_base64).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn encoded_frame_keeps_native_resolution() {
        let capturer = JpegFrameCapturer::new();
        for (w, h) in [(1, 1), (17, 9), (320, 180), (64, 480)] {
            let surface = StillFrameSurface::new(RgbImage::from_pixel(w, h, image::Rgb([200, 30, 90])));
            let frame = capturer.capture(&surface).unwrap();
            assert_eq!((frame.width, frame.height), (w, h));

            let decoded = decode(&frame);
            assert_eq!((decoded.width(), decoded.height()), (w, h));
        }
    }

    #[test]
    fn buffer_is_reused_for_same_size() {
        let capturer = JpegFrameCapturer::new();
        let surface = StillFrameSurface::new(RgbImage::new(8, 8));
        capturer.capture(&surface).unwrap();
        let ptr = capturer.buffer.lock().unwrap().as_raw().as_ptr();
        capturer.capture(&surface).unwrap();
        assert_eq!(capturer.buffer.lock().unwrap().as_raw().as_ptr(), ptr);
    }

    #[test]
    fn busy_shared_buffer_does_not_block_capture() {
        let capturer = JpegFrameCapturer::new();
        let _held = capturer.buffer.lock().unwrap();
        let surface = StillFrameSurface::new(RgbImage::new(6, 4));
        let frame = capturer.capture(&surface).unwrap();
        assert_eq!((frame.width, frame.height), (6, 4));
    }

    #[test]
    fn unavailable_capture_is_a_silent_noop() {
        let capturer = JpegFrameCapturer::new();
        assert!(capturer.capture(&UnloadedSurface).is_none());
        assert!(capturer.capture(&BrokenSurface).is_none());
    }
}
