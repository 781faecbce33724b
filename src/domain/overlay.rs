use serde::{Deserialize, Serialize};

use super::detection::{DetectedProduct, NORMALIZED_EXTENT};
use super::frame::RenderedRect;

/// Destino de los enlaces: siempre un contexto de navegación nuevo.
pub const LINK_TARGET: &str = "_blank";

/// Zona interactiva colocada sobre el vídeo, en píxeles de pantalla.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRegion {
    pub product_id: String,
    pub label: String,
    pub href: String,
    pub target: String,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayRegion {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }
}

fn scale(c: f64, dimension: f64) -> f64 {
    // Multiplicar antes de dividir mantiene exactos los casos enteros.
    c * dimension / NORMALIZED_EXTENT
}

/// Proyecta cada caja normalizada sobre el rectángulo renderizado actual.
/// Se recalcula en cada llamada; el rectángulo nunca se cachea.
pub fn layout(products: &[DetectedProduct], rect: RenderedRect) -> Vec<OverlayRegion> {
    products
        .iter()
        .map(|p| {
            let b = &p.bbox;
            OverlayRegion {
                product_id: p.id.clone(),
                label: p.label.clone(),
                href: p.shopping_url.clone(),
                target: LINK_TARGET.to_string(),
                top: scale(b.ymin, rect.height),
                left: scale(b.xmin, rect.width),
                width: scale(b.xmax - b.xmin, rect.width),
                height: scale(b.ymax - b.ymin, rect.height),
            }
        })
        .collect()
}

/// La última región pintada queda encima, así que se busca desde el final.
pub fn hit_test(regions: &[OverlayRegion], x: f64, y: f64) -> Option<&OverlayRegion> {
    regions.iter().rev().find(|r| r.contains(x, y))
}
