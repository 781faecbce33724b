use serde::{Deserialize, Serialize};

/// Lado del espacio normalizado en el que el modelo expresa las cajas.
pub const NORMALIZED_EXTENT: f64 = 1000.0;

/// Caja delimitadora normalizada a 1000x1000, independiente de la resolución real.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ymin: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub xmax: f64,
}

impl BoundingBox {
    pub fn new(ymin: f64, xmin: f64, ymax: f64, xmax: f64) -> Self {
        Self { ymin, xmin, ymax, xmax }
    }

    /// Acota cada coordenada a [0, 1000] e intercambia los pares min/max invertidos.
    /// Una caja ya válida se devuelve sin cambios.
    pub fn sanitized(self) -> Self {
        let clamp = |c: f64| c.clamp(0.0, NORMALIZED_EXTENT);
        let (ymin, ymax) = ordered(clamp(self.ymin), clamp(self.ymax));
        let (xmin, xmax) = ordered(clamp(self.xmin), clamp(self.xmax));
        Self { ymin, xmin, ymax, xmax }
    }

    pub fn is_well_formed(&self) -> bool {
        let in_range = |c: f64| (0.0..=NORMALIZED_EXTENT).contains(&c);
        in_range(self.ymin)
            && in_range(self.xmin)
            && in_range(self.ymax)
            && in_range(self.xmax)
            && self.ymin <= self.ymax
            && self.xmin <= self.xmax
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedProduct {
    pub id: String,
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub shopping_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Resultado de una captura. El orden es el que devuelve el modelo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub products: Vec<DetectedProduct>,
}

impl DetectionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
