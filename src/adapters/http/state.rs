use std::sync::Arc;
use crate::application::{dto::PublicConfigResponse, services::ShoppingService};

/// Estado compartido para los manejadores HTTP de Axum.
/// Siguiendo la Arquitectura Hexagonal, el estado contiene los servicios (Casos de Uso).
#[derive(Clone)]
pub struct HttpState {
    /// Orquestador de pausa, detección y overlay.
    pub shopping: Arc<ShoppingService>,
    /// Configuración no secreta que se expone al reproductor.
    pub public_config: Arc<PublicConfigResponse>,
}
