use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("No encontrado: {0}")]
    NotFound(String),
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),
    #[error("Error de operación: {0}")]
    OperationFailed(String),
    #[error("Servicio de visión no disponible: {0}")]
    Upstream(String),
    #[error("Credenciales rechazadas por el servicio de visión: {0}")]
    Unauthorized(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
