//! Erros da camada de atuador

use thiserror::Error;

pub type ActuatorResult<T> = Result<T, ActuatorError>;

/// Erros de configuração do atuador
///
/// Falhas de escrita na lâmpada não passam por aqui: são reportadas no
/// [`ActuationResult`](crate::ActuationResult) de cada tentativa.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActuatorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
