//! Erros específicos do módulo fotônico

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PhotonicResult<T> = Result<T, PhotonicError>;

/// Quadro que não pode ser analisado
///
/// Local ao tick: nunca é repetido, o tick é apenas pulado.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeError {
    #[error("Frame has zero dimensions ({width}x{height})")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("Frame buffer is empty")]
    Empty,

    #[error("Malformed frame: expected {expected} bytes, got {actual}")]
    Malformed { expected: usize, actual: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhotonicError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
