//! Erros do mapeador de cor

use thiserror::Error;

pub type MapperResult<T> = Result<T, MapperError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapperError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown mapping strategy: {0}")]
    UnknownStrategy(String),
}
