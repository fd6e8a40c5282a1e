//! Erros de orquestração

use std::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use daylight_actuator::ActuatorError;
use daylight_core::{CaptureError, LampError};
use daylight_mapper::MapperError;
use daylight_photonic::DecodeError;

pub type OrchestrationResult<T> = Result<T, OrchestrationError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Erros de orquestração
///
/// Falhas de um tick nunca chegam aqui: viram [`TickFailure`] no status.
#[derive(Debug, Error, Clone)]
pub enum OrchestrationError {
    /// Configuração inválida
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Erro na construção do mapeador
    #[error("Mapper error: {0}")]
    Mapper(#[from] MapperError),

    /// Erro na construção do atuador
    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),

    /// Thread não pôde ser criada
    #[error("Failed to spawn thread: {0}")]
    Spawn(String),

    /// Loop não terminou dentro do prazo de desligamento
    #[error("Loop did not stop within {0:?}")]
    ShutdownTimeout(Duration),

    /// Thread do loop entrou em pânico
    #[error("Loop thread panicked")]
    LoopPanicked,

    /// Lock poison
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<std::sync::PoisonError<T>> for OrchestrationError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        OrchestrationError::LockPoisoned(err.to_string())
    }
}

/// Erros ao carregar ou validar a configuração
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {value:?}")]
    Env { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<MapperError> for ConfigError {
    fn from(err: MapperError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

impl From<ActuatorError> for ConfigError {
    fn from(err: ActuatorError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// Etapa do tick em que uma falha ocorreu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Capture,
    Decode,
    Actuation,
}

/// Falha de um tick, capturada na fronteira do loop
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "error", rename_all = "snake_case")]
pub enum TickFailure {
    #[error("{0}")]
    Capture(CaptureError),

    #[error("{0}")]
    Decode(DecodeError),

    #[error("{0}")]
    Actuation(LampError),
}

impl TickFailure {
    pub fn stage(&self) -> FailureStage {
        match self {
            TickFailure::Capture(_) => FailureStage::Capture,
            TickFailure::Decode(_) => FailureStage::Decode,
            TickFailure::Actuation(_) => FailureStage::Actuation,
        }
    }

    /// Captura fatal (conta para a escalada)
    pub fn is_fatal_capture(&self) -> bool {
        matches!(self, TickFailure::Capture(err) if err.is_fatal())
    }
}
