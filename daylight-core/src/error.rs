//! Erros das interfaces de captura e atuação

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Erro ao interpretar uma cor textual
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Hex color must have 6 digits, got {0}")]
    HexLength(usize),

    #[error("Invalid hex color: {0}")]
    Hex(String),

    #[error("Expected 3 components, got {0}")]
    ComponentCount(usize),

    #[error("Component must be within 0-255: {0}")]
    Component(String),
}

/// Erro de captura de quadro
///
/// `Transient`: câmera momentaneamente inacessível, o próximo tick tenta de novo.
/// `Fatal`: câmera mal configurada, exige intervenção externa.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureError {
    #[error("Transient capture failure: {0}")]
    Transient(String),

    #[error("Fatal capture failure: {0}")]
    Fatal(String),
}

impl CaptureError {
    pub fn transient(msg: impl Into<String>) -> Self {
        CaptureError::Transient(msg.into())
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        CaptureError::Fatal(msg.into())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, CaptureError::Fatal(_))
    }

    pub fn is_transient(&self) -> bool {
        !self.is_fatal()
    }
}

/// Classe de erro da lâmpada (sem payload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LampErrorKind {
    Connection,
    Timeout,
    InvalidColor,
    Auth,
}

impl LampErrorKind {
    /// Conexão e timeout podem se resolver sozinhos; os demais indicam bug de configuração
    pub fn is_transient(self) -> bool {
        matches!(self, LampErrorKind::Connection | LampErrorKind::Timeout)
    }
}

/// Erro de escrita na lâmpada
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LampError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl LampError {
    pub fn kind(&self) -> LampErrorKind {
        match self {
            LampError::Connection(_) => LampErrorKind::Connection,
            LampError::Timeout(_) => LampErrorKind::Timeout,
            LampError::InvalidColor(_) => LampErrorKind::InvalidColor,
            LampError::Auth(_) => LampErrorKind::Auth,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }
}
