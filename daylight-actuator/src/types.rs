//! Tipos de resultado do atuador

use serde::{Deserialize, Serialize};
use daylight_core::{Color, LampError, LampErrorKind};

/// Resultado de um `apply` (um por tick)
///
/// `applied == true` garante que a última cor conhecida da lâmpada é `color`.
/// `attempt == 0` indica que a cor já estava aplicada e nada foi escrito.
/// `cancelled == true` indica que um pedido de parada interrompeu a atuação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuationResult {
    pub applied: bool,
    pub color: Color,
    /// Tentativas feitas neste `apply` (1-based; 0 = cache)
    pub attempt: u32,
    /// Erro terminal quando `applied == false`
    pub error: Option<LampError>,
    /// Parada pedida antes de uma tentativa ou durante o backoff
    #[serde(default)]
    pub cancelled: bool,
}

impl ActuationResult {
    pub fn cached(color: Color) -> Self {
        Self {
            applied: true,
            color,
            attempt: 0,
            error: None,
            cancelled: false,
        }
    }

    pub fn written(color: Color, attempt: u32) -> Self {
        Self {
            applied: true,
            color,
            attempt,
            error: None,
            cancelled: false,
        }
    }

    pub fn failed(color: Color, attempt: u32, error: LampError) -> Self {
        Self {
            applied: false,
            color,
            attempt,
            error: Some(error),
            cancelled: false,
        }
    }

    /// Atuação interrompida pela parada; `error` é a última falha, se houve
    pub fn cancelled(color: Color, attempt: u32, error: Option<LampError>) -> Self {
        Self {
            applied: false,
            color,
            attempt,
            error,
            cancelled: true,
        }
    }

    /// Nenhuma escrita foi feita (cor já aplicada)
    pub fn was_cached(&self) -> bool {
        self.applied && self.attempt == 0
    }

    pub fn error_kind(&self) -> Option<LampErrorKind> {
        self.error.as_ref().map(LampError::kind)
    }
}

/// Contadores acumulados do atuador
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorStats {
    /// Chamadas ao dispositivo
    pub device_calls: u64,
    /// Escritas bem-sucedidas
    pub writes: u64,
    /// `apply` resolvidos pelo cache
    pub cache_hits: u64,
    /// Tentativas repetidas após falha transitória
    pub retries: u64,
    /// `apply` que terminaram sem aplicar
    pub failures: u64,
}
