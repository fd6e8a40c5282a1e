//! Status do loop, lido por colaboradores de saúde/observabilidade

use std::sync::{Arc, RwLock};
use serde::{Deserialize, Serialize};
use daylight_core::{Color, LightMeasurement};
use crate::error::{OrchestrationResult, TickFailure};
use crate::state::LoopState;

/// Snapshot do loop
///
/// Criado no início do loop, atualizado uma vez por tick, descartado no
/// desligamento. Nada é persistido entre execuções.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopStatus {
    pub last_measurement: Option<LightMeasurement>,
    /// Última cor confirmada pela lâmpada
    pub last_applied_color: Option<Color>,
    /// Ticks falhos seguidos; zera no primeiro tick bom
    pub consecutive_failures: u32,
    /// Última falha vista (mantida após a recuperação)
    pub last_error: Option<TickFailure>,
    /// Ticks concluídos (bons ou falhos)
    pub ticks: u64,
    pub total_failures: u64,
    /// Capturas fatais seguidas
    pub consecutive_fatal: u32,
    /// Capturas fatais passaram do limite
    pub escalated: bool,
    pub state: LoopState,
}

impl LoopStatus {
    pub fn is_healthy(&self) -> bool {
        self.consecutive_failures == 0 && !self.escalated
    }
}

/// Handle compartilhado para o status
///
/// Só o loop escreve; qualquer thread pode tirar um snapshot.
#[derive(Debug, Clone, Default)]
pub struct StatusHandle {
    inner: Arc<RwLock<LoopStatus>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cópia do status atual
    pub fn snapshot(&self) -> OrchestrationResult<LoopStatus> {
        let status = self.inner.read()?;
        Ok(status.clone())
    }

    pub fn state(&self) -> OrchestrationResult<LoopState> {
        self.read(|status| status.state)
    }

    /// Lê um campo sem clonar o snapshot inteiro
    pub fn read<R>(&self, f: impl FnOnce(&LoopStatus) -> R) -> OrchestrationResult<R> {
        let status = self.inner.read()?;
        Ok(f(&status))
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut LoopStatus) -> R) -> OrchestrationResult<R> {
        let mut status = self.inner.write()?;
        Ok(f(&mut status))
    }

    pub(crate) fn set_state(&self, state: LoopState) -> OrchestrationResult<()> {
        self.update(|status| status.state = state)
    }

    /// Avança para o estágio seguinte do ciclo e devolve o novo estado
    pub(crate) fn advance_state(&self) -> OrchestrationResult<LoopState> {
        self.update(|status| {
            status.state = status.state.next();
            status.state
        })
    }
}
