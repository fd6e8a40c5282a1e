//! Política de retry com backoff exponencial

use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{ActuatorError, ActuatorResult};

/// Quantas tentativas e quanto esperar entre elas
///
/// A espera após a tentativa `n` (1-based) é `base · 2^(n-1)`, limitada a
/// `max_delay_ms`. Não há espera depois da última tentativa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffPolicy {
    /// Tentativas por cor (inclui a primeira)
    pub max_attempts: u32,
    /// Espera após a primeira falha (ms)
    pub base_delay_ms: u64,
    /// Teto da espera (ms)
    pub max_delay_ms: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

impl BackoffPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64, max_delay_ms: u64) -> ActuatorResult<Self> {
        let policy = Self {
            max_attempts,
            base_delay_ms,
            max_delay_ms,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Sem espera entre tentativas (testes)
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    pub fn validate(&self) -> ActuatorResult<()> {
        if self.max_attempts == 0 {
            return Err(ActuatorError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(ActuatorError::InvalidConfig(
                "base_delay_ms must not exceed max_delay_ms".into(),
            ));
        }
        Ok(())
    }

    /// Espera depois da tentativa `attempt` falhar
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(63);
        let factor = 1u64.checked_shl(exp).unwrap_or(u64::MAX);
        let ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(ms)
    }
}
