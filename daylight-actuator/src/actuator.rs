//! Atuador de lâmpada com retry e cache da última cor

use tracing::{debug, warn};
use daylight_core::{Color, LampDevice, ThreadWaiter, WaitOutcome, Waiter};
use crate::backoff::BackoffPolicy;
use crate::error::ActuatorResult;
use crate::types::{ActuationResult, ActuatorStats};

/// Envolve um [`LampDevice`] com retry/backoff e cache de cor
///
/// ## Regras
///
/// - Cor igual à última escrita com sucesso: nenhuma chamada ao dispositivo
/// - Falha transitória (`Connection`, `Timeout`): repete até `max_attempts`,
///   esperando `base · 2^(n-1)` (com teto) entre tentativas
/// - Falha não transitória (`InvalidColor`, `Auth`): devolvida na hora
/// - Só uma escrita bem-sucedida atualiza o cache; após esgotar as tentativas
///   o cache continua com a última cor realmente aplicada
#[derive(Debug)]
pub struct LampActuator<D> {
    device: D,
    policy: BackoffPolicy,
    last_applied: Option<Color>,
    stats: ActuatorStats,
}

impl<D: LampDevice> LampActuator<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            policy: BackoffPolicy::default(),
            last_applied: None,
            stats: ActuatorStats::default(),
        }
    }

    pub fn with_policy(device: D, policy: BackoffPolicy) -> ActuatorResult<Self> {
        policy.validate()?;
        Ok(Self {
            device,
            policy,
            last_applied: None,
            stats: ActuatorStats::default(),
        })
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Última cor escrita com sucesso
    pub fn last_applied(&self) -> Option<Color> {
        self.last_applied
    }

    /// Esquece a cor em cache (a próxima `apply` sempre escreve)
    pub fn invalidate(&mut self) {
        self.last_applied = None;
    }

    pub fn stats(&self) -> ActuatorStats {
        self.stats
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Aplica `color`, esperando o backoff com `thread::sleep`
    pub fn apply(&mut self, color: Color) -> ActuationResult {
        self.apply_with(color, &ThreadWaiter)
    }

    /// Aplica `color`; as esperas de backoff passam por `waiter`
    ///
    /// O cancelamento é checado antes de cada tentativa e durante o backoff;
    /// cancelado, devolve [`ActuationResult::cancelled`] sem tocar o dispositivo.
    pub fn apply_with(&mut self, color: Color, waiter: &dyn Waiter) -> ActuationResult {
        if self.last_applied == Some(color) {
            self.stats.cache_hits += 1;
            return ActuationResult::cached(color);
        }

        let mut attempt = 0;
        let mut last_error = None;
        loop {
            if waiter.is_cancelled() {
                debug!(lamp = self.device.name(), %color, attempt, "stop requested, skipping lamp write");
                self.stats.failures += 1;
                return ActuationResult::cancelled(color, attempt, last_error);
            }

            attempt += 1;
            self.stats.device_calls += 1;

            let err = match self.device.set_color(color) {
                Ok(()) => {
                    self.last_applied = Some(color);
                    self.stats.writes += 1;
                    debug!(lamp = self.device.name(), %color, attempt, "color written");
                    return ActuationResult::written(color, attempt);
                }
                Err(err) => err,
            };

            if !err.is_transient() {
                warn!(lamp = self.device.name(), %color, error = %err, "non-retryable lamp failure");
                self.stats.failures += 1;
                return ActuationResult::failed(color, attempt, err);
            }

            if attempt >= self.policy.max_attempts {
                warn!(lamp = self.device.name(), %color, attempt, error = %err, "lamp retries exhausted");
                self.stats.failures += 1;
                return ActuationResult::failed(color, attempt, err);
            }

            let delay = self.policy.delay_after(attempt);
            debug!(lamp = self.device.name(), attempt, ?delay, error = %err, "transient lamp failure, backing off");

            if waiter.wait(delay) == WaitOutcome::Cancelled {
                self.stats.failures += 1;
                return ActuationResult::cancelled(color, attempt, Some(err));
            }
            self.stats.retries += 1;
            last_error = Some(err);
        }
    }
}
