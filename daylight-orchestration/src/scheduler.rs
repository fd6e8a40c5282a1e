//! Scheduler de cadência fixa ancorado em relógio monotônico

use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use crate::error::{ConfigError, ConfigResult};

/// Configuração do scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Intervalo entre fronteiras de tick (ms)
    pub interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Invalid("interval_ms must be > 0".into()));
        }
        Ok(())
    }
}

/// Fronteiras de tick em `anchor + n · interval`
///
/// A próxima fronteira nunca é calculada a partir do fim do tick anterior,
/// então ticks lentos não acumulam deriva. Um tick que passa de uma ou mais
/// fronteiras faz o scheduler pular para a primeira fronteira futura; as
/// puladas contam como perdidas e nunca rodam em paralelo nem em rajada.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    anchor: Option<Instant>,
    /// Índice da última fronteira entregue
    index: u64,
    missed_ticks: u64,
}

impl TickScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_interval(config.interval())
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            anchor: None,
            index: 0,
            missed_ticks: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fixa a âncora (fronteira 0)
    pub fn start(&mut self, now: Instant) {
        self.anchor = Some(now);
        self.index = 0;
        self.missed_ticks = 0;
    }

    pub fn anchor(&self) -> Option<Instant> {
        self.anchor
    }

    /// Próxima fronteira estritamente depois de `now`
    ///
    /// Sem âncora, `now` vira a âncora e a fronteira é `now + interval`.
    pub fn next_boundary(&mut self, now: Instant) -> Instant {
        let anchor = *self.anchor.get_or_insert(now);
        let interval_ns = self.interval.as_nanos().max(1);
        let elapsed_ns = now.saturating_duration_since(anchor).as_nanos();

        let due = (elapsed_ns / interval_ns) as u64 + 1;
        let expected = self.index + 1;
        if due > expected {
            self.missed_ticks += due - expected;
        }
        self.index = due.max(expected);

        anchor + self.boundary_offset(self.index)
    }

    /// Quanto esperar a partir de `now` até a próxima fronteira
    pub fn wait_time(&mut self, now: Instant) -> Duration {
        self.next_boundary(now).saturating_duration_since(now)
    }

    fn boundary_offset(&self, index: u64) -> Duration {
        let nanos = self.interval.as_nanos().saturating_mul(index as u128);
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
    }

    /// Fronteiras puladas por ticks que passaram do intervalo
    pub fn missed_ticks(&self) -> u64 {
        self.missed_ticks
    }

    /// Fronteiras já entregues
    pub fn boundaries(&self) -> u64 {
        self.index
    }

    pub fn reset(&mut self) {
        self.anchor = None;
        self.index = 0;
        self.missed_ticks = 0;
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
