//! Lâmpada simulada (mock de hardware)

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use daylight_core::{Color, LampDevice, LampError};

/// Estado interno da lâmpada simulada
#[derive(Debug, Default)]
struct SimulatedState {
    current: Option<Color>,
    writes: Vec<Color>,
    calls: u64,
    /// Falhas roteirizadas, consumidas uma por chamada
    script: VecDeque<LampError>,
    latency: Duration,
}

/// Lâmpada em memória
///
/// Clones compartilham o mesmo estado, então um teste pode mover uma cópia
/// para o atuador e inspecionar a outra.
#[derive(Debug, Clone)]
pub struct SimulatedLamp {
    name: String,
    state: Arc<Mutex<SimulatedState>>,
}

impl SimulatedLamp {
    pub fn new() -> Self {
        Self::named("simulated-lamp")
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Arc::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedState> {
        // Estado é só dados; um pânico de teste não o deixa inconsistente
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Atraso artificial em cada escrita
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = latency;
        self
    }

    /// A próxima chamada falha com `error`
    pub fn fail_next(&self, error: LampError) {
        self.lock().script.push_back(error);
    }

    /// As próximas `n` chamadas falham com `error`
    pub fn fail_times(&self, n: usize, error: LampError) {
        let mut state = self.lock();
        for _ in 0..n {
            state.script.push_back(error.clone());
        }
    }

    /// Cor atualmente exibida
    pub fn current(&self) -> Option<Color> {
        self.lock().current
    }

    /// Escritas bem-sucedidas, em ordem
    pub fn writes(&self) -> Vec<Color> {
        self.lock().writes.clone()
    }

    /// Total de chamadas (inclui falhas)
    pub fn calls(&self) -> u64 {
        self.lock().calls
    }
}

impl Default for SimulatedLamp {
    fn default() -> Self {
        Self::new()
    }
}

impl LampDevice for SimulatedLamp {
    fn set_color(&mut self, color: Color) -> Result<(), LampError> {
        let latency = {
            let mut state = self.lock();
            state.calls += 1;
            if let Some(err) = state.script.pop_front() {
                return Err(err);
            }
            state.latency
        };

        if !latency.is_zero() {
            std::thread::sleep(latency);
        }

        let mut state = self.lock();
        state.current = Some(color);
        state.writes.push(color);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
