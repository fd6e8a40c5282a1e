//! Estados do loop de controle

use std::fmt;
use serde::{Deserialize, Serialize};

/// Estágio corrente do tick
///
/// ```text
/// Idle → Sampling → Analyzing → Mapping → Actuating → Idle
///   └──────────── (stop) ─────────────────────────▶ Stopped
/// ```
///
/// Uma falha em qualquer estágio volta direto para `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    #[default]
    Idle,
    Sampling,
    Analyzing,
    Mapping,
    Actuating,
    /// Terminal
    Stopped,
}

impl LoopState {
    /// Estágio seguinte no ciclo normal
    pub fn next(self) -> Self {
        match self {
            LoopState::Idle => LoopState::Sampling,
            LoopState::Sampling => LoopState::Analyzing,
            LoopState::Analyzing => LoopState::Mapping,
            LoopState::Mapping => LoopState::Actuating,
            LoopState::Actuating => LoopState::Idle,
            LoopState::Stopped => LoopState::Stopped,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == LoopState::Stopped
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoopState::Idle => "idle",
            LoopState::Sampling => "sampling",
            LoopState::Analyzing => "analyzing",
            LoopState::Mapping => "mapping",
            LoopState::Actuating => "actuating",
            LoopState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_returns_to_idle() {
        let mut state = LoopState::Idle;
        let mut visited = vec![state];
        for _ in 0..5 {
            state = state.next();
            visited.push(state);
        }
        assert_eq!(
            visited,
            vec![
                LoopState::Idle,
                LoopState::Sampling,
                LoopState::Analyzing,
                LoopState::Mapping,
                LoopState::Actuating,
                LoopState::Idle,
            ]
        );
    }

    #[test]
    fn test_stopped_is_terminal() {
        assert!(LoopState::Stopped.is_terminal());
        assert_eq!(LoopState::Stopped.next(), LoopState::Stopped);
    }
}
