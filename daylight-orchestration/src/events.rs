//! Sistema de eventos do loop

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use serde::{Deserialize, Serialize};
use daylight_core::Color;
use crate::error::{OrchestrationResult, TickFailure};

/// Por que o loop terminou
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Pedido externo de parada
    Cancelled,
    /// `max_ticks` atingido
    MaxTicks,
    /// Capturas fatais passaram do limite com `halt_on_escalation`
    Escalated,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Cancelled => "cancelled",
            StopReason::MaxTicks => "max_ticks",
            StopReason::Escalated => "escalated",
        })
    }
}

/// Evento emitido pelo loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LoopEvent {
    /// Tick completo com a cor confirmada na lâmpada
    TickCompleted {
        tick: u64,
        luminance: f32,
        color: Color,
        /// `false` quando a cor já estava aplicada
        written: bool,
        attempts: u32,
    },
    TickFailed {
        tick: u64,
        failure: TickFailure,
        consecutive_failures: u32,
    },
    /// Capturas fatais seguidas chegaram ao limite
    Escalated {
        consecutive_fatal: u32,
        error: String,
    },
    Stopped {
        reason: StopReason,
        ticks: u64,
    },
}

/// Handler de eventos (callback)
pub type EventHandler = Arc<dyn Fn(&LoopEvent) + Send + Sync>;

/// Filtro de eventos
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventFilter {
    /// Todos os eventos
    All,
    /// Ticks bem-sucedidos
    Completed,
    /// Ticks falhos
    Failures,
    /// Escaladas
    Escalation,
    /// Fim do loop
    Lifecycle,
}

impl EventFilter {
    /// Verifica se um evento passa pelo filtro
    pub fn matches(&self, event: &LoopEvent) -> bool {
        matches!(
            (self, event),
            (EventFilter::All, _)
                | (EventFilter::Completed, LoopEvent::TickCompleted { .. })
                | (EventFilter::Failures, LoopEvent::TickFailed { .. })
                | (EventFilter::Escalation, LoopEvent::Escalated { .. })
                | (EventFilter::Lifecycle, LoopEvent::Stopped { .. })
        )
    }
}

/// Bus de eventos
///
/// Clones compartilham handlers e histórico.
#[derive(Clone)]
pub struct EventBus {
    /// Handlers registrados por filtro
    handlers: Arc<Mutex<HashMap<EventFilter, Vec<EventHandler>>>>,
    /// Histórico limitado, mais antigo primeiro
    history: Arc<Mutex<VecDeque<LoopEvent>>>,
    max_history: usize,
}

impl EventBus {
    /// Cria novo bus de eventos
    pub fn new() -> Self {
        Self::with_history(100)
    }

    /// Cria com tamanho de histórico customizado (0 = sem histórico)
    pub fn with_history(max_history: usize) -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
            history: Arc::new(Mutex::new(VecDeque::with_capacity(max_history.min(1024)))),
            max_history,
        }
    }

    /// Registra handler para um filtro
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> OrchestrationResult<()>
    where
        F: Fn(&LoopEvent) + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.lock()?;
        handlers.entry(filter).or_default().push(Arc::new(handler));
        Ok(())
    }

    /// Remove todos os handlers de um filtro
    pub fn unsubscribe(&self, filter: &EventFilter) -> OrchestrationResult<()> {
        let mut handlers = self.handlers.lock()?;
        handlers.remove(filter);
        Ok(())
    }

    /// Emite um evento
    pub fn emit(&self, event: LoopEvent) -> OrchestrationResult<()> {
        if self.max_history > 0 {
            let mut history = self.history.lock()?;
            if history.len() == self.max_history {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        // Handlers rodam fora do lock, então podem usar o próprio bus
        let matching: Vec<EventHandler> = {
            let handlers = self.handlers.lock()?;
            handlers
                .iter()
                .filter(|(filter, _)| filter.matches(&event))
                .flat_map(|(_, list)| list.iter().cloned())
                .collect()
        };

        for handler in matching {
            handler(&event);
        }

        Ok(())
    }

    /// Retorna histórico de eventos
    pub fn history(&self) -> OrchestrationResult<Vec<LoopEvent>> {
        let history = self.history.lock()?;
        Ok(history.iter().cloned().collect())
    }

    /// Limpa histórico
    pub fn clear_history(&self) -> OrchestrationResult<()> {
        let mut history = self.history.lock()?;
        history.clear();
        Ok(())
    }

    /// Conta handlers registrados
    pub fn handler_count(&self) -> OrchestrationResult<usize> {
        let handlers = self.handlers.lock()?;
        Ok(handlers.values().map(|v| v.len()).sum())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("max_history", &self.max_history)
            .field("history_len", &self.history.lock().map(|h| h.len()).unwrap_or(0))
            .finish()
    }
}
