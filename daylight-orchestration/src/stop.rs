//! Cancelamento cooperativo
//!
//! [`StopHandle::stop`] derruba o único `Sender` do canal; todo
//! [`StopSignal`] passa a ver `Disconnected` para sempre, o que acorda
//! esperas em andamento e faz as seguintes retornarem na hora. Descartar
//! todos os handles tem o mesmo efeito nas esperas.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use daylight_core::{WaitOutcome, Waiter};

/// Cria um par handle/sinal ligados
pub fn stop_pair() -> (StopHandle, StopSignal) {
    let (tx, rx) = crossbeam_channel::bounded::<()>(0);
    let flag = Arc::new(AtomicBool::new(false));

    let handle = StopHandle {
        sender: Arc::new(Mutex::new(Some(tx))),
        flag: flag.clone(),
    };
    let signal = StopSignal { receiver: rx, flag };
    (handle, signal)
}

/// Lado do host: pede a parada
#[derive(Debug, Clone)]
pub struct StopHandle {
    sender: Arc<Mutex<Option<Sender<()>>>>,
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Pede a parada (idempotente)
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let mut sender = self.sender.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sender.take();
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Lado do loop: observa a parada e faz esperas interrompíveis
#[derive(Debug, Clone)]
pub struct StopSignal {
    receiver: Receiver<()>,
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Waiter for StopSignal {
    fn wait(&self, duration: Duration) -> WaitOutcome {
        if self.is_stopped() {
            return WaitOutcome::Cancelled;
        }
        if duration.is_zero() {
            return WaitOutcome::Elapsed;
        }
        match self.receiver.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => WaitOutcome::Elapsed,
            // Nada é enviado no canal; qualquer outro retorno é desconexão
            _ => WaitOutcome::Cancelled,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.is_stopped()
    }
}
