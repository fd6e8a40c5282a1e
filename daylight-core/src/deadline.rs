//! # Chamadas com deadline
//!
//! Transportes de câmera e lâmpada podem travar. [`DeadlineWorker`] move o alvo
//! para uma thread dedicada e cada chamada espera a resposta até um deadline;
//! se o deadline passa, a chamada devolve erro e o loop segue.
//!
//! ```text
//!   loop ──job──▶ [worker thread] ── alvo.fetch_frame() ──┐
//!     ▲                                                  │
//!     └───────── resposta (ou Elapsed no deadline) ◀─────┘
//! ```
//!
//! Uma chamada travada continua ocupando a worker; as chamadas seguintes
//! falham com [`DeadlineError::Busy`] até ela retornar.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use crossbeam_channel::{Sender, RecvTimeoutError, SendTimeoutError};
use thiserror::Error;
use crate::color::Color;
use crate::error::{CaptureError, LampError};
use crate::frame::ImageBuffer;
use crate::traits::{CameraSource, LampDevice};

type Job<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Falha de uma chamada com deadline
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeadlineError {
    #[error("Call did not finish within {0:?}")]
    Elapsed(Duration),

    #[error("Previous call still in flight")]
    Busy,

    #[error("Worker thread is gone")]
    WorkerGone,
}

/// Thread dona de `T` que executa chamadas com deadline
pub struct DeadlineWorker<T> {
    jobs: Sender<Job<T>>,
    timeout: Duration,
}

impl<T> fmt::Debug for DeadlineWorker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeadlineWorker")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<T: Send + 'static> DeadlineWorker<T> {
    /// Move `target` para uma nova thread
    pub fn spawn(name: &str, mut target: T, timeout: Duration) -> std::io::Result<Self> {
        // Capacidade zero: um job só é aceito quando a worker está livre
        let (jobs, rx) = crossbeam_channel::bounded::<Job<T>>(0);

        thread::Builder::new()
            .name(format!("{name}-worker"))
            .spawn(move || {
                for job in rx.iter() {
                    job(&mut target);
                }
            })?;

        Ok(Self { jobs, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Executa `f` na worker e espera o resultado até o deadline
    pub fn call<R, F>(&self, f: F) -> Result<R, DeadlineError>
    where
        R: Send + 'static,
        F: FnOnce(&mut T) -> R + Send + 'static,
    {
        let deadline = Instant::now() + self.timeout;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);

        let job: Job<T> = Box::new(move |target| {
            // O chamador pode ter desistido; resposta descartada nesse caso
            let _ = reply_tx.send(f(target));
        });

        match self.jobs.send_deadline(job, deadline) {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(_)) => return Err(DeadlineError::Busy),
            Err(SendTimeoutError::Disconnected(_)) => return Err(DeadlineError::WorkerGone),
        }

        match reply_rx.recv_deadline(deadline) {
            Ok(result) => Ok(result),
            Err(RecvTimeoutError::Timeout) => Err(DeadlineError::Elapsed(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(DeadlineError::WorkerGone),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADAPTADORES
// ═══════════════════════════════════════════════════════════════════════════════

/// Câmera cujas capturas respeitam um timeout
///
/// Timeout e worker ocupada viram [`CaptureError::Transient`]; worker morta
/// (o transporte entrou em pânico) vira [`CaptureError::Fatal`].
#[derive(Debug)]
pub struct BoundedCamera<C> {
    worker: DeadlineWorker<C>,
    name: String,
}

impl<C: CameraSource + 'static> BoundedCamera<C> {
    pub fn new(camera: C, timeout: Duration) -> std::io::Result<Self> {
        let name = camera.name().to_string();
        let worker = DeadlineWorker::spawn(&name, camera, timeout)?;
        Ok(Self { worker, name })
    }
}

impl<C: CameraSource + 'static> CameraSource for BoundedCamera<C> {
    fn fetch_frame(&mut self) -> Result<ImageBuffer, CaptureError> {
        match self.worker.call(|camera: &mut C| camera.fetch_frame()) {
            Ok(result) => result,
            Err(DeadlineError::Elapsed(after)) => Err(CaptureError::Transient(format!(
                "frame fetch timed out after {}ms",
                after.as_millis()
            ))),
            Err(DeadlineError::Busy) => Err(CaptureError::transient("previous frame fetch still in flight")),
            Err(DeadlineError::WorkerGone) => Err(CaptureError::fatal("camera worker terminated")),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Lâmpada cujas escritas respeitam um timeout
///
/// Timeout e worker ocupada viram [`LampError::Timeout`], que o atuador trata
/// como falha transitória.
#[derive(Debug)]
pub struct BoundedLamp<D> {
    worker: DeadlineWorker<D>,
    name: String,
}

impl<D: LampDevice + 'static> BoundedLamp<D> {
    pub fn new(lamp: D, timeout: Duration) -> std::io::Result<Self> {
        let name = lamp.name().to_string();
        let worker = DeadlineWorker::spawn(&name, lamp, timeout)?;
        Ok(Self { worker, name })
    }
}

impl<D: LampDevice + 'static> LampDevice for BoundedLamp<D> {
    fn set_color(&mut self, color: Color) -> Result<(), LampError> {
        let timeout_ms = self.worker.timeout().as_millis() as u64;
        match self.worker.call(move |lamp: &mut D| lamp.set_color(color)) {
            Ok(result) => result,
            Err(DeadlineError::Elapsed(_)) | Err(DeadlineError::Busy) => Err(LampError::Timeout(timeout_ms)),
            Err(DeadlineError::WorkerGone) => Err(LampError::Connection("lamp worker terminated".into())),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct SlowCamera {
        delay: Duration,
    }

    impl CameraSource for SlowCamera {
        fn fetch_frame(&mut self) -> Result<ImageBuffer, CaptureError> {
            thread::sleep(self.delay);
            Ok(ImageBuffer::uniform(1, 1, [1, 2, 3]))
        }
    }

    #[derive(Debug, Default)]
    struct RecordingLamp {
        writes: Arc<Mutex<Vec<Color>>>,
    }

    impl LampDevice for RecordingLamp {
        fn set_color(&mut self, color: Color) -> Result<(), LampError> {
            self.writes.lock().unwrap().push(color);
            Ok(())
        }
    }

    #[test]
    fn test_worker_returns_result() {
        let worker = DeadlineWorker::spawn("counter", 0u32, Duration::from_secs(1)).unwrap();
        let value = worker.call(|n: &mut u32| {
            *n += 5;
            *n
        });
        assert_eq!(value, Ok(5));
        assert_eq!(worker.call(|n: &mut u32| *n), Ok(5));
    }

    #[test]
    fn test_fast_camera_passes_through() {
        let mut camera = BoundedCamera::new(
            SlowCamera { delay: Duration::ZERO },
            Duration::from_millis(500),
        )
        .unwrap();
        let frame = camera.fetch_frame().unwrap();
        assert_eq!(frame.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_hung_camera_times_out_as_transient() {
        let mut camera = BoundedCamera::new(
            SlowCamera { delay: Duration::from_millis(300) },
            Duration::from_millis(20),
        )
        .unwrap();

        let start = Instant::now();
        let err = camera.fetch_frame().unwrap_err();
        assert!(!err.is_fatal());
        assert!(start.elapsed() < Duration::from_millis(250));

        // Worker ainda presa na chamada anterior
        let err = camera.fetch_frame().unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_bounded_lamp_forwards_writes() {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let lamp = RecordingLamp { writes: writes.clone() };
        let mut bounded = BoundedLamp::new(lamp, Duration::from_millis(500)).unwrap();

        bounded.set_color(Color::new(1, 2, 3)).unwrap();
        assert_eq!(*writes.lock().unwrap(), vec![Color::new(1, 2, 3)]);
        assert_eq!(bounded.name(), "lamp");
    }
}
