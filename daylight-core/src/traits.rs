//! # Interfaces de capacidade
//!
//! O núcleo consome duas capacidades externas, injetadas na construção:
//!
//! | Trait | Papel | Implementações concretas |
//! |:------|:------|:-------------------------|
//! | [`CameraSource`] | Entrega quadros decodificados | RTSP/ffmpeg, dispositivo local |
//! | [`LampDevice`] | Escreve uma cor na lâmpada | Tuya, Yeelight |
//!
//! Os transportes concretos ficam fora do núcleo; testes usam fakes.

use std::fmt::Debug;
use std::time::Duration;
use crate::color::Color;
use crate::error::{CaptureError, LampError};
use crate::frame::ImageBuffer;

// ═══════════════════════════════════════════════════════════════════════════════
// CÂMERA
// ═══════════════════════════════════════════════════════════════════════════════

/// Fonte de quadros de câmera
///
/// # Exemplo
///
/// ```
/// use daylight_core::{CameraSource, CaptureError, ImageBuffer};
///
/// #[derive(Debug)]
/// struct GrayCamera;
///
/// impl CameraSource for GrayCamera {
///     fn fetch_frame(&mut self) -> Result<ImageBuffer, CaptureError> {
///         Ok(ImageBuffer::uniform(2, 2, [128, 128, 128]))
///     }
/// }
/// ```
pub trait CameraSource: Send + Debug {
    /// Captura um quadro (pode bloquear)
    fn fetch_frame(&mut self) -> Result<ImageBuffer, CaptureError>;

    /// Nome para logs
    fn name(&self) -> &str {
        "camera"
    }
}

impl<T: CameraSource + ?Sized> CameraSource for Box<T> {
    fn fetch_frame(&mut self) -> Result<ImageBuffer, CaptureError> {
        (**self).fetch_frame()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LÂMPADA
// ═══════════════════════════════════════════════════════════════════════════════

/// Lâmpada RGB endereçável pela rede
pub trait LampDevice: Send + Debug {
    /// Aplica a cor (pode bloquear)
    fn set_color(&mut self, color: Color) -> Result<(), LampError>;

    /// Nome para logs
    fn name(&self) -> &str {
        "lamp"
    }
}

impl<T: LampDevice + ?Sized> LampDevice for Box<T> {
    fn set_color(&mut self, color: Color) -> Result<(), LampError> {
        (**self).set_color(color)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ESPERA CANCELÁVEL
// ═══════════════════════════════════════════════════════════════════════════════

/// Resultado de uma espera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// O tempo passou normalmente
    Elapsed,
    /// Um pedido de parada interrompeu a espera
    Cancelled,
}

/// Espera que pode ser interrompida (backoff, cadência)
pub trait Waiter {
    fn wait(&self, duration: Duration) -> WaitOutcome;

    /// Já foi pedido cancelamento?
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Espera com `thread::sleep`, nunca cancelada
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadWaiter;

impl Waiter for ThreadWaiter {
    fn wait(&self, duration: Duration) -> WaitOutcome {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
        WaitOutcome::Elapsed
    }
}
