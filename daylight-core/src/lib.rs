//! # 🌅 daylight-core: Tipos e Interfaces do Núcleo
//!
//! Tipos valor e interfaces de capacidade compartilhados por todo o workspace
//! Daylight, que acompanha a luz do dia vista por uma câmera e a reproduz numa
//! lâmpada RGB de rede.
//!
//! ## Fluxo por tick
//!
//! ```text
//! CameraSource ──ImageBuffer──▶ FrameAnalyzer ──LightMeasurement──▶ ColorMapper
//!                                                                      │
//!                                 LampDevice ◀──Color── LampActuator ◀─┘
//! ```
//!
//! Este crate define apenas as bordas: [`Color`], [`LightMeasurement`],
//! [`ImageBuffer`], os traits [`CameraSource`] e [`LampDevice`], e os
//! adaptadores com deadline ([`BoundedCamera`], [`BoundedLamp`]).

pub mod color;
pub mod deadline;
pub mod error;
pub mod frame;
pub mod measurement;
pub mod traits;

pub use color::{Channel, Color};
pub use deadline::{BoundedCamera, BoundedLamp, DeadlineError, DeadlineWorker};
pub use error::{CaptureError, ColorParseError, LampError, LampErrorKind};
pub use frame::{ImageBuffer, PixelFormat};
pub use measurement::LightMeasurement;
pub use traits::{CameraSource, LampDevice, ThreadWaiter, WaitOutcome, Waiter};

/// Prelude com os tipos mais usados
pub mod prelude {
    pub use crate::color::{Channel, Color};
    pub use crate::error::{CaptureError, LampError, LampErrorKind};
    pub use crate::frame::{ImageBuffer, PixelFormat};
    pub use crate::measurement::LightMeasurement;
    pub use crate::traits::{CameraSource, LampDevice, WaitOutcome, Waiter};
}
