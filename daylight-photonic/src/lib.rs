//! # 📷 daylight-photonic: Percepção Fotônica
//!
//! Converte quadros de câmera em [`LightMeasurement`]: cor média por canal e
//! luminância perceptual normalizada.
//!
//! ## Algoritmo
//!
//! 1. Valida o quadro (dimensões > 0, buffer não vazio, tamanho consistente)
//! 2. Soma cada canal em `u64` e divide pelo número de pixels
//! 3. Luminância = `wr·R + wg·G + wb·B` sobre a média, dividida por 255
//!
//! ## Exemplo
//!
//! ```
//! use daylight_photonic::FrameAnalyzer;
//! use daylight_core::{Color, ImageBuffer};
//!
//! let frame = ImageBuffer::uniform(4, 4, [20, 20, 30]);
//! let m = FrameAnalyzer::new().analyze(&frame).unwrap();
//! assert_eq!(m.average_color(), Color::new(20, 20, 30));
//! ```

pub mod analyzer;
pub mod error;
pub mod synthetic;

pub use analyzer::{AnalyzerConfig, FrameAnalyzer, LuminanceWeights};
pub use error::{DecodeError, PhotonicError, PhotonicResult};
pub use synthetic::{SyntheticCamera, SyntheticConfig};

// Re-export core types
pub use daylight_core::prelude::*;
