//! Análise de quadro: cor média e luminância percebida

use serde::{Deserialize, Serialize};
use tracing::debug;
use daylight_core::{Color, ImageBuffer, LightMeasurement};
use crate::error::DecodeError;

/// Pesos perceptuais por canal para a luminância
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LuminanceWeights {
    /// ITU-R BT.601: 0.299 R + 0.587 G + 0.114 B
    #[default]
    Rec601,
    /// ITU-R BT.709 (sRGB): 0.2126 R + 0.7152 G + 0.0722 B
    Rec709,
}

impl LuminanceWeights {
    pub const fn weights(self) -> [f64; 3] {
        match self {
            LuminanceWeights::Rec601 => [0.299, 0.587, 0.114],
            LuminanceWeights::Rec709 => [0.2126, 0.7152, 0.0722],
        }
    }

    /// Luminância normalizada [0, 1] de uma média RGB em [0, 255]
    pub fn luminance(self, mean_rgb: [f64; 3]) -> f32 {
        let [wr, wg, wb] = self.weights();
        let y = wr * mean_rgb[0] + wg * mean_rgb[1] + wb * mean_rgb[2];
        (y / 255.0).clamp(0.0, 1.0) as f32
    }
}

/// Configuração do analisador
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub weights: LuminanceWeights,
}

/// Analisador de quadros (sem estado)
///
/// Puro e determinístico: pode ser compartilhado entre threads e chamado em
/// quadros independentes ao mesmo tempo.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameAnalyzer {
    config: AnalyzerConfig,
}

impl FrameAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Converte um quadro em medição de luz
    ///
    /// # Erros
    ///
    /// - [`DecodeError::ZeroDimensions`] se largura ou altura for 0
    /// - [`DecodeError::Empty`] se o buffer não tiver bytes
    /// - [`DecodeError::Malformed`] se o tamanho não bater com dimensões × formato
    pub fn analyze(&self, frame: &ImageBuffer) -> Result<LightMeasurement, DecodeError> {
        validate(frame)?;

        let mean = mean_rgb(frame);
        let luminance = self.config.weights.luminance(mean);
        let average_color = Color::from_f32(mean[0] as f32, mean[1] as f32, mean[2] as f32);

        debug!(
            width = frame.width,
            height = frame.height,
            luminance,
            color = %average_color,
            "frame analyzed"
        );

        Ok(LightMeasurement::captured(luminance, average_color, frame.captured_at))
    }
}

fn validate(frame: &ImageBuffer) -> Result<(), DecodeError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(DecodeError::ZeroDimensions {
            width: frame.width,
            height: frame.height,
        });
    }

    if frame.data.is_empty() {
        return Err(DecodeError::Empty);
    }

    let expected = (frame.width as usize)
        .checked_mul(frame.height as usize)
        .and_then(|n| n.checked_mul(frame.format.bytes_per_pixel()))
        .ok_or(DecodeError::Malformed {
            expected: usize::MAX,
            actual: frame.data.len(),
        })?;

    if frame.data.len() != expected {
        return Err(DecodeError::Malformed {
            expected,
            actual: frame.data.len(),
        });
    }

    Ok(())
}

/// Média por canal; o buffer já foi validado (pixel_count > 0)
fn mean_rgb(frame: &ImageBuffer) -> [f64; 3] {
    let bpp = frame.format.bytes_per_pixel();
    let mut sums = [0u64; 3];

    for px in frame.data.chunks_exact(bpp) {
        let [r, g, b] = frame.format.rgb_of(px);
        sums[0] += r as u64;
        sums[1] += g as u64;
        sums[2] += b as u64;
    }

    let n = frame.pixel_count() as f64;
    [sums[0] as f64 / n, sums[1] as f64 / n, sums[2] as f64 / n]
}
