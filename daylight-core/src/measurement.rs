//! Medição de luz ambiente extraída de um quadro

use std::time::SystemTime;
use serde::{Deserialize, Serialize};
use crate::color::{Channel, Color};

/// Medição de luz (luminância + cor média) de um único quadro
///
/// Imutável: luminância e cor média são sempre calculadas juntas, a partir do
/// mesmo quadro, e só podem ser lidas depois de construídas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightMeasurement {
    luminance: f32,
    average_color: Color,
    dominant_channel: Channel,
    captured_at: SystemTime,
}

impl LightMeasurement {
    /// Cria medição com timestamp atual
    pub fn new(luminance: f32, average_color: Color) -> Self {
        Self::captured(luminance, average_color, SystemTime::now())
    }

    /// Cria medição com timestamp do quadro de origem
    ///
    /// Luminância fora de [0, 1] é saturada; NaN vira 0.
    pub fn captured(luminance: f32, average_color: Color, captured_at: SystemTime) -> Self {
        let luminance = if luminance.is_nan() {
            0.0
        } else {
            luminance.clamp(0.0, 1.0)
        };

        Self {
            luminance,
            average_color,
            dominant_channel: average_color.dominant_channel(),
            captured_at,
        }
    }

    /// Luminância normalizada [0, 1]
    pub fn luminance(&self) -> f32 {
        self.luminance
    }

    pub fn average_color(&self) -> Color {
        self.average_color
    }

    pub fn dominant_channel(&self) -> Channel {
        self.dominant_channel
    }

    pub fn captured_at(&self) -> SystemTime {
        self.captured_at
    }
}
