//! # Estratégias de mapeamento
//!
//! Uma [`MappingStrategy`] transforma uma medição em cor alvo bruta (antes da
//! suavização). A curva é injetada no [`ColorMapper`](crate::ColorMapper),
//! nunca fixada no código do mapeador.
//!
//! ## Curva padrão ([`DaylightCurve`])
//!
//! ```text
//! brilho
//!   max ┤                 ╭──────────  day_color
//!       │               ╱
//!       │             ╱
//!   min ┤──────────╯                   night_color
//!       └─────────┬───────┬──────────▶ luminância
//!              dark    bright
//! ```
//!
//! Abaixo de `dark_luminance` a lâmpada fica na cor noturna (quente) com brilho
//! mínimo; acima de `bright_luminance`, na cor diurna (fria) com brilho máximo;
//! entre os dois, interpolação linear de cor e brilho.

use std::fmt::Debug;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use daylight_core::{Color, LightMeasurement};
use crate::error::{MapperError, MapperResult};

/// Função de transferência medição → cor alvo bruta
///
/// Deve ser pura: mesma medição, mesma cor.
pub trait MappingStrategy: Send + Sync + Debug {
    fn target(&self, measurement: &LightMeasurement) -> Color;

    /// Nome da estratégia
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Parâmetros da curva luminância → cor/brilho
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Luminância a partir da qual a cena deixa de ser "noite"
    pub dark_luminance: f32,
    /// Luminância a partir da qual a cena é "dia pleno"
    pub bright_luminance: f32,
    /// Brilho relativo na noite (0-1)
    pub min_brightness: f32,
    /// Brilho relativo no dia (0-1)
    pub max_brightness: f32,
    /// Cor quente da noite
    pub night_color: Color,
    /// Cor fria do dia
    pub day_color: Color,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            dark_luminance: 0.15,
            bright_luminance: 0.85,
            min_brightness: 0.15,
            max_brightness: 1.0,
            night_color: Color::new(255, 140, 40),
            day_color: Color::new(255, 250, 240),
        }
    }
}

impl CurveConfig {
    pub fn validate(&self) -> MapperResult<()> {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);

        if !in_unit(self.dark_luminance) || !in_unit(self.bright_luminance) {
            return Err(MapperError::InvalidConfig(
                "luminance thresholds must be within [0, 1]".into(),
            ));
        }
        if self.dark_luminance >= self.bright_luminance {
            return Err(MapperError::InvalidConfig(
                "dark_luminance must be less than bright_luminance".into(),
            ));
        }
        if !in_unit(self.min_brightness) || !in_unit(self.max_brightness) {
            return Err(MapperError::InvalidConfig(
                "brightness bounds must be within [0, 1]".into(),
            ));
        }
        if self.min_brightness > self.max_brightness {
            return Err(MapperError::InvalidConfig(
                "min_brightness must not exceed max_brightness".into(),
            ));
        }
        Ok(())
    }

    /// Posição [0, 1] da luminância entre os limiares escuro e claro
    pub fn daylight_fraction(&self, luminance: f32) -> f32 {
        let span = self.bright_luminance - self.dark_luminance;
        ((luminance - self.dark_luminance) / span).clamp(0.0, 1.0)
    }

    pub fn brightness_at(&self, t: f32) -> f32 {
        self.min_brightness + (self.max_brightness - self.min_brightness) * t
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CURVA DIURNA
// ═══════════════════════════════════════════════════════════════════════════════

/// Curva padrão: escuro → quente e fraco, claro → frio e forte
#[derive(Debug, Clone, Default)]
pub struct DaylightCurve {
    curve: CurveConfig,
}

impl DaylightCurve {
    pub fn new(curve: CurveConfig) -> MapperResult<Self> {
        curve.validate()?;
        Ok(Self { curve })
    }

    pub fn curve(&self) -> &CurveConfig {
        &self.curve
    }
}

impl MappingStrategy for DaylightCurve {
    fn target(&self, measurement: &LightMeasurement) -> Color {
        let t = self.curve.daylight_fraction(measurement.luminance());
        self.curve
            .night_color
            .lerp(self.curve.day_color, t)
            .scaled(self.curve.brightness_at(t))
    }

    fn name(&self) -> &'static str {
        "daylight-curve"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TINTA DA CÂMERA
// ═══════════════════════════════════════════════════════════════════════════════

/// Segue o matiz médio da cena, com o brilho dado pela curva
///
/// A cor média é normalizada (canal máximo = 255) e misturada à cor da curva
/// com peso `strength`. Cena totalmente preta não tem matiz e usa só a curva.
#[derive(Debug, Clone)]
pub struct CameraTint {
    curve: CurveConfig,
    strength: f32,
}

impl CameraTint {
    pub fn new(curve: CurveConfig, strength: f32) -> MapperResult<Self> {
        curve.validate()?;
        if !(0.0..=1.0).contains(&strength) {
            return Err(MapperError::InvalidConfig(
                "tint strength must be within [0, 1]".into(),
            ));
        }
        Ok(Self { curve, strength })
    }
}

fn normalized_hue(color: Color) -> Option<Color> {
    let max = color.r.max(color.g).max(color.b);
    if max == 0 {
        return None;
    }
    let k = 255.0 / max as f32;
    Some(Color::from_f32(color.r as f32 * k, color.g as f32 * k, color.b as f32 * k))
}

impl MappingStrategy for CameraTint {
    fn target(&self, measurement: &LightMeasurement) -> Color {
        let t = self.curve.daylight_fraction(measurement.luminance());
        let base = self.curve.night_color.lerp(self.curve.day_color, t);
        let hue = match normalized_hue(measurement.average_color()) {
            Some(hue) => base.lerp(hue, self.strength),
            None => base,
        };
        hue.scaled(self.curve.brightness_at(t))
    }

    fn name(&self) -> &'static str {
        "camera-tint"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SELEÇÃO POR CONFIGURAÇÃO
// ═══════════════════════════════════════════════════════════════════════════════

/// Estratégia selecionável por configuração
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    DaylightCurve,
    CameraTint,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::DaylightCurve => "daylight-curve",
            StrategyKind::CameraTint => "camera-tint",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daylight-curve" | "daylight" | "curve" => Ok(StrategyKind::DaylightCurve),
            "camera-tint" | "tint" | "camera-average" => Ok(StrategyKind::CameraTint),
            other => Err(MapperError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Constrói a estratégia selecionada
pub fn build_strategy(
    kind: StrategyKind,
    curve: CurveConfig,
    tint_strength: f32,
) -> MapperResult<Box<dyn MappingStrategy>> {
    Ok(match kind {
        StrategyKind::DaylightCurve => Box::new(DaylightCurve::new(curve)?),
        StrategyKind::CameraTint => Box::new(CameraTint::new(curve, tint_strength)?),
    })
}
