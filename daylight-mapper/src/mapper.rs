//! Mapeador medição → cor com suavização exponencial

use std::fmt;
use serde::{Deserialize, Serialize};
use tracing::debug;
use daylight_core::{Color, LightMeasurement};
use crate::error::{MapperError, MapperResult};
use crate::strategy::{build_strategy, CurveConfig, MappingStrategy, StrategyKind};

/// Configuração do mapeador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Fator de suavização em (0, 1]; 1 = sem suavização
    pub alpha: f32,
    /// Diferença por canal abaixo da qual a cor anterior é mantida
    pub tolerance: u8,
    /// Curva usada para o alvo bruto
    pub strategy: StrategyKind,
    pub curve: CurveConfig,
    /// Peso do matiz da câmera (apenas `camera-tint`)
    pub tint_strength: f32,
    /// Cor "anterior" antes do primeiro tick
    pub initial_color: Color,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            alpha: 0.35,
            tolerance: 2,
            strategy: StrategyKind::DaylightCurve,
            curve: CurveConfig::default(),
            tint_strength: 0.5,
            initial_color: Color::BLACK,
        }
    }
}

impl MapperConfig {
    pub fn validate(&self) -> MapperResult<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(MapperError::InvalidConfig(format!(
                "alpha must be within (0, 1], got {}",
                self.alpha
            )));
        }
        self.curve.validate()
    }
}

/// Estado de suavização: última cor emitida e contador de ticks
///
/// Pertence exclusivamente ao [`ColorMapper`] que o criou.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingState {
    last: Color,
    ticks: u64,
}

impl MappingState {
    pub fn last(&self) -> Color {
        self.last
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Converte medições em cor alvo, amortecida contra a cor anterior
///
/// `map` é pura sobre seus argumentos; `advance` é o passo com estado usado
/// pelo loop de controle.
pub struct ColorMapper {
    strategy: Box<dyn MappingStrategy>,
    alpha: f32,
    tolerance: u8,
    state: MappingState,
}

impl fmt::Debug for ColorMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorMapper")
            .field("strategy", &self.strategy.name())
            .field("alpha", &self.alpha)
            .field("tolerance", &self.tolerance)
            .field("state", &self.state)
            .finish()
    }
}

impl ColorMapper {
    /// Cria mapeador com a estratégia selecionada na configuração
    pub fn new(config: MapperConfig) -> MapperResult<Self> {
        let strategy = build_strategy(config.strategy, config.curve, config.tint_strength)?;
        Self::with_strategy(strategy, config)
    }

    /// Cria mapeador com estratégia injetada (ignora `config.strategy`)
    pub fn with_strategy(strategy: Box<dyn MappingStrategy>, config: MapperConfig) -> MapperResult<Self> {
        config.validate()?;

        Ok(Self {
            strategy,
            alpha: config.alpha,
            tolerance: config.tolerance,
            state: MappingState {
                last: config.initial_color,
                ticks: 0,
            },
        })
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn state(&self) -> &MappingState {
        &self.state
    }

    /// Cor alvo bruta (sem suavização)
    pub fn raw_target(&self, measurement: &LightMeasurement) -> Color {
        self.strategy.target(measurement)
    }

    /// Próxima cor para `measurement`, partindo de `previous`
    ///
    /// Se o alvo bruto estiver dentro da tolerância de `previous`, devolve
    /// `previous` inalterada (evita escritas redundantes na lâmpada).
    pub fn map(&self, measurement: &LightMeasurement, previous: Color) -> Color {
        let raw = self.raw_target(measurement);

        if raw.within_tolerance(previous, self.tolerance) {
            return previous;
        }

        smooth(previous, raw, self.alpha)
    }

    /// Mapeia contra a última cor emitida e atualiza o estado
    pub fn advance(&mut self, measurement: &LightMeasurement) -> Color {
        let next = self.map(measurement, self.state.last);

        debug!(
            tick = self.state.ticks,
            luminance = measurement.luminance(),
            previous = %self.state.last,
            next = %next,
            "color mapped"
        );

        self.state.last = next;
        self.state.ticks += 1;
        next
    }
}

/// `previous + alpha * (raw - previous)` por canal
///
/// Nunca ultrapassa `raw`. Quando o passo arredondado seria zero, anda uma
/// unidade na direção do alvo para não estacionar fora da tolerância.
pub fn smooth(previous: Color, raw: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);

    let step = |p: u8, r: u8| -> u8 {
        let delta = r as i16 - p as i16;
        if delta == 0 {
            return p;
        }
        let mut s = (alpha * delta as f32).round() as i16;
        if s == 0 {
            s = delta.signum();
        }
        (p as i16 + s) as u8
    };

    Color::new(
        step(previous.r, raw.r),
        step(previous.g, raw.g),
        step(previous.b, raw.b),
    )
}
