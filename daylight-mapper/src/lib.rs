//! # 🎨 daylight-mapper: Luminância → Cor Alvo
//!
//! Converte uma [`LightMeasurement`] em [`Color`] para a lâmpada em duas etapas:
//!
//! 1. **Alvo bruto**: uma [`MappingStrategy`] injetada (curva diurna por padrão)
//! 2. **Suavização**: `next = previous + alpha · (raw − previous)` por canal
//!
//! Se o alvo bruto estiver a menos de `tolerance` da cor anterior em todos os
//! canais, a cor anterior é mantida e nenhuma escrita nova é provocada.
//!
//! ## Exemplo
//!
//! ```
//! use daylight_mapper::{ColorMapper, MapperConfig};
//! use daylight_core::{Color, LightMeasurement};
//!
//! let mapper = ColorMapper::new(MapperConfig::default()).unwrap();
//! let night = LightMeasurement::new(0.1, Color::new(20, 20, 30));
//! let day = LightMeasurement::new(0.9, Color::new(220, 220, 200));
//!
//! let dim = mapper.raw_target(&night);
//! let bright = mapper.raw_target(&day);
//! assert!(dim.brightness_sum() < bright.brightness_sum());
//! ```

pub mod error;
pub mod mapper;
pub mod strategy;

pub use error::{MapperError, MapperResult};
pub use mapper::{smooth, ColorMapper, MapperConfig, MappingState};
pub use strategy::{build_strategy, CameraTint, CurveConfig, DaylightCurve, MappingStrategy, StrategyKind};

pub use daylight_core::{Color, LightMeasurement};
