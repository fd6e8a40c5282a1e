//! Configuração agregada do Daylight
//!
//! Carregada de TOML, depois sobrescrita por variáveis `DAYLIGHT_*` (o `.env`
//! é lido uma vez, na primeira consulta ao ambiente).
//!
//! ```toml
//! [capture]
//! timeout_ms = 10000
//! weights = "rec601"
//!
//! [lamp]
//! timeout_ms = 2000
//! retry = { max_attempts = 3, base_delay_ms = 200, max_delay_ms = 2000 }
//!
//! [mapping]
//! alpha = 0.35
//! tolerance = 2
//! strategy = "daylight-curve"
//!
//! [control]
//! interval_ms = 5000
//! ```

use std::env;
use std::path::Path;
use std::time::Duration;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use daylight_actuator::BackoffPolicy;
use daylight_mapper::{MapperConfig, StrategyKind};
use daylight_photonic::{AnalyzerConfig, LuminanceWeights, SyntheticConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::scheduler::SchedulerConfig;

static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

#[inline]
fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

/// Seção `[capture]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSection {
    /// Deadline de cada captura (ms)
    pub timeout_ms: u64,
    pub weights: LuminanceWeights,
    /// Câmera sintética usada pelo binário sem hardware
    pub synthetic: SyntheticConfig,
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            weights: LuminanceWeights::default(),
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl CaptureSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn analyzer(&self) -> AnalyzerConfig {
        AnalyzerConfig { weights: self.weights }
    }
}

/// Seção `[lamp]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampSection {
    /// Deadline de cada escrita (ms)
    pub timeout_ms: u64,
    pub retry: BackoffPolicy,
}

impl Default for LampSection {
    fn default() -> Self {
        Self {
            timeout_ms: 2_000,
            retry: BackoffPolicy::default(),
        }
    }
}

impl LampSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Seção `[control]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    #[serde(flatten)]
    pub schedule: SchedulerConfig,
    /// Encerra após N ticks (None = até o stop)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u64>,
    /// Capturas fatais seguidas até escalar
    pub fatal_escalation_threshold: u32,
    /// Parar o loop ao escalar
    pub halt_on_escalation: bool,
    /// Prazo para o loop terminar após o stop (ms)
    pub shutdown_grace_ms: u64,
    /// Eventos mantidos no histórico do bus
    pub event_history: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            schedule: SchedulerConfig::default(),
            max_ticks: None,
            fatal_escalation_threshold: 5,
            halt_on_escalation: false,
            shutdown_grace_ms: 3_000,
            event_history: 256,
        }
    }
}

impl ControlConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.schedule.validate()?;
        if self.fatal_escalation_threshold == 0 {
            return Err(ConfigError::Invalid(
                "fatal_escalation_threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuração completa
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaylightConfig {
    pub capture: CaptureSection,
    pub lamp: LampSection,
    pub mapping: MapperConfig,
    pub control: ControlConfig,
}

impl DaylightConfig {
    /// Lê TOML (seções ausentes ficam com o padrão)
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Arquivo (se houver) → ambiente → validação
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Aplica `DAYLIGHT_*` do processo (e do `.env`)
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        ensure_loaded();
        self.apply_env_with(|key| env::var(key).ok())
    }

    /// Aplica overrides vindos de `lookup`
    ///
    /// | Variável | Campo |
    /// |:--|:--|
    /// | `DAYLIGHT_INTERVAL_MS` | `control.interval_ms` |
    /// | `DAYLIGHT_MAX_TICKS` | `control.max_ticks` |
    /// | `DAYLIGHT_CAPTURE_TIMEOUT_MS` | `capture.timeout_ms` |
    /// | `DAYLIGHT_LAMP_TIMEOUT_MS` | `lamp.timeout_ms` |
    /// | `DAYLIGHT_MAX_ATTEMPTS` | `lamp.retry.max_attempts` |
    /// | `DAYLIGHT_BACKOFF_BASE_MS` | `lamp.retry.base_delay_ms` |
    /// | `DAYLIGHT_BACKOFF_CAP_MS` | `lamp.retry.max_delay_ms` |
    /// | `DAYLIGHT_ALPHA` | `mapping.alpha` |
    /// | `DAYLIGHT_TOLERANCE` | `mapping.tolerance` |
    /// | `DAYLIGHT_STRATEGY` | `mapping.strategy` |
    pub fn apply_env_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, "DAYLIGHT_INTERVAL_MS")? {
            self.control.schedule.interval_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DAYLIGHT_MAX_TICKS")? {
            self.control.max_ticks = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "DAYLIGHT_CAPTURE_TIMEOUT_MS")? {
            self.capture.timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DAYLIGHT_LAMP_TIMEOUT_MS")? {
            self.lamp.timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DAYLIGHT_MAX_ATTEMPTS")? {
            self.lamp.retry.max_attempts = v;
        }
        if let Some(v) = parse_var(&lookup, "DAYLIGHT_BACKOFF_BASE_MS")? {
            self.lamp.retry.base_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DAYLIGHT_BACKOFF_CAP_MS")? {
            self.lamp.retry.max_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DAYLIGHT_ALPHA")? {
            self.mapping.alpha = v;
        }
        if let Some(v) = parse_var(&lookup, "DAYLIGHT_TOLERANCE")? {
            self.mapping.tolerance = v;
        }
        if let Some(v) = parse_var::<StrategyKind, _>(&lookup, "DAYLIGHT_STRATEGY")? {
            self.mapping.strategy = v;
        }
        Ok(())
    }

    /// Rejeita combinações que o loop não consegue executar
    pub fn validate(&self) -> ConfigResult<()> {
        if self.capture.timeout_ms == 0 {
            return Err(ConfigError::Invalid("capture.timeout_ms must be > 0".into()));
        }
        if self.lamp.timeout_ms == 0 {
            return Err(ConfigError::Invalid("lamp.timeout_ms must be > 0".into()));
        }
        self.lamp.retry.validate()?;
        self.mapping.validate()?;
        self.control.validate()?;
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> ConfigResult<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| ConfigError::Env {
            key: key.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use daylight_core::Color;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DaylightConfig::default();
        assert_eq!(config.control.schedule.interval_ms, 5000);
        assert_eq!(config.capture.timeout_ms, 10_000);
        assert_eq!(config.lamp.timeout_ms, 2_000);
        assert_eq!(config.lamp.retry, BackoffPolicy::new(3, 200, 2000).unwrap());
        assert_eq!(config.mapping.alpha, 0.35);
        assert_eq!(config.mapping.tolerance, 2);
        assert_eq!(config.mapping.strategy, StrategyKind::DaylightCurve);
        assert_eq!(config.control.fatal_escalation_threshold, 5);
        assert!(!config.control.halt_on_escalation);
        assert_eq!(config.control.shutdown_grace(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = DaylightConfig::from_toml_str("").unwrap();
        assert_eq!(config, DaylightConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = DaylightConfig::from_toml_str(
            r#"
            [capture]
            weights = "rec709"

            [lamp.retry]
            max_attempts = 5

            [mapping]
            alpha = 0.5
            strategy = "camera-tint"
            initial_color = { r = 10, g = 20, b = 30 }

            [mapping.curve]
            dark_luminance = 0.2

            [control]
            interval_ms = 250
            max_ticks = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.capture.weights, LuminanceWeights::Rec709);
        assert_eq!(config.capture.timeout_ms, 10_000);
        assert_eq!(config.lamp.retry.max_attempts, 5);
        assert_eq!(config.lamp.retry.base_delay_ms, 200);
        assert_eq!(config.mapping.alpha, 0.5);
        assert_eq!(config.mapping.strategy, StrategyKind::CameraTint);
        assert_eq!(config.mapping.initial_color, Color::new(10, 20, 30));
        assert_eq!(config.mapping.curve.dark_luminance, 0.2);
        assert_eq!(config.mapping.curve.bright_luminance, 0.85);
        assert_eq!(config.control.schedule.interval_ms, 250);
        assert_eq!(config.control.max_ticks, Some(12));
    }

    #[test]
    fn test_invalid_toml() {
        let err = DaylightConfig::from_toml_str("[control]\ninterval_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = DaylightConfig::default();
        config.control.max_ticks = Some(3);
        config.mapping.strategy = StrategyKind::CameraTint;

        let text = config.to_toml_string().unwrap();
        assert_eq!(DaylightConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[control]\ninterval_ms = 1000").unwrap();

        let config = DaylightConfig::from_file(file.path()).unwrap();
        assert_eq!(config.control.schedule.interval_ms, 1000);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DaylightConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DaylightConfig::default();
        config
            .apply_env_with(lookup(&[
                ("DAYLIGHT_INTERVAL_MS", "750"),
                ("DAYLIGHT_MAX_TICKS", "4"),
                ("DAYLIGHT_MAX_ATTEMPTS", "6"),
                ("DAYLIGHT_BACKOFF_CAP_MS", "900"),
                ("DAYLIGHT_ALPHA", " 0.8 "),
                ("DAYLIGHT_STRATEGY", "tint"),
            ]))
            .unwrap();

        assert_eq!(config.control.schedule.interval_ms, 750);
        assert_eq!(config.control.max_ticks, Some(4));
        assert_eq!(config.lamp.retry.max_attempts, 6);
        assert_eq!(config.lamp.retry.max_delay_ms, 900);
        assert_eq!(config.mapping.alpha, 0.8);
        assert_eq!(config.mapping.strategy, StrategyKind::CameraTint);
        // Intocados
        assert_eq!(config.lamp.timeout_ms, 2_000);
    }

    #[test]
    fn test_env_bad_value() {
        let mut config = DaylightConfig::default();
        let err = config
            .apply_env_with(lookup(&[("DAYLIGHT_TOLERANCE", "300")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Env {
                key: "DAYLIGHT_TOLERANCE".into(),
                value: "300".into(),
            }
        );
    }

    fn assert_rejected(case: &str, mutate: impl FnOnce(&mut DaylightConfig)) {
        let mut config = DaylightConfig::default();
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(ConfigError::Invalid(_))),
            "{case} should be rejected"
        );
    }

    #[test]
    fn test_validation_rejects() {
        assert_rejected("zero interval", |c| c.control.schedule.interval_ms = 0);
        assert_rejected("zero alpha", |c| c.mapping.alpha = 0.0);
        assert_rejected("alpha above one", |c| c.mapping.alpha = 1.5);
        assert_rejected("zero attempts", |c| c.lamp.retry.max_attempts = 0);
        assert_rejected("base above cap", |c| c.lamp.retry.base_delay_ms = 5000);
        assert_rejected("zero capture timeout", |c| c.capture.timeout_ms = 0);
        assert_rejected("zero lamp timeout", |c| c.lamp.timeout_ms = 0);
        assert_rejected("dark above bright", |c| c.mapping.curve.dark_luminance = 0.9);
        assert_rejected("zero escalation", |c| c.control.fatal_escalation_threshold = 0);
    }

    #[test]
    fn test_load_without_file() {
        let config = DaylightConfig::load(None).unwrap();
        assert!(config.validate().is_ok());
    }
}
