//! # 💡 daylight-actuator: Atuação na Lâmpada
//!
//! Escreve cores numa [`LampDevice`] apesar de um link de rede instável.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              LampActuator                │
//! │  ┌────────────┐   ┌───────────────────┐  │
//! │  │ cache da   │   │  BackoffPolicy    │  │
//! │  │ última cor │   │ base·2^(n-1), teto│  │
//! │  └────────────┘   └───────────────────┘  │
//! └──────────────────────────────────────────┘
//!                     ↓
//!          LampDevice (Tuya, Yeelight, ...)
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use daylight_actuator::{BackoffPolicy, LampActuator, SimulatedLamp};
//! use daylight_core::{Color, LampError};
//!
//! let lamp = SimulatedLamp::new();
//! lamp.fail_next(LampError::Connection("reset by peer".into()));
//!
//! let mut actuator = LampActuator::with_policy(lamp.clone(), BackoffPolicy::immediate(3)).unwrap();
//! let result = actuator.apply(Color::new(255, 140, 40));
//!
//! assert!(result.applied);
//! assert_eq!(result.attempt, 2);
//! assert_eq!(lamp.current(), Some(Color::new(255, 140, 40)));
//! ```

pub mod actuator;
pub mod backoff;
pub mod error;
pub mod simulated;
pub mod types;

pub use actuator::LampActuator;
pub use backoff::BackoffPolicy;
pub use error::{ActuatorError, ActuatorResult};
pub use simulated::SimulatedLamp;
pub use types::{ActuationResult, ActuatorStats};
