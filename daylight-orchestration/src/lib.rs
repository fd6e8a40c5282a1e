//! # 🎭 daylight-orchestration — Loop de Controle
//!
//! Liga câmera, análise, mapeamento e lâmpada num loop de cadência fixa que
//! sobrevive a qualquer falha de tick.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ControlLoop                             │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │  Idle → Sampling → Analyzing → Mapping → Actuating    │  │
//! │  │  CameraSource → FrameAnalyzer → ColorMapper → Lamp    │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐   │
//! │  │ TickScheduler│  │ StatusHandle │  │ EventBus         │   │
//! │  │ anchor + n·T │  │ LoopStatus   │  │ Completed|Failed │   │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!            ▲ stop()                       ▲ status()
//!            └──────────── host ────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use daylight_actuator::SimulatedLamp;
//! use daylight_orchestration::{ControlLoop, DaylightConfig, StopReason};
//! use daylight_photonic::SyntheticCamera;
//!
//! let mut config = DaylightConfig::default();
//! config.control.schedule.interval_ms = 1;
//! config.control.max_ticks = Some(3);
//!
//! let lamp = SimulatedLamp::new();
//! let camera = SyntheticCamera::new().unwrap();
//! let mut control = ControlLoop::new(camera, lamp.clone(), &config).unwrap();
//!
//! assert_eq!(control.run().unwrap(), StopReason::MaxTicks);
//! assert_eq!(control.status().unwrap().ticks, 3);
//! assert!(lamp.current().is_some());
//! ```

pub mod config;
pub mod control_loop;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod state;
pub mod status;
pub mod stop;

pub use config::{CaptureSection, ControlConfig, DaylightConfig, LampSection};
pub use control_loop::{ControlLoop, LoopHandle, TickOutcome};
pub use error::{ConfigError, ConfigResult, FailureStage, OrchestrationError, OrchestrationResult, TickFailure};
pub use events::{EventBus, EventFilter, EventHandler, LoopEvent, StopReason};
pub use scheduler::{SchedulerConfig, TickScheduler};
pub use state::LoopState;
pub use status::{LoopStatus, StatusHandle};
pub use stop::{stop_pair, StopHandle, StopSignal};
