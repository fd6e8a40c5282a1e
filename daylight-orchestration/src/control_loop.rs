//! Loop de controle: câmera → análise → mapeamento → lâmpada

use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, error, info, warn};
use daylight_actuator::{ActuationResult, LampActuator};
use daylight_core::{BoundedCamera, BoundedLamp, CameraSource, LampDevice, LightMeasurement, WaitOutcome, Waiter};
use daylight_mapper::ColorMapper;
use daylight_photonic::FrameAnalyzer;
use crate::config::{ControlConfig, DaylightConfig};
use crate::error::{OrchestrationError, OrchestrationResult, TickFailure};
use crate::events::{EventBus, LoopEvent, StopReason};
use crate::scheduler::TickScheduler;
use crate::state::LoopState;
use crate::status::{LoopStatus, StatusHandle};
use crate::stop::{stop_pair, StopHandle, StopSignal};

/// Resultado de um tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A lâmpada está na cor alvo (escrita agora ou já aplicada)
    Applied {
        measurement: LightMeasurement,
        result: ActuationResult,
    },
    /// Alguma etapa falhou; o loop segue para o próximo tick
    Failed(TickFailure),
    /// Parada pedida no meio do tick
    Abandoned,
}

impl TickOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TickOutcome::Applied { .. })
    }

    pub fn failure(&self) -> Option<&TickFailure> {
        match self {
            TickOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Orquestrador dos quatro estágios
///
/// Uma única thread executa os ticks em sequência: o estado do mapeador e o
/// cache do atuador nunca são tocados por dois ticks ao mesmo tempo, e um
/// tick lento atrasa o seguinte em vez de rodar em paralelo com ele.
///
/// Nenhuma falha de tick encerra o loop. Só o stop (ou `max_ticks`, ou a
/// escalada com `halt_on_escalation`) termina [`ControlLoop::run`].
#[derive(Debug)]
pub struct ControlLoop<C, D> {
    camera: C,
    analyzer: FrameAnalyzer,
    mapper: ColorMapper,
    actuator: LampActuator<D>,
    scheduler: TickScheduler,
    config: ControlConfig,
    status: StatusHandle,
    events: EventBus,
    stop_handle: StopHandle,
    stop: StopSignal,
}

impl<C: CameraSource, D: LampDevice> ControlLoop<C, D> {
    /// Monta o loop sem deadlines próprios
    ///
    /// Câmera e lâmpada são usadas como vieram: os timeouts de `[capture]` e
    /// `[lamp]` NÃO são aplicados e um transporte travado trava o tick. Só
    /// use com transportes que impõem seus próprios prazos; o caminho normal
    /// é [`ControlLoop::new`].
    pub fn unbounded(camera: C, lamp: D, config: &DaylightConfig) -> OrchestrationResult<Self> {
        config.validate()?;

        let analyzer = FrameAnalyzer::with_config(config.capture.analyzer());
        let mapper = ColorMapper::new(config.mapping.clone())?;
        let actuator = LampActuator::with_policy(lamp, config.lamp.retry)?;

        Ok(Self::from_parts(camera, analyzer, mapper, actuator, config.control))
    }

    /// Monta o loop com componentes já construídos
    pub fn from_parts(
        camera: C,
        analyzer: FrameAnalyzer,
        mapper: ColorMapper,
        actuator: LampActuator<D>,
        config: ControlConfig,
    ) -> Self {
        let (stop_handle, stop) = stop_pair();

        Self {
            camera,
            analyzer,
            mapper,
            actuator,
            scheduler: TickScheduler::new(config.schedule),
            config,
            status: StatusHandle::new(),
            events: EventBus::with_history(config.event_history),
            stop_handle,
            stop,
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn mapper(&self) -> &ColorMapper {
        &self.mapper
    }

    pub fn actuator(&self) -> &LampActuator<D> {
        &self.actuator
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Snapshot do status
    pub fn status(&self) -> OrchestrationResult<LoopStatus> {
        self.status.snapshot()
    }

    /// Handle de leitura do status para outras threads
    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Handle de parada para outras threads
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    /// Pede a parada do loop
    pub fn stop(&self) {
        self.stop_handle.stop();
    }

    /// Executa um tick completo
    ///
    /// O estado percorre `Sampling → Analyzing → Mapping → Actuating → Idle`
    /// via [`LoopState::next`].
    ///
    /// Falhas das etapas viram [`TickOutcome::Failed`] e atualizam o status;
    /// `Err` só sai daqui se um lock do status/eventos estiver envenenado.
    pub fn tick(&mut self) -> OrchestrationResult<TickOutcome> {
        let tick = self.status.read(|s| s.ticks)? + 1;

        self.status.set_state(LoopState::Sampling)?;
        let frame = match self.camera.fetch_frame() {
            Ok(frame) => frame,
            Err(err) => return self.fail(tick, TickFailure::Capture(err)),
        };
        if self.stop.is_stopped() {
            return self.abandon(tick);
        }

        self.status.advance_state()?;
        let measurement = match self.analyzer.analyze(&frame) {
            Ok(measurement) => measurement,
            Err(err) => return self.fail(tick, TickFailure::Decode(err)),
        };

        self.status.advance_state()?;
        let target = self.mapper.advance(&measurement);

        self.status.advance_state()?;
        let result = self.actuator.apply_with(target, &self.stop);
        // Só o cancelamento abandona; erro do dispositivo conta como falha
        if result.cancelled {
            return self.abandon(tick);
        }
        if let Some(err) = result.error.clone() {
            return self.fail(tick, TickFailure::Actuation(err));
        }

        self.succeed(tick, measurement, result)
    }

    fn succeed(
        &mut self,
        tick: u64,
        measurement: LightMeasurement,
        result: ActuationResult,
    ) -> OrchestrationResult<TickOutcome> {
        let previous = self.status.update(|s| {
            let previous = s.last_applied_color;
            s.last_measurement = Some(measurement);
            s.last_applied_color = Some(result.color);
            s.consecutive_failures = 0;
            s.consecutive_fatal = 0;
            s.escalated = false;
            s.ticks = tick;
            s.state = s.state.next();
            previous
        })?;

        if previous != Some(result.color) {
            info!(tick, color = %result.color, luminance = measurement.luminance(), "lamp color changed");
        } else {
            debug!(tick, color = %result.color, "lamp color unchanged");
        }

        self.events.emit(LoopEvent::TickCompleted {
            tick,
            luminance: measurement.luminance(),
            color: result.color,
            written: !result.was_cached(),
            attempts: result.attempt,
        })?;

        Ok(TickOutcome::Applied { measurement, result })
    }

    fn fail(&mut self, tick: u64, failure: TickFailure) -> OrchestrationResult<TickOutcome> {
        let threshold = self.config.fatal_escalation_threshold;
        let fatal = failure.is_fatal_capture();

        let (consecutive, consecutive_fatal, escalate_now) = self.status.update(|s| {
            s.consecutive_failures = s.consecutive_failures.saturating_add(1);
            s.total_failures += 1;
            s.last_error = Some(failure.clone());
            s.ticks = tick;
            s.state = LoopState::Idle;

            // Qualquer outra falha prova que a câmera respondeu
            if fatal {
                s.consecutive_fatal = s.consecutive_fatal.saturating_add(1);
            } else {
                s.consecutive_fatal = 0;
                s.escalated = false;
            }
            let escalate_now = fatal && s.consecutive_fatal == threshold;
            if s.consecutive_fatal >= threshold {
                s.escalated = true;
            }
            (s.consecutive_failures, s.consecutive_fatal, escalate_now)
        })?;

        warn!(tick, stage = ?failure.stage(), consecutive, error = %failure, "tick failed");

        self.events.emit(LoopEvent::TickFailed {
            tick,
            failure: failure.clone(),
            consecutive_failures: consecutive,
        })?;

        if escalate_now {
            error!(consecutive_fatal, error = %failure, "camera keeps failing fatally, escalating");
            self.events.emit(LoopEvent::Escalated {
                consecutive_fatal,
                error: failure.to_string(),
            })?;
        }

        Ok(TickOutcome::Failed(failure))
    }

    fn abandon(&mut self, tick: u64) -> OrchestrationResult<TickOutcome> {
        debug!(tick, "stop requested, abandoning tick");
        self.status.set_state(LoopState::Idle)?;
        Ok(TickOutcome::Abandoned)
    }

    /// Roda ticks na cadência configurada até o stop
    ///
    /// O primeiro tick começa na hora; os seguintes nas fronteiras
    /// `início + n · intervalo`.
    pub fn run(&mut self) -> OrchestrationResult<StopReason> {
        info!(
            camera = self.camera.name(),
            lamp = self.actuator.device().name(),
            strategy = self.mapper.strategy_name(),
            interval = ?self.scheduler.interval(),
            max_ticks = ?self.config.max_ticks,
            "control loop started"
        );

        self.scheduler.start(Instant::now());
        let mut completed: u64 = 0;
        let max_ticks = self.config.max_ticks;
        let reached_max = |completed: u64| max_ticks.is_some_and(|max| completed >= max);

        let reason = loop {
            if self.stop.is_stopped() {
                break StopReason::Cancelled;
            }
            if reached_max(completed) {
                break StopReason::MaxTicks;
            }

            if matches!(self.tick()?, TickOutcome::Abandoned) {
                break StopReason::Cancelled;
            }
            completed += 1;

            if self.config.halt_on_escalation && self.status.read(|s| s.escalated)? {
                break StopReason::Escalated;
            }
            if reached_max(completed) {
                break StopReason::MaxTicks;
            }

            let wait = self.scheduler.wait_time(Instant::now());
            if self.stop.wait(wait) == WaitOutcome::Cancelled {
                break StopReason::Cancelled;
            }
        };

        self.status.set_state(LoopState::Stopped)?;
        let ticks = self.status.read(|s| s.ticks)?;
        self.events.emit(LoopEvent::Stopped { reason, ticks })?;

        info!(
            %reason,
            ticks,
            missed_ticks = self.scheduler.missed_ticks(),
            "control loop stopped"
        );
        Ok(reason)
    }
}

impl<C, D> ControlLoop<BoundedCamera<C>, BoundedLamp<D>>
where
    C: CameraSource + 'static,
    D: LampDevice + 'static,
{
    /// Monta o loop a partir da configuração completa
    ///
    /// Captura e escrita ficam limitadas pelos timeouts de `[capture]` e
    /// `[lamp]`: um transporte travado vira falha transitória no deadline.
    pub fn new(camera: C, lamp: D, config: &DaylightConfig) -> OrchestrationResult<Self> {
        config.validate()?;

        let camera = BoundedCamera::new(camera, config.capture.timeout())
            .map_err(|e| OrchestrationError::Spawn(e.to_string()))?;
        let lamp = BoundedLamp::new(lamp, config.lamp.timeout())
            .map_err(|e| OrchestrationError::Spawn(e.to_string()))?;

        Self::unbounded(camera, lamp, config)
    }
}

impl<C, D> ControlLoop<C, D>
where
    C: CameraSource + 'static,
    D: LampDevice + 'static,
{
    /// Move o loop para uma thread dedicada e começa a rodar
    pub fn spawn(self) -> OrchestrationResult<LoopHandle> {
        let status = self.status.clone();
        let events = self.events.clone();
        let stop = self.stop_handle.clone();
        let (done_tx, done) = crossbeam_channel::bounded::<()>(0);

        let mut control = self;
        let thread = std::thread::Builder::new()
            .name("daylight-loop".into())
            .spawn(move || {
                // Descartado ao sair (inclusive em pânico): avisa o join
                let _done = done_tx;
                control.run()
            })
            .map_err(|e| OrchestrationError::Spawn(e.to_string()))?;

        Ok(LoopHandle {
            status,
            events,
            stop,
            done,
            thread,
        })
    }
}

/// Handle de um loop rodando em thread própria
#[derive(Debug)]
pub struct LoopHandle {
    status: StatusHandle,
    events: EventBus,
    stop: StopHandle,
    done: Receiver<()>,
    thread: JoinHandle<OrchestrationResult<StopReason>>,
}

impl LoopHandle {
    /// Snapshot do status
    pub fn status(&self) -> OrchestrationResult<LoopStatus> {
        self.status.snapshot()
    }

    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Pede a parada (não espera)
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Espera o loop terminar por até `grace`
    ///
    /// Se o prazo estourar, a thread é abandonada e o erro é
    /// [`OrchestrationError::ShutdownTimeout`].
    pub fn join(self, grace: Duration) -> OrchestrationResult<StopReason> {
        match self.done.recv_timeout(grace) {
            Err(RecvTimeoutError::Timeout) => {
                warn!(?grace, "control loop did not stop in time, detaching");
                Err(OrchestrationError::ShutdownTimeout(grace))
            }
            _ => self.thread.join().map_err(|_| OrchestrationError::LoopPanicked)?,
        }
    }

    /// `stop` seguido de `join(grace)`
    pub fn shutdown(self, grace: Duration) -> OrchestrationResult<StopReason> {
        self.stop();
        self.join(grace)
    }
}
