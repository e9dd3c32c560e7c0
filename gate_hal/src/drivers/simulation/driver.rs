//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `GateDriver` trait on top of a
//! [`GatePlant`] and an operator panel driven by an [`OperatorScript`], so
//! the control unit can run end-to-end without hardware.

use gate_common::gate::io::{InputBits, InputSnapshot, OutputActuation, RemoteCommand};
use gate_common::hal::config::SimulationConfig;
use gate_common::hal::driver::{GateDriver, HalError};
use tracing::{debug, info, warn};

use super::plant::{GatePlant, PlantFault};
use super::script::{Button, OperatorScript, ScriptAction, ScriptCursor};

/// Simulation driver implementing the `GateDriver` trait.
#[derive(Debug, Clone)]
pub struct SimulationDriver {
    /// Simulated gate leaf
    plant: GatePlant,
    /// Timed operator actions
    script: ScriptCursor,
    /// Buttons currently held
    held: InputBits,
    /// Buttons to release after the next read
    taps: InputBits,
    /// Remote command waiting for the next read
    pending_remote: Option<RemoteCommand>,
    /// Read cycles completed
    tick: u64,
    /// Last actuation written
    last_output: OutputActuation,
}

impl SimulationDriver {
    /// Create a driver with an empty script.
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_script(config, OperatorScript::default())
    }

    /// Create a driver that replays `script`.
    pub fn with_script(config: &SimulationConfig, script: OperatorScript) -> Self {
        info!(
            "Initializing simulation driver: travel {} ticks, position {}, {} scripted steps",
            config.travel_ticks,
            config.initial_position,
            script.steps().len()
        );
        Self {
            plant: GatePlant::new(config.travel_ticks, config.initial_position),
            script: ScriptCursor::new(script),
            held: InputBits::empty(),
            taps: InputBits::empty(),
            pending_remote: None,
            tick: 0,
            last_output: OutputActuation::OFF,
        }
    }

    /// Hold a button down.
    pub fn press(&mut self, button: Button) {
        self.held.insert(button.bit());
    }

    /// Release a held button.
    pub fn release(&mut self, button: Button) {
        self.held.remove(button.bit());
    }

    /// Press a button for the next read only.
    pub fn tap(&mut self, button: Button) {
        self.held.insert(button.bit());
        self.taps.insert(button.bit());
    }

    /// Queue a remote command for the next read. A newer command replaces
    /// one that has not been read yet.
    pub fn send_remote(&mut self, command: RemoteCommand) {
        if let Some(dropped) = self.pending_remote.replace(command) {
            debug!("remote command {dropped:?} superseded by {command:?}");
        }
    }

    pub fn inject_fault(&mut self, fault: PlantFault) {
        warn!("simulation fault injected: {fault:?}");
        self.plant.inject(fault);
    }

    pub fn clear_faults(&mut self) {
        info!("simulation faults cleared");
        self.plant.clear_faults();
    }

    #[inline]
    pub fn plant(&self) -> &GatePlant {
        &self.plant
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn last_output(&self) -> OutputActuation {
        self.last_output
    }

    /// All scripted actions have been applied.
    #[inline]
    pub fn script_finished(&self) -> bool {
        self.script.finished()
    }

    fn apply(&mut self, action: ScriptAction) {
        debug!(tick = self.tick, ?action, "script action");
        match action {
            ScriptAction::Press { button } => self.press(button),
            ScriptAction::Release { button } => self.release(button),
            ScriptAction::Tap { button } => self.tap(button),
            ScriptAction::Remote { command } => self.send_remote(command),
            ScriptAction::Fault { fault } => self.inject_fault(fault),
            ScriptAction::ClearFaults => self.clear_faults(),
        }
    }

    fn run_script(&mut self) {
        let due: Vec<ScriptAction> = self
            .script
            .due(self.tick)
            .iter()
            .map(|s| s.action)
            .collect();
        for action in due {
            self.apply(action);
        }
    }
}

impl GateDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn read_inputs(&mut self) -> Result<InputSnapshot, HalError> {
        self.run_script();
        let tick = self.tick;
        self.tick += 1;

        if self.plant.faults().input_bus_down {
            return Err(HalError::CommunicationError(format!(
                "input bus down at tick {tick}"
            )));
        }

        let mut bits = self.held;
        bits.set(InputBits::LIMIT_CLOSED, self.plant.limit_closed());
        bits.set(InputBits::LIMIT_OPEN, self.plant.limit_open());
        let snapshot = InputSnapshot::from_bits(bits, self.pending_remote.take());

        self.held.remove(self.taps);
        self.taps = InputBits::empty();
        Ok(snapshot)
    }

    fn write_outputs(&mut self, output: &OutputActuation) -> Result<(), HalError> {
        if output.motor_open != self.last_output.motor_open
            || output.motor_close != self.last_output.motor_close
        {
            debug!(
                tick = self.tick,
                motor_open = output.motor_open,
                motor_close = output.motor_close,
                position = self.plant.position(),
                "motor command changed"
            );
        }
        self.plant.apply(output);
        self.last_output = *output;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), HalError> {
        info!(
            script_finished = self.script_finished(),
            "Simulation driver shutting down at tick {}, leaf position {}/{}",
            self.tick,
            self.plant.position(),
            self.plant.travel_ticks()
        );
        self.last_output = OutputActuation::OFF;
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
