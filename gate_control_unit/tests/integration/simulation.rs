//! Integration test: cycle runner against the simulated gate plant.
//!
//! Validates: config loading → runner construction → scripted operator →
//! plant motion and limit switches → controller states, including fault
//! injection and recovery.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use gate_common::gate::state::{ErrorCode, GateState};
use gate_common::hal::config::SimulationConfig;
use gate_control_unit::config::{ControlUnitConfig, load_config, load_config_from_str};
use gate_control_unit::controller::GateController;
use gate_control_unit::cycle::{CycleError, CycleRunner};
use gate_hal::drivers::simulation::{
    Button, OperatorScript, PlantFault, ScriptAction, ScriptStep, SimulationDriver,
};

const SHORT_TOML: &str = r#"
[gate]
tick_period_ms = 1
run_timeout_ticks = 30
open_dwell_ticks = 10
opening_blink_ms = 5
closing_blink_ms = 2
error_blink_ms = 3

[simulation]
travel_ticks = 20
initial_position = 0
"#;

fn short_config() -> ControlUnitConfig {
    load_config_from_str(SHORT_TOML).unwrap()
}

fn at(tick: u64, action: ScriptAction) -> ScriptStep {
    ScriptStep { tick, action }
}

fn runner(config: &ControlUnitConfig, steps: Vec<ScriptStep>) -> CycleRunner<SimulationDriver> {
    let driver = SimulationDriver::with_script(&config.simulation, OperatorScript::new(steps));
    CycleRunner::new(GateController::new(config.gate.clone()), driver)
}

/// Run `ticks` cycles and return the distinct consecutive states visited.
fn run_states(runner: &mut CycleRunner<SimulationDriver>, ticks: u64) -> Vec<GateState> {
    let mut visited = vec![runner.controller().state()];
    for _ in 0..ticks {
        let out = runner.run_cycle().unwrap();
        assert!(!(out.motor_open && out.motor_close));
        let state = runner.controller().state();
        if visited.last() != Some(&state) {
            visited.push(state);
        }
    }
    visited
}

#[test]
fn full_open_dwell_close_cycle() {
    let config = short_config();
    let mut r = runner(
        &config,
        vec![at(
            3,
            ScriptAction::Tap {
                button: Button::Open,
            },
        )],
    );
    let visited = run_states(&mut r, 80);
    assert_eq!(
        visited,
        vec![
            GateState::Initial,
            GateState::Closed,
            GateState::Opening,
            GateState::Open,
            GateState::Closing,
            GateState::Closed,
        ]
    );
    assert_eq!(r.driver().plant().position(), 0);
    assert_eq!(r.controller().diagnostics().timeouts, 0);
}

#[test]
fn found_open_closes_on_its_own() {
    let config = ControlUnitConfig {
        simulation: SimulationConfig {
            travel_ticks: 20,
            initial_position: 20,
        },
        ..short_config()
    };
    let mut r = runner(&config, vec![]);
    let visited = run_states(&mut r, 30);
    assert_eq!(
        visited,
        vec![GateState::Initial, GateState::Closing, GateState::Closed]
    );
}

#[test]
fn stuck_motor_times_out_and_recovers_by_closing() {
    let config = short_config();
    let mut r = runner(
        &config,
        vec![
            at(
                0,
                ScriptAction::Fault {
                    fault: PlantFault::MotorStuck,
                },
            ),
            at(
                2,
                ScriptAction::Tap {
                    button: Button::Open,
                },
            ),
        ],
    );
    let visited = run_states(&mut r, 60);
    assert_eq!(
        visited,
        vec![
            GateState::Initial,
            GateState::Closed,
            GateState::Opening,
            GateState::Error,
            GateState::Closing,
            GateState::Closed,
        ]
    );
    assert_eq!(r.controller().diagnostics().timeouts, 1);
    assert_eq!(r.controller().error(), ErrorCode::Ok);
}

#[test]
fn stuck_limit_latches_conflict_until_cleared() {
    let config = short_config();
    let mut r = runner(
        &config,
        vec![
            at(
                5,
                ScriptAction::Fault {
                    fault: PlantFault::OpenLimitStuckOn,
                },
            ),
            at(40, ScriptAction::ClearFaults),
        ],
    );
    run_states(&mut r, 20);
    assert_eq!(r.controller().state(), GateState::Error);
    assert_eq!(r.controller().error(), ErrorCode::SensorConflict);
    assert!(r.driver().last_output().buzzer);

    let visited = run_states(&mut r, 30);
    assert_eq!(
        visited,
        vec![GateState::Error, GateState::Initial, GateState::Closed]
    );
    assert_eq!(r.controller().diagnostics().sensor_conflicts, 1);
}

#[test]
fn remote_stop_leaves_leaf_midway() {
    let config = short_config();
    let mut r = runner(
        &config,
        vec![
            at(
                2,
                ScriptAction::Remote {
                    command: gate_common::gate::io::RemoteCommand::Open,
                },
            ),
            at(
                12,
                ScriptAction::Remote {
                    command: gate_common::gate::io::RemoteCommand::Stop,
                },
            ),
        ],
    );
    run_states(&mut r, 40);
    assert_eq!(r.controller().state(), GateState::Stopped);
    let pos = r.driver().plant().position();
    assert!(pos > 0 && pos < 20, "position {pos}");
}

#[test]
fn stop_button_halts_travel_then_toggle_resumes() {
    let config = short_config();
    let mut r = runner(
        &config,
        vec![
            at(
                2,
                ScriptAction::Tap {
                    button: Button::Open,
                },
            ),
            at(
                10,
                ScriptAction::Tap {
                    button: Button::Stop,
                },
            ),
        ],
    );
    let visited = run_states(&mut r, 20);
    assert_eq!(
        visited,
        vec![
            GateState::Initial,
            GateState::Closed,
            GateState::Opening,
            GateState::Stopped,
        ]
    );
    let pos = r.driver().plant().position();
    assert!(pos > 0 && pos < 20, "position {pos}");
    assert!(!r.driver().last_output().motor_active());

    // Neither limit asserted: toggle closes.
    r.driver_mut().tap(Button::Toggle);
    let visited = run_states(&mut r, 40);
    assert_eq!(
        visited,
        vec![GateState::Stopped, GateState::Closing, GateState::Closed]
    );
}

#[test]
fn emergency_press_release_reset() {
    let config = short_config();
    let mut r = runner(
        &config,
        vec![
            at(
                2,
                ScriptAction::Press {
                    button: Button::Emergency,
                },
            ),
            at(
                6,
                ScriptAction::Release {
                    button: Button::Emergency,
                },
            ),
            at(
                9,
                ScriptAction::Tap {
                    button: Button::Reset,
                },
            ),
        ],
    );
    let visited = run_states(&mut r, 15);
    assert_eq!(
        visited,
        vec![
            GateState::Initial,
            GateState::Closed,
            GateState::Emergency,
            GateState::Initial,
            GateState::Closed,
        ]
    );
}

#[test]
fn input_bus_failure_stops_run_with_outputs_off() {
    let config = short_config();
    let mut r = runner(
        &config,
        vec![
            at(
                2,
                ScriptAction::Tap {
                    button: Button::Open,
                },
            ),
            at(
                6,
                ScriptAction::Fault {
                    fault: PlantFault::InputBusDown,
                },
            ),
        ],
    );
    let running = AtomicBool::new(true);
    let err = r.run(&running, Some(50)).unwrap_err();
    assert!(matches!(err, CycleError::Driver(_)));
    assert_eq!(r.stats().cycle_count, 6);
    assert!(!r.driver().last_output().motor_active());
}

#[test]
fn run_honours_tick_limit() {
    let config = short_config();
    let mut r = runner(&config, vec![]);
    let running = AtomicBool::new(true);
    r.run(&running, Some(10)).unwrap();
    assert_eq!(r.stats().cycle_count, 10);
    assert_eq!(r.controller().diagnostics().ticks, 10);
    assert_eq!(r.controller().state(), GateState::Closed);
}

#[test]
fn shipped_config_and_script_load() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("config");
    let config = load_config(&root.join("gate.toml")).unwrap();
    assert_eq!(config.gate.tick_period_ms, 50);
    assert_eq!(config.gate.run_timeout_ticks, 180);

    let script = OperatorScript::from_file(&root.join("scenario.toml")).unwrap();
    assert!(!script.is_empty());
    assert!(script.last_tick().is_some_and(|t| t < 900));
}
