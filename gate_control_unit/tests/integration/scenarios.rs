//! Integration test: operator scenarios through the controller facade.
//!
//! Each test drives a `GateController` tick by tick with hand-built
//! snapshots and checks states, error codes and outputs.

use gate_common::gate::config::GateConfig;
use gate_common::gate::io::{InputSnapshot, OutputActuation, RemoteCommand};
use gate_common::gate::state::{ErrorCode, GateState};
use gate_control_unit::command::arbitration::{CommandOrigin, GateCommand};
use gate_control_unit::controller::GateController;
use gate_control_unit::state::machine::TransitionCause;

// ── Input helpers ───────────────────────────────────────────────────

fn closed() -> InputSnapshot {
    InputSnapshot {
        limit_closed: true,
        ..Default::default()
    }
}

fn open() -> InputSnapshot {
    InputSnapshot {
        limit_open: true,
        ..Default::default()
    }
}

fn midway() -> InputSnapshot {
    InputSnapshot::default()
}

fn with_remote(base: InputSnapshot, cmd: RemoteCommand) -> InputSnapshot {
    InputSnapshot {
        remote: Some(cmd),
        ..base
    }
}

/// Controller already resolved to `Closed`.
fn closed_controller(config: GateConfig) -> GateController {
    let mut c = GateController::new(config);
    c.step(&closed());
    assert_eq!(c.state(), GateState::Closed);
    c
}

/// Controller opened from `Closed` and resting at the open limit.
fn open_controller(config: GateConfig) -> GateController {
    let mut c = closed_controller(config);
    c.step(&InputSnapshot {
        button_open: true,
        ..closed()
    });
    c.step(&open());
    assert_eq!(c.state(), GateState::Open);
    c
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn initial_with_closed_limit_goes_closed_and_dark() {
    let mut c = GateController::new(GateConfig::default());
    let out = c.step(&closed());
    assert_eq!(c.state(), GateState::Closed);
    assert_eq!(out, OutputActuation::OFF);
}

#[test]
fn open_press_in_closed_starts_motor_open() {
    let mut c = closed_controller(GateConfig::default());
    let out = c.step(&InputSnapshot {
        button_open: true,
        ..closed()
    });
    assert_eq!(c.state(), GateState::Opening);
    assert!(out.motor_open);
    assert!(!out.motor_close);
}

#[test]
fn stalled_opening_times_out_then_closes() {
    let config = GateConfig {
        run_timeout_ticks: 10,
        ..GateConfig::default()
    };
    let mut c = closed_controller(config);
    c.step(&InputSnapshot {
        button_open: true,
        ..closed()
    });
    assert_eq!(c.state(), GateState::Opening);

    for _ in 0..10 {
        c.step(&midway());
        assert_eq!(c.state(), GateState::Opening);
    }
    let out = c.step(&midway());
    assert_eq!(c.state(), GateState::Error);
    assert_eq!(c.error(), ErrorCode::Timeout);
    assert!(!out.motor_active());
    assert!(out.buzzer);

    let out = c.step(&midway());
    assert_eq!(c.state(), GateState::Closing);
    assert_eq!(c.error(), ErrorCode::Ok);
    assert!(out.motor_close);
    assert_eq!(c.diagnostics().timeouts, 1);
}

#[test]
fn open_dwell_expires_into_closing() {
    let config = GateConfig {
        open_dwell_ticks: 20,
        ..GateConfig::default()
    };
    let mut c = open_controller(config);
    for _ in 0..20 {
        c.step(&open());
        assert_eq!(c.state(), GateState::Open);
    }
    c.step(&open());
    assert_eq!(c.state(), GateState::Closing);
    let (_, t) = c.diagnostics().last_transition.unwrap();
    assert_eq!(t.cause, TransitionCause::DwellExpired);
}

#[test]
fn stopped_open_press_respects_open_limit() {
    let mut c = GateController::new(GateConfig::default());
    c.step(&midway());
    assert_eq!(c.state(), GateState::Stopped);
    c.step(&InputSnapshot {
        button_open: true,
        ..midway()
    });
    assert_eq!(c.state(), GateState::Opening);

    // Stuck at the open limit in Stopped: open press ignored.
    let mut c = GateController::new(GateConfig::default());
    c.step(&midway());
    c.step(&InputSnapshot {
        button_open: true,
        ..open()
    });
    assert_eq!(c.state(), GateState::Stopped);
}

// ── Emergency latch ─────────────────────────────────────────────────

#[test]
fn emergency_needs_release_and_fresh_reset_edge() {
    let mut c = open_controller(GateConfig::default());
    let panic = InputSnapshot {
        button_emergency: true,
        ..open()
    };
    let out = c.step(&panic);
    assert_eq!(c.state(), GateState::Emergency);
    assert_eq!(
        out,
        OutputActuation {
            buzzer: true,
            lamp: true,
            ..OutputActuation::OFF
        }
    );

    // Reset pressed while still panicking.
    c.step(&InputSnapshot {
        button_reset: true,
        ..panic
    });
    assert_eq!(c.state(), GateState::Emergency);

    // Panic released but reset still held: no new edge.
    c.step(&InputSnapshot {
        button_reset: true,
        ..open()
    });
    assert_eq!(c.state(), GateState::Emergency);

    c.step(&open());
    assert_eq!(c.state(), GateState::Emergency);

    c.step(&InputSnapshot {
        button_reset: true,
        ..open()
    });
    assert_eq!(c.state(), GateState::Initial);

    // Re-evaluation from the open limit starts closing.
    c.step(&open());
    assert_eq!(c.state(), GateState::Closing);
    assert_eq!(c.diagnostics().emergencies, 1);
}

#[test]
fn remote_emergency_and_remote_reset() {
    let mut c = closed_controller(GateConfig::default());
    c.step(&with_remote(closed(), RemoteCommand::Emergency));
    assert_eq!(c.state(), GateState::Emergency);
    // Remote emergency is a one-shot code: the latch holds without it.
    c.step(&closed());
    assert_eq!(c.state(), GateState::Emergency);
    c.step(&with_remote(closed(), RemoteCommand::Reset));
    assert_eq!(c.state(), GateState::Initial);
    c.step(&closed());
    assert_eq!(c.state(), GateState::Closed);
}

#[test]
fn emergency_aborts_travel_immediately() {
    let mut c = closed_controller(GateConfig::default());
    c.step(&InputSnapshot {
        button_open: true,
        ..closed()
    });
    let out = c.step(&InputSnapshot {
        button_emergency: true,
        ..midway()
    });
    assert_eq!(c.state(), GateState::Emergency);
    assert!(!out.motor_active());
}

// ── Arbitration ─────────────────────────────────────────────────────

#[test]
fn local_edge_beats_remote_command() {
    let mut c = closed_controller(GateConfig::default());
    c.step(&InputSnapshot {
        button_open: true,
        remote: Some(RemoteCommand::Close),
        ..closed()
    });
    assert_eq!(c.state(), GateState::Opening);
    let (_, t) = c.diagnostics().last_transition.unwrap();
    match t.cause {
        TransitionCause::Command(sel) => {
            assert_eq!(sel.command, GateCommand::Open);
            assert_eq!(sel.origin, CommandOrigin::Local);
        }
        other => panic!("unexpected cause {other:?}"),
    }
}

#[test]
fn remote_open_close_cycle() {
    let mut c = closed_controller(GateConfig::default());
    c.step(&with_remote(closed(), RemoteCommand::Open));
    assert_eq!(c.state(), GateState::Opening);
    c.step(&open());
    assert_eq!(c.state(), GateState::Open);
    c.step(&with_remote(open(), RemoteCommand::Close));
    assert_eq!(c.state(), GateState::Closing);
    c.step(&closed());
    assert_eq!(c.state(), GateState::Closed);
}

#[test]
fn remote_stop_holds_open_gate() {
    let mut c = open_controller(GateConfig::default());
    c.step(&with_remote(open(), RemoteCommand::Stop));
    assert_eq!(c.state(), GateState::Stopped);
    // No dwell in Stopped.
    for _ in 0..500 {
        c.step(&open());
    }
    assert_eq!(c.state(), GateState::Stopped);
    // Toggle from the open limit closes.
    c.step(&InputSnapshot {
        button_toggle: true,
        ..open()
    });
    assert_eq!(c.state(), GateState::Closing);
}

#[test]
fn conflict_beats_emergency() {
    let mut c = closed_controller(GateConfig::default());
    c.step(&InputSnapshot {
        limit_closed: true,
        limit_open: true,
        button_emergency: true,
        ..Default::default()
    });
    assert_eq!(c.state(), GateState::Error);
    assert_eq!(c.error(), ErrorCode::SensorConflict);
}

// ── Blink ───────────────────────────────────────────────────────────

#[test]
fn closing_blinks_at_closing_period() {
    let mut c = open_controller(GateConfig::default());
    let out = c.step(&InputSnapshot {
        button_close: true,
        ..open()
    });
    assert_eq!(c.state(), GateState::Closing);
    assert!(!out.lamp, "phase starts off on entry");

    let lamps: Vec<bool> = (0..20)
        .map(|_| {
            let out = c.step(&midway());
            assert_eq!(out.buzzer, out.lamp);
            assert!(out.motor_close);
            out.lamp
        })
        .collect();
    // 250 ms at 50 ms ticks: toggle every fifth tick.
    let toggles = lamps.windows(2).filter(|w| w[0] != w[1]).count();
    assert_eq!(&lamps[..5], &[false, false, false, false, true]);
    assert_eq!(toggles, 4);
}

#[test]
fn opening_blinks_slower_than_closing() {
    let mut c = closed_controller(GateConfig::default());
    c.step(&InputSnapshot {
        button_open: true,
        ..closed()
    });
    let lamps: Vec<bool> = (0..20).map(|_| c.step(&midway()).lamp).collect();
    assert_eq!(lamps.iter().position(|&l| l), Some(9));
    assert_eq!(lamps.iter().rposition(|&l| l), Some(18));
}

#[test]
fn error_lamp_blinks_buzzer_steady() {
    let mut c = GateController::new(GateConfig::default());
    let conflict = InputSnapshot {
        limit_closed: true,
        limit_open: true,
        ..Default::default()
    };
    c.step(&conflict);
    let outs: Vec<OutputActuation> = (0..12).map(|_| c.step(&conflict)).collect();
    assert!(outs.iter().all(|o| o.buzzer && !o.motor_active()));
    // 300 ms at 50 ms ticks.
    assert!(!outs[4].lamp);
    assert!(outs[5].lamp);
    assert!(!outs[11].lamp);
}
