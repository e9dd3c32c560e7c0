//! Integration test: safety invariants over long pseudo-random input runs.
//!
//! A fixed-seed xorshift generator produces snapshot sequences that mix
//! button bursts, remote codes and limit switch noise (including both
//! limits at once). Every tick is checked against the invariants that
//! must hold regardless of input.

use gate_common::gate::config::GateConfig;
use gate_common::gate::io::{InputBits, InputSnapshot, OutputActuation, RemoteCommand};
use gate_common::gate::state::{ErrorCode, GateState};
use gate_control_unit::state::machine::{ControllerState, step};

/// xorshift64*; deterministic across platforms.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn chance(&mut self, one_in: u64) -> bool {
        self.next() % one_in == 0
    }
}

fn random_snapshot(rng: &mut XorShift) -> InputSnapshot {
    let mut bits = InputBits::empty();
    match rng.next() % 10 {
        0..=3 => bits |= InputBits::LIMIT_CLOSED,
        4..=6 => bits |= InputBits::LIMIT_OPEN,
        7 => bits |= InputBits::LIMITS,
        _ => {}
    }
    for button in [
        InputBits::BUTTON_OPEN,
        InputBits::BUTTON_CLOSE,
        InputBits::BUTTON_TOGGLE,
        InputBits::BUTTON_RESET,
        InputBits::BUTTON_STOP,
    ] {
        if rng.chance(6) {
            bits |= button;
        }
    }
    if rng.chance(25) {
        bits |= InputBits::BUTTON_EMERGENCY;
    }
    let remote = if rng.chance(8) {
        RemoteCommand::from_u8((rng.next() % 6) as u8)
    } else {
        None
    };
    InputSnapshot::from_bits(bits, remote)
}

fn short_config() -> GateConfig {
    GateConfig {
        run_timeout_ticks: 15,
        open_dwell_ticks: 10,
        ..GateConfig::default()
    }
}

fn check_tick(before: &ControllerState, input: &InputSnapshot, after: &ControllerState, out: &OutputActuation) {
    assert!(
        !(out.motor_open && out.motor_close),
        "contradictory motors in {} with {input:?}",
        after.state
    );
    if after.error != ErrorCode::Ok {
        assert_eq!(after.state, GateState::Error, "error code outside Error");
    }
    if input.sensor_conflict() && before.state != GateState::Error {
        assert_eq!(after.state, GateState::Error);
        assert_eq!(after.error, ErrorCode::SensorConflict);
    }
    if out.motor_open {
        assert_eq!(after.state, GateState::Opening);
    }
    if out.motor_close {
        assert_eq!(after.state, GateState::Closing);
    }
    if after.state.is_alarm() {
        assert!(out.buzzer, "buzzer off in {}", after.state);
        assert!(!out.motor_active());
    }
    if matches!(
        after.state,
        GateState::Initial | GateState::Closed | GateState::Stopped
    ) {
        assert_eq!(*out, OutputActuation::OFF);
    }
}

#[test]
fn invariants_hold_over_random_runs() {
    let config = short_config();
    for seed in 1..=20u64 {
        let mut rng = XorShift(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let mut state = ControllerState::new();
        for _ in 0..2_000 {
            let input = random_snapshot(&mut rng);
            let r = step(&config, &state, &input);
            check_tick(&state, &input, &r.next, &r.output);
            if let Some(t) = r.transition {
                assert_eq!(t.from, state.state);
                assert_eq!(t.to, r.next.state);
                assert_ne!(t.from, t.to);
            } else {
                assert_eq!(r.next.state, state.state);
            }
            state = r.next;
        }
    }
}

#[test]
fn every_state_is_reached() {
    let config = short_config();
    let mut seen = [false; GateState::ALL.len()];
    let mut rng = XorShift(0xDEAD_BEEF);
    let mut state = ControllerState::new();
    for _ in 0..20_000 {
        let input = random_snapshot(&mut rng);
        state = step(&config, &state, &input).next;
        seen[state.state as usize] = true;
    }
    for s in GateState::ALL {
        assert!(seen[s as usize], "{s} never reached");
    }
}

#[test]
fn step_is_pure() {
    let config = short_config();
    let mut rng = XorShift(7);
    let mut state = ControllerState::new();
    for _ in 0..500 {
        let input = random_snapshot(&mut rng);
        let a = step(&config, &state, &input);
        let b = step(&config, &state, &input);
        assert_eq!(a, b);
        state = a.next;
    }
}

#[test]
fn resting_states_are_idempotent() {
    let config = GateConfig {
        open_dwell_ticks: 1_000,
        ..GateConfig::default()
    };
    let cases = [
        (
            GateState::Closed,
            InputSnapshot {
                limit_closed: true,
                ..Default::default()
            },
        ),
        (
            GateState::Open,
            InputSnapshot {
                limit_open: true,
                ..Default::default()
            },
        ),
    ];
    for (resting, input) in cases {
        let mut state = ControllerState::entered(resting);
        let first = step(&config, &state, &input);
        for _ in 0..200 {
            let r = step(&config, &state, &input);
            assert_eq!(r.next.state, resting);
            assert_eq!(r.output, first.output);
            assert!(r.transition.is_none());
            state = r.next;
        }
    }
}

#[test]
fn held_toggle_fires_once() {
    let config = GateConfig::default();
    let held = InputSnapshot {
        limit_closed: true,
        button_toggle: true,
        ..Default::default()
    };
    let mut state = ControllerState::entered(GateState::Closed);
    let r = step(&config, &state, &held);
    assert_eq!(r.next.state, GateState::Opening);
    state = r.next;

    // Still held at the open limit: no second toggle.
    let held_open = InputSnapshot {
        limit_open: true,
        button_toggle: true,
        ..Default::default()
    };
    let r = step(&config, &state, &held_open);
    assert_eq!(r.next.state, GateState::Open);
    state = r.next;
    for _ in 0..20 {
        state = step(&config, &state, &held_open).next;
        assert_eq!(state.state, GateState::Open);
    }
}
