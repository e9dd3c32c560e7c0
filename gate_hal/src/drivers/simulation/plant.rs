//! Gate leaf kinematics and limit switches.
//!
//! The leaf position is an integer in `0..=travel_ticks`: `0` is fully
//! closed, `travel_ticks` fully open. Each tick with exactly one motor
//! direction energized moves the leaf one step. Limit switches are derived
//! from the position unless a fault pins them.

use gate_common::gate::io::OutputActuation;
use serde::{Deserialize, Serialize};

/// Injectable plant faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantFault {
    /// Motor energized but the leaf does not move.
    MotorStuck,
    /// Closed limit switch reads asserted regardless of position.
    ClosedLimitStuckOn,
    /// Open limit switch reads asserted regardless of position.
    OpenLimitStuckOn,
    /// Closed limit switch never asserts.
    ClosedLimitStuckOff,
    /// Open limit switch never asserts.
    OpenLimitStuckOff,
    /// Input sampling fails.
    InputBusDown,
}

/// Active fault set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlantFaults {
    pub motor_stuck: bool,
    pub closed_limit: Option<bool>,
    pub open_limit: Option<bool>,
    pub input_bus_down: bool,
}

impl PlantFaults {
    pub fn inject(&mut self, fault: PlantFault) {
        match fault {
            PlantFault::MotorStuck => self.motor_stuck = true,
            PlantFault::ClosedLimitStuckOn => self.closed_limit = Some(true),
            PlantFault::OpenLimitStuckOn => self.open_limit = Some(true),
            PlantFault::ClosedLimitStuckOff => self.closed_limit = Some(false),
            PlantFault::OpenLimitStuckOff => self.open_limit = Some(false),
            PlantFault::InputBusDown => self.input_bus_down = true,
        }
    }

    #[inline]
    pub fn any(&self) -> bool {
        *self != Self::default()
    }
}

/// Simulated gate leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePlant {
    travel_ticks: u32,
    position: u32,
    faults: PlantFaults,
}

impl GatePlant {
    /// New plant; `initial_position` is clamped to the travel.
    pub fn new(travel_ticks: u32, initial_position: u32) -> Self {
        let travel_ticks = travel_ticks.max(1);
        Self {
            travel_ticks,
            position: initial_position.min(travel_ticks),
            faults: PlantFaults::default(),
        }
    }

    #[inline]
    pub const fn position(&self) -> u32 {
        self.position
    }

    #[inline]
    pub const fn travel_ticks(&self) -> u32 {
        self.travel_ticks
    }

    #[inline]
    pub const fn faults(&self) -> &PlantFaults {
        &self.faults
    }

    pub fn inject(&mut self, fault: PlantFault) {
        self.faults.inject(fault);
    }

    pub fn clear_faults(&mut self) {
        self.faults = PlantFaults::default();
    }

    pub fn limit_closed(&self) -> bool {
        self.faults.closed_limit.unwrap_or(self.position == 0)
    }

    pub fn limit_open(&self) -> bool {
        self.faults
            .open_limit
            .unwrap_or(self.position == self.travel_ticks)
    }

    /// Advance the leaf by one tick of the given actuation.
    ///
    /// Returns `true` if the leaf moved.
    pub fn apply(&mut self, output: &OutputActuation) -> bool {
        if self.faults.motor_stuck || !output.is_consistent() {
            return false;
        }
        let before = self.position;
        if output.motor_open {
            self.position = (self.position + 1).min(self.travel_ticks);
        } else if output.motor_close {
            self.position = self.position.saturating_sub(1);
        }
        self.position != before
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
