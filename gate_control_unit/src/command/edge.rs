//! Rising-edge tracker for momentary buttons.
//!
//! Holds the previous tick's raw button word. A button fires only on the
//! tick it goes from released to pressed, so a held button never
//! re-triggers. The tracker is a plain value threaded through every step;
//! it is updated exactly once per tick, after the edges are computed.

use gate_common::gate::io::{InputBits, InputSnapshot};

/// Buttons that produced a rising edge this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    pub open: bool,
    pub close: bool,
    pub toggle: bool,
    pub reset: bool,
    pub stop: bool,
}

impl ButtonEdges {
    #[inline]
    pub const fn any(&self) -> bool {
        self.open || self.close || self.toggle || self.reset || self.stop
    }
}

/// Previous-tick button state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeTracker {
    previous: InputBits,
}

impl EdgeTracker {
    pub const fn new() -> Self {
        Self {
            previous: InputBits::empty(),
        }
    }

    /// Raw button word retained from the previous tick.
    #[inline]
    pub const fn previous(&self) -> InputBits {
        self.previous
    }

    /// Compute this tick's rising edges and remember the current buttons.
    pub fn update(&mut self, input: &InputSnapshot) -> ButtonEdges {
        let current = input.to_bits() & InputBits::BUTTONS;
        let rising = current & !self.previous;
        self.previous = current;
        ButtonEdges {
            open: rising.contains(InputBits::BUTTON_OPEN),
            close: rising.contains(InputBits::BUTTON_CLOSE),
            toggle: rising.contains(InputBits::BUTTON_TOGGLE),
            reset: rising.contains(InputBits::BUTTON_RESET),
            stop: rising.contains(InputBits::BUTTON_STOP),
        }
    }
}
