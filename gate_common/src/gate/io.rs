//! Per-tick I/O value types.
//!
//! [`InputSnapshot`] is sampled once per tick by the driver and never
//! re-read mid-tick. [`OutputActuation`] is computed from scratch every tick
//! by the controller and never read back. Inputs can be packed into an
//! [`InputBits`] word for GPIO register glue and edge tracking.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Pre-decoded remote command code.
///
/// Code `0` means "no command" and maps to `None` in [`RemoteCommand::from_u8`].
/// Codes 1 and 2 match the open/close codes of the remote channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RemoteCommand {
    Open = 1,
    Close = 2,
    Stop = 3,
    Reset = 4,
    Emergency = 5,
}

impl RemoteCommand {
    /// Decode a raw command code. `0` and unknown codes yield `None`.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Open),
            2 => Some(Self::Close),
            3 => Some(Self::Stop),
            4 => Some(Self::Reset),
            5 => Some(Self::Emergency),
            _ => None,
        }
    }
}

bitflags! {
    /// Packed digital inputs, one bit per sensor or button.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputBits: u8 {
        const LIMIT_CLOSED     = 0x01;
        const LIMIT_OPEN       = 0x02;
        const BUTTON_OPEN      = 0x04;
        const BUTTON_CLOSE     = 0x08;
        const BUTTON_EMERGENCY = 0x10;
        const BUTTON_TOGGLE    = 0x20;
        const BUTTON_RESET     = 0x40;
        const BUTTON_STOP      = 0x80;
    }
}

impl InputBits {
    /// Both position sensors.
    pub const LIMITS: Self =
        Self::from_bits_truncate(Self::LIMIT_CLOSED.bits() | Self::LIMIT_OPEN.bits());

    /// Every operator button.
    pub const BUTTONS: Self = Self::from_bits_truncate(
        Self::BUTTON_OPEN.bits()
            | Self::BUTTON_CLOSE.bits()
            | Self::BUTTON_EMERGENCY.bits()
            | Self::BUTTON_TOGGLE.bits()
            | Self::BUTTON_RESET.bits()
            | Self::BUTTON_STOP.bits(),
    );
}

/// Immutable snapshot of every controller input for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    /// Closed-position limit switch.
    pub limit_closed: bool,
    /// Open-position limit switch.
    pub limit_open: bool,
    /// Momentary open button (active-true).
    pub button_open: bool,
    /// Momentary close button (active-true).
    pub button_close: bool,
    /// Panic input, level-sensitive.
    pub button_emergency: bool,
    /// Push-push toggle button.
    pub button_toggle: bool,
    /// Momentary local reset button.
    pub button_reset: bool,
    /// Momentary stop button.
    pub button_stop: bool,
    /// Remote command received since the previous tick.
    pub remote: Option<RemoteCommand>,
}

impl InputSnapshot {
    /// Both position sensors asserted: the position cannot be inferred.
    #[inline]
    pub const fn sensor_conflict(&self) -> bool {
        self.limit_closed && self.limit_open
    }

    /// Exactly one position sensor asserted.
    #[inline]
    pub const fn position_consistent(&self) -> bool {
        self.limit_closed != self.limit_open
    }

    /// Emergency requested by either the panic input or the remote channel.
    #[inline]
    pub fn emergency_requested(&self) -> bool {
        self.button_emergency || self.remote == Some(RemoteCommand::Emergency)
    }

    /// Build a snapshot from a packed input word.
    pub fn from_bits(bits: InputBits, remote: Option<RemoteCommand>) -> Self {
        Self {
            limit_closed: bits.contains(InputBits::LIMIT_CLOSED),
            limit_open: bits.contains(InputBits::LIMIT_OPEN),
            button_open: bits.contains(InputBits::BUTTON_OPEN),
            button_close: bits.contains(InputBits::BUTTON_CLOSE),
            button_emergency: bits.contains(InputBits::BUTTON_EMERGENCY),
            button_toggle: bits.contains(InputBits::BUTTON_TOGGLE),
            button_reset: bits.contains(InputBits::BUTTON_RESET),
            button_stop: bits.contains(InputBits::BUTTON_STOP),
            remote,
        }
    }

    /// Pack the boolean inputs into a bit word (the remote code is not included).
    pub fn to_bits(&self) -> InputBits {
        let mut bits = InputBits::empty();
        bits.set(InputBits::LIMIT_CLOSED, self.limit_closed);
        bits.set(InputBits::LIMIT_OPEN, self.limit_open);
        bits.set(InputBits::BUTTON_OPEN, self.button_open);
        bits.set(InputBits::BUTTON_CLOSE, self.button_close);
        bits.set(InputBits::BUTTON_EMERGENCY, self.button_emergency);
        bits.set(InputBits::BUTTON_TOGGLE, self.button_toggle);
        bits.set(InputBits::BUTTON_RESET, self.button_reset);
        bits.set(InputBits::BUTTON_STOP, self.button_stop);
        bits
    }
}

/// Actuator command vector produced every tick.
///
/// `motor_open` and `motor_close` are never both true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputActuation {
    pub motor_open: bool,
    pub motor_close: bool,
    pub buzzer: bool,
    pub lamp: bool,
}

impl OutputActuation {
    /// Everything de-energized.
    pub const OFF: Self = Self {
        motor_open: false,
        motor_close: false,
        buzzer: false,
        lamp: false,
    };

    /// Direction interlock holds.
    #[inline]
    pub const fn is_consistent(&self) -> bool {
        !(self.motor_open && self.motor_close)
    }

    /// Drop both motor outputs if they contradict each other.
    #[inline]
    #[must_use]
    pub const fn interlocked(self) -> Self {
        if self.is_consistent() {
            self
        } else {
            Self {
                motor_open: false,
                motor_close: false,
                ..self
            }
        }
    }

    #[inline]
    pub const fn motor_active(&self) -> bool {
        self.motor_open || self.motor_close
    }
}
