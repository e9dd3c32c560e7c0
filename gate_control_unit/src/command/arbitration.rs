//! Command arbitration (local buttons vs remote channel vs emergency).
//!
//! Builds one [`CommandFrame`] per tick from the button edges and the
//! snapshot. States query the frame through [`CommandFrame::select`], which
//! walks candidates in fixed precedence: local edges first (stop, open,
//! close, toggle, reset), then the remote command. The emergency request is kept
//! apart because it overrides every state rule.

use gate_common::gate::io::{InputSnapshot, RemoteCommand};

use super::edge::ButtonEdges;

/// Operator intent, independent of where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateCommand {
    Open,
    Close,
    Toggle,
    Stop,
    Reset,
}

/// Source of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandOrigin {
    /// Physical button wired to the controller.
    Local,
    /// Remote command channel.
    Remote,
}

/// A command that won arbitration this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arbitrated {
    pub command: GateCommand,
    pub origin: CommandOrigin,
}

/// Order in which local edges are offered to a state.
const LOCAL_PRECEDENCE: [GateCommand; 5] = [
    GateCommand::Stop,
    GateCommand::Open,
    GateCommand::Close,
    GateCommand::Toggle,
    GateCommand::Reset,
];

/// Everything an operator asked for during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandFrame {
    edges: ButtonEdges,
    remote: Option<RemoteCommand>,
    emergency: Option<CommandOrigin>,
}

impl CommandFrame {
    /// Assemble the frame. The panic button wins over a remote emergency
    /// when both are present.
    pub fn new(edges: ButtonEdges, input: &InputSnapshot) -> Self {
        let emergency = if input.button_emergency {
            Some(CommandOrigin::Local)
        } else if input.remote == Some(RemoteCommand::Emergency) {
            Some(CommandOrigin::Remote)
        } else {
            None
        };
        Self {
            edges,
            remote: input.remote,
            emergency,
        }
    }

    #[inline]
    pub const fn edges(&self) -> &ButtonEdges {
        &self.edges
    }

    /// Who requested an emergency stop this tick, if anyone.
    #[inline]
    pub const fn emergency(&self) -> Option<CommandOrigin> {
        self.emergency
    }

    /// Remote command translated to an operator intent.
    ///
    /// `RemoteCommand::Emergency` is not an intent; it is reported through
    /// [`CommandFrame::emergency`].
    pub const fn remote_command(&self) -> Option<GateCommand> {
        match self.remote {
            Some(RemoteCommand::Open) => Some(GateCommand::Open),
            Some(RemoteCommand::Close) => Some(GateCommand::Close),
            Some(RemoteCommand::Stop) => Some(GateCommand::Stop),
            Some(RemoteCommand::Reset) => Some(GateCommand::Reset),
            Some(RemoteCommand::Emergency) | None => None,
        }
    }

    fn local_edge(&self, command: GateCommand) -> bool {
        match command {
            GateCommand::Open => self.edges.open,
            GateCommand::Close => self.edges.close,
            GateCommand::Toggle => self.edges.toggle,
            GateCommand::Reset => self.edges.reset,
            GateCommand::Stop => self.edges.stop,
        }
    }

    /// Highest-precedence command the caller accepts.
    ///
    /// `accept` sees every pending command in precedence order and returns
    /// whether the current state acts on it (interlocks included). The first
    /// accepted command wins; rejected ones are dropped for this tick.
    pub fn select<F>(&self, mut accept: F) -> Option<Arbitrated>
    where
        F: FnMut(GateCommand, CommandOrigin) -> bool,
    {
        let local = LOCAL_PRECEDENCE
            .into_iter()
            .filter(|&cmd| self.local_edge(cmd))
            .map(|cmd| (cmd, CommandOrigin::Local));
        let remote = self
            .remote_command()
            .map(|cmd| (cmd, CommandOrigin::Remote));

        local
            .chain(remote)
            .find(|&(cmd, origin)| accept(cmd, origin))
            .map(|(command, origin)| Arbitrated { command, origin })
    }

    /// Reset requested by either source.
    pub fn reset_requested(&self) -> bool {
        self.edges.reset || self.remote == Some(RemoteCommand::Reset)
    }
}
