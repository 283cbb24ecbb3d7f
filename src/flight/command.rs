//! The command record handed back after every issued command
//!
//! A record is rebuilt at the start of each command and overwritten in
//! place; only the latest one is kept. It carries enough to render a
//! human-readable trace without looking at drone internals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A drone command, carrying its numeric payload where one exists.
///
/// Distances are centimeters, rotations degrees; the unit is implied by the
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
    Locate,
    TakeOff,
    Land,
    Forward(f64),
    Backward(f64),
    GoUp(f64),
    GoDown(f64),
    GoLeft(f64),
    GoRight(f64),
    RotateLeft(f64),
    RotateRight(f64),
}

impl CommandKind {
    /// The numeric payload, if the command takes one
    pub fn amount(&self) -> Option<f64> {
        match *self {
            CommandKind::Locate | CommandKind::TakeOff | CommandKind::Land => None,
            CommandKind::Forward(n)
            | CommandKind::Backward(n)
            | CommandKind::GoUp(n)
            | CommandKind::GoDown(n)
            | CommandKind::GoLeft(n)
            | CommandKind::GoRight(n)
            | CommandKind::RotateLeft(n)
            | CommandKind::RotateRight(n) => Some(n),
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            CommandKind::Locate => "locates",
            CommandKind::TakeOff => "takes off",
            CommandKind::Land => "lands",
            CommandKind::Forward(_) => "moves forward",
            CommandKind::Backward(_) => "moves back",
            CommandKind::GoUp(_) => "rises",
            CommandKind::GoDown(_) => "descends",
            CommandKind::GoLeft(_) => "flies left",
            CommandKind::GoRight(_) => "flies right",
            CommandKind::RotateLeft(_) => "rotates left",
            CommandKind::RotateRight(_) => "rotates right",
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            CommandKind::RotateLeft(_) | CommandKind::RotateRight(_) => "degree",
            _ => "cm",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount() {
            Some(n) => write!(f, "{} {}{}", self.verb(), n, self.unit()),
            None => write!(f, "{}", self.verb()),
        }
    }
}

/// What a command did to the drone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// Committed normally
    Ok,
    /// Soft rejection: wrong state or out-of-range amount, nothing changed
    Rejected,
    /// Fatal collision; the drone is inoperable afterwards
    Crash,
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Ok => write!(f, "OK"),
            CommandOutcome::Rejected => write!(f, "REJECTED"),
            CommandOutcome::Crash => write!(f, "CRASH"),
        }
    }
}

/// The latest command as seen by the caller or a presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub kind: CommandKind,
    /// False iff the command was refused outright (precondition or range)
    pub accepted: bool,
    pub outcome: CommandOutcome,
    /// Human-readable rejection reason or safety warning, when one applies
    pub reason: Option<String>,
}

impl CommandRecord {
    pub(crate) fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            accepted: true,
            outcome: CommandOutcome::Ok,
            reason: None,
        }
    }

    /// Shortcut for `kind.amount()`
    pub fn amount(&self) -> Option<f64> {
        self.kind.amount()
    }
}

impl fmt::Display for CommandRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command [{}] accepted={} result={}",
            self.kind, self.accepted, self.outcome
        )?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}
