//! The virtual drone state machine
//!
//! Commands follow one shape: check the precondition, checkpoint the
//! position, compute the candidate move, check it against the enclosure,
//! then commit or crash. Precondition and range failures are soft
//! rejections recorded on the command; collisions are fatal and returned as
//! a typed error the caller must branch on.

use crate::core::config::FlightConfig;
use crate::core::error::{CrashSurface, Result, SimError};
use crate::enclosure::Enclosure;
use crate::flight::command::{CommandKind, CommandOutcome, CommandRecord};
use crate::spatial::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, error, warn};

/// Drone lifecycle state. `Crashed` is terminal and absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneState {
    OnGround,
    InFlight,
    Crashed,
}

impl fmt::Display for DroneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DroneState::OnGround => write!(f, "ON_GROUND"),
            DroneState::InFlight => write!(f, "IN_FLIGHT"),
            DroneState::Crashed => write!(f, "CRASHED"),
        }
    }
}

/// Horizontal translation directions, relative to the current heading
#[derive(Debug, Clone, Copy)]
enum Translation {
    Forward,
    Backward,
    Left,
    Right,
}

impl Translation {
    fn label(self) -> &'static str {
        match self {
            Translation::Forward => "forward",
            Translation::Backward => "backward",
            Translation::Left => "left",
            Translation::Right => "right",
        }
    }

    fn kind(self, n: f64) -> CommandKind {
        match self {
            Translation::Forward => CommandKind::Forward(n),
            Translation::Backward => CommandKind::Backward(n),
            Translation::Left => CommandKind::GoLeft(n),
            Translation::Right => CommandKind::GoRight(n),
        }
    }

    /// Floor-plane displacement for a move of `n` cm at the given heading
    fn offsets(self, heading: f64, n: f64) -> (f64, f64) {
        match self {
            Translation::Forward => (n * heading.cos(), n * heading.sin()),
            Translation::Backward => (-n * heading.cos(), -n * heading.sin()),
            Translation::Left => (-n * heading.sin(), n * heading.cos()),
            Translation::Right => (n * heading.sin(), -n * heading.cos()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Spin {
    Left,
    Right,
}

/// A simulated Tello-class drone flying inside a borrowed enclosure.
///
/// The enclosure and the optional target are supplied externally and must
/// outlive the drone; the machine never owns them.
#[derive(Debug)]
pub struct Drone<'a> {
    config: FlightConfig,
    state: DroneState,
    current: Position,
    previous: Position,
    enclosure: Option<&'a Enclosure>,
    target: Option<&'a Position>,
    detected: bool,
    command: Option<CommandRecord>,
}

impl Default for Drone<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Drone<'a> {
    /// A drone on the ground with default flight parameters, not yet located
    pub fn new() -> Self {
        Self::with_config(FlightConfig::default())
    }

    pub fn with_config(config: FlightConfig) -> Self {
        Self {
            config,
            state: DroneState::OnGround,
            current: Position::default(),
            previous: Position::default(),
            enclosure: None,
            target: None,
            detected: false,
            command: None,
        }
    }

    /// Load flight parameters from a TOML properties file
    pub fn set_flight_parameters<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.config = FlightConfig::from_path(path)?;
        Ok(())
    }

    /// Point the detection logic at a target (or clear it with `None`)
    pub fn set_target(&mut self, target: Option<&'a Position>) {
        self.target = target;
        self.detect_target();
    }

    // === commands ===

    /// Place the drone on the ground at (x, y) with the given heading in
    /// degrees, and bind it to the enclosure used by every later geometry
    /// check. Only valid before take-off.
    pub fn locate(&mut self, x: f64, y: f64, heading_deg: f64, enclosure: &'a Enclosure) {
        let record = CommandRecord::new(CommandKind::Locate);
        if self.state != DroneState::OnGround {
            return self.reject(
                record,
                "command \"locate\" can be used only before the drone takes off".into(),
            );
        }
        self.enclosure = Some(enclosure);
        self.current.set_coord(x, y, 0.0, heading_deg.to_radians());
        self.previous = self.current;
        self.commit(record);
    }

    /// Rise to the configured take-off altitude. Never fails once the
    /// precondition holds; there is no ceiling check at take-off.
    pub fn take_off(&mut self) {
        let record = CommandRecord::new(CommandKind::TakeOff);
        if self.state != DroneState::OnGround {
            return self.reject(record, "cannot take off: drone flying or not ready".into());
        }
        self.previous = self.current;
        self.current.z += self.config.takeoff_altitude;
        self.state = DroneState::InFlight;
        self.commit(record);
    }

    /// Land straight down
    pub fn land(&mut self) {
        let record = CommandRecord::new(CommandKind::Land);
        if self.state != DroneState::InFlight {
            return self.reject(record, "cannot land: drone is not flying".into());
        }
        self.previous = self.current;
        self.current.z = 0.0;
        self.state = DroneState::OnGround;
        self.commit(record);
    }

    /// Move `n` cm straight ahead
    pub fn forward(&mut self, n: f64) -> Result<()> {
        self.translate(Translation::Forward, n)
    }

    /// Move `n` cm straight back
    pub fn backward(&mut self, n: f64) -> Result<()> {
        self.translate(Translation::Backward, n)
    }

    /// Move `n` cm sideways to the left
    pub fn go_left(&mut self, n: f64) -> Result<()> {
        self.translate(Translation::Left, n)
    }

    /// Move `n` cm sideways to the right
    pub fn go_right(&mut self, n: f64) -> Result<()> {
        self.translate(Translation::Right, n)
    }

    /// Rise `n` cm; hitting the ceiling is a crash
    pub fn go_up(&mut self, n: f64) -> Result<()> {
        let record = CommandRecord::new(CommandKind::GoUp(n));
        if self.state != DroneState::InFlight {
            self.reject(record, "cannot rise: drone is not flying".into());
            return Ok(());
        }
        if n <= 0.0 {
            self.reject(record, "rise inapplicable: the amount must be positive".into());
            return Ok(());
        }
        let Some(room) = self.enclosure else {
            self.reject(record, "drone has not been located in an enclosure".into());
            return Ok(());
        };
        self.previous = self.current;
        if self.current.z + n >= room.height() {
            self.current.z = room.height();
            return self.crash(record, CrashSurface::Ceiling);
        }
        self.current.z += n;
        self.commit(record);
        Ok(())
    }

    /// Descend `n` cm, stopping at the safety floor instead of the ground
    pub fn go_down(&mut self, n: f64) {
        let mut record = CommandRecord::new(CommandKind::GoDown(n));
        if self.state != DroneState::InFlight {
            return self.reject(record, "cannot descend: drone is not flying".into());
        }
        if n <= 0.0 {
            return self.reject(record, "descent inapplicable: the amount must be positive".into());
        }
        self.previous = self.current;
        if self.current.z - n <= self.config.min_sec_altitude {
            self.current.z = self.config.min_sec_altitude;
            let reason = "minimum altitude reached - altitude safety engaged";
            warn!("{reason}");
            record.reason = Some(reason.into());
        } else {
            self.current.z -= n;
        }
        self.commit(record);
    }

    /// Turn `n` degrees to the left, in place
    pub fn rotate_left(&mut self, n: f64) {
        self.rotate(Spin::Left, n);
    }

    /// Turn `n` degrees to the right, in place
    pub fn rotate_right(&mut self, n: f64) {
        self.rotate(Spin::Right, n);
    }

    // === queries ===

    /// Recompute target proximity; always consistent with `detected()`
    pub fn is_target_detected(&self) -> bool {
        self.target
            .map_or(false, |t| self.current.distance(t) < self.config.radius_detection)
    }

    pub fn state(&self) -> DroneState {
        self.state
    }

    pub fn current_position(&self) -> &Position {
        &self.current
    }

    pub fn previous_position(&self) -> &Position {
        &self.previous
    }

    /// The latest command record, `None` before the first command
    pub fn command(&self) -> Option<&CommandRecord> {
        self.command.as_ref()
    }

    pub fn target(&self) -> Option<&Position> {
        self.target
    }

    /// Proximity flag as of the last state-changing command
    pub fn detected(&self) -> bool {
        self.detected
    }

    /// Altitude above the floor, rounded to whole centimeters
    pub fn altitude(&self) -> i32 {
        self.current.z.round() as i32
    }

    /// Heading in radians, accumulated without wraparound
    pub fn heading(&self) -> f64 {
        self.current.heading
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    // === internals ===

    fn translate(&mut self, direction: Translation, n: f64) -> Result<()> {
        let record = CommandRecord::new(direction.kind(n));
        let label = direction.label();
        if self.state != DroneState::InFlight {
            self.reject(record, format!("cannot move {label}: drone is not flying"));
            return Ok(());
        }
        if n < self.config.min_move {
            self.reject(
                record,
                format!(
                    "{label} movement inapplicable: minimum movement is {}cm",
                    self.config.min_move
                ),
            );
            return Ok(());
        }
        if n > self.config.max_move {
            self.reject(
                record,
                format!(
                    "{label} movement inapplicable: maximum movement is {}cm",
                    self.config.max_move
                ),
            );
            return Ok(());
        }
        let Some(room) = self.enclosure else {
            self.reject(record, "drone has not been located in an enclosure".into());
            return Ok(());
        };
        self.previous = self.current;
        let (dx, dy) = direction.offsets(self.current.heading, n);
        // the real aircraft moves in whole centimeters
        let goal = Position::new(
            (self.current.x + dx).round(),
            (self.current.y + dy).round(),
            self.current.z,
            self.current.heading,
        );
        if let Some(impact) = room.first_wall_intersection(&self.previous, &goal) {
            self.current.x = impact.x;
            self.current.y = impact.y;
            return self.crash(record, CrashSurface::Wall);
        }
        self.current.x = goal.x;
        self.current.y = goal.y;
        self.commit(record);
        Ok(())
    }

    fn rotate(&mut self, spin: Spin, n: f64) {
        let (record, label) = match spin {
            Spin::Left => (CommandRecord::new(CommandKind::RotateLeft(n)), "left"),
            Spin::Right => (CommandRecord::new(CommandKind::RotateRight(n)), "right"),
        };
        if self.state != DroneState::InFlight {
            return self.reject(record, format!("cannot rotate {label}: drone is not flying"));
        }
        if n < self.config.min_rotation {
            return self.reject(
                record,
                format!(
                    "rotation inapplicable: minimum angle is {} degrees",
                    self.config.min_rotation
                ),
            );
        }
        if n > self.config.max_rotation {
            return self.reject(
                record,
                format!(
                    "rotation inapplicable: maximum angle is {} degrees",
                    self.config.max_rotation
                ),
            );
        }
        self.previous = self.current;
        match spin {
            Spin::Left => self.current.heading += n.to_radians(),
            Spin::Right => self.current.heading -= n.to_radians(),
        }
        self.commit(record);
    }

    fn detect_target(&mut self) {
        self.detected = self.is_target_detected();
    }

    /// Record a soft rejection; state and positions stay untouched
    fn reject(&mut self, mut record: CommandRecord, reason: String) {
        warn!("{reason}");
        record.accepted = false;
        record.outcome = CommandOutcome::Rejected;
        record.reason = Some(reason);
        self.command = Some(record);
    }

    /// Commit a mutation and re-evaluate target proximity
    fn commit(&mut self, record: CommandRecord) {
        debug!("{record}");
        self.command = Some(record);
        self.detect_target();
    }

    /// Terminal collision: position already clamped to the impact point
    fn crash(&mut self, mut record: CommandRecord, surface: CrashSurface) -> Result<()> {
        record.outcome = CommandOutcome::Crash;
        self.state = DroneState::Crashed;
        error!("crash! drone hits {surface} at {}", self.current);
        self.command = Some(record);
        self.detect_target();
        Err(SimError::Crashed {
            surface,
            impact: self.current,
        })
    }
}
