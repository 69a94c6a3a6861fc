use std::fmt::Write as _;

use fwretract_core::error::{CoreError, Domain, ErrorKind, Payload, Result as CoreResult};
use fwretract_core::motion::{Axis, MotionPlanner, MoveRecord, SimPlanner, ALL_AXES};
use fwretract_core::retract::{FwRetract, Outcome};
use fwretract_core::settings::RetractUpdate;

use crate::config::Config;

/// One script line.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command {
    Retract { swap: bool },
    Recover { swap: bool },
    /// Select the active extruder.
    Tool(usize),
    /// E-only move; goes through auto-retract first.
    Extrude(f32),
    Reset,
    Status,
}

/// Parse a script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> CoreResult<Option<Command>> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or("").to_ascii_lowercase();
    let arg = words.next();

    let cmd = match (head.as_str(), arg) {
        ("retract", None) => Command::Retract { swap: false },
        ("retract", Some("swap")) => Command::Retract { swap: true },
        ("recover", None) => Command::Recover { swap: false },
        ("recover", Some("swap")) => Command::Recover { swap: true },
        ("tool", Some(n)) => Command::Tool(n.parse().map_err(|_| bad_line(line))?),
        ("e", Some(d)) => Command::Extrude(d.parse().map_err(|_| bad_line(line))?),
        ("reset", None) => Command::Reset,
        ("status", None) => Command::Status,
        _ => return Err(bad_line(line)),
    };

    Ok(Some(cmd))
}

fn bad_line(line: &str) -> CoreError {
    CoreError::warn()
        .domain(Domain::Config)
        .kind(ErrorKind::InvalidArgument)
        .msg("unrecognised script line")
        .payload(Payload::Context {
            key: "line",
            value: line.to_string().into(),
        })
        .build()
}

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub command: Command,
    /// `None` for commands that are not retraction requests, and for E moves
    /// that were executed as plain moves.
    pub outcome: Option<Outcome>,
    pub moves: Vec<MoveRecord>,
}

/// Retraction engine driving the simulated planner, one command at a time.
pub struct Replay {
    fw: FwRetract,
    sim: SimPlanner,
}

impl Replay {
    pub fn new(config: &Config) -> CoreResult<Self> {
        let mut fw = FwRetract::new(config.extruders);
        fw.apply_retract_update(RetractUpdate {
            zlift: config.zlift,
            ..RetractUpdate::default()
        })?;
        fw.set_autoretract(config.autoretract);

        Ok(Self {
            fw,
            sim: SimPlanner::new(config.extruders),
        })
    }

    pub fn engine(&self) -> &FwRetract {
        &self.fw
    }

    pub fn planner(&self) -> &SimPlanner {
        &self.sim
    }

    pub fn run_line(&mut self, line: &str) -> CoreResult<Option<Step>> {
        match parse_line(line)? {
            Some(cmd) => self.execute(cmd).map(Some),
            None => Ok(None),
        }
    }

    pub fn execute(&mut self, command: Command) -> CoreResult<Step> {
        let outcome = match command {
            Command::Retract { swap } => Some(self.fw.retract(&mut self.sim, true, swap)?),
            Command::Recover { swap } => Some(self.fw.retract(&mut self.sim, false, swap)?),
            Command::Tool(index) => {
                if index >= self.fw.extruder_count() {
                    return Err(CoreError::extruder_out_of_range(
                        index,
                        self.fw.extruder_count(),
                    ));
                }
                self.sim.select_extruder(index);
                None
            }
            Command::Extrude(delta) => {
                let absorbed = self.fw.auto_retract(&mut self.sim, delta)?;
                if absorbed.is_none() {
                    let mut destination = self.sim.logical_position();
                    destination[Axis::E] += delta;
                    self.sim.submit_move(destination);
                }
                absorbed
            }
            Command::Reset => {
                self.fw.reset();
                None
            }
            Command::Status => None,
        };

        Ok(Step {
            command,
            outcome,
            moves: self.sim.take_moves(),
        })
    }

    /// One-line summary of extruder flags, owed hop and positions.
    pub fn status(&self) -> String {
        let mut out = String::new();
        for (i, state) in self.fw.extruder_states().iter().enumerate() {
            let marker = if i == self.sim.active_extruder() { "*" } else { "" };
            let _ = write!(out, "T{i}{marker}={} ", state.label());
        }
        let logical = self.sim.logical_position();
        let physical = self.sim.physical_position();
        let _ = write!(
            out,
            "hop={:.3} Z={:.3}/{:.3} E={:.3}/{:.3}",
            self.fw.hop_amount(),
            logical[Axis::Z],
            physical[Axis::Z],
            logical[Axis::E],
            physical[Axis::E],
        );
        out
    }
}

/// `move dZ=+0.400 F=5.0`: only axes that moved are listed.
pub fn describe_move(m: &MoveRecord) -> String {
    let mut out = String::from("move");
    for axis in ALL_AXES {
        let d = m.delta[axis];
        if d != 0.0 {
            let _ = write!(out, " d{}={d:+.3}", axis.label());
        }
    }
    let _ = write!(out, " F={:.1}", m.feedrate_mm_s);
    out
}
