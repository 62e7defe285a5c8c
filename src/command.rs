//! Parses the interactive commands read from stdin.
//!
//! The browser original wires these to buttons; here they are typed:
//! `ac`, `fanlow`, `fanhigh`, `heat`, `resume`, and target adjustments like
//! `min+ 0` / `max- 1` (bound, direction, room index).

use crate::controls::ControlId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle(ControlId),
    Resume,
    Adjust {
        bound: Bound,
        delta: i32,
        room: usize,
    },
    Help,
}

pub const USAGE: &str = "commands: ac | fanlow | fanhigh | heat | resume | \
                         min+ [room] | min- [room] | max+ [room] | max- [room] | help";

pub fn parse(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = words.next()?.to_ascii_lowercase();

    let command = match head.as_str() {
        "ac" => Command::Toggle(ControlId::Ac),
        "fanlow" => Command::Toggle(ControlId::FanLow),
        "fanhigh" => Command::Toggle(ControlId::FanHigh),
        "heat" => Command::Toggle(ControlId::Heat),
        "resume" => Command::Resume,
        "help" | "?" => Command::Help,
        "min+" | "min-" | "max+" | "max-" => {
            let bound = if head.starts_with("min") {
                Bound::Min
            } else {
                Bound::Max
            };
            let delta = if head.ends_with('+') { 1 } else { -1 };
            let room = match words.next() {
                Some(idx) => idx.parse().ok()?,
                None => 0,
            };
            Command::Adjust { bound, delta, room }
        }
        _ => return None,
    };

    // Trailing junk after a complete command is rejected.
    if words.next().is_some() {
        return None;
    }
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_and_resume() {
        assert_eq!(parse("ac"), Some(Command::Toggle(ControlId::Ac)));
        assert_eq!(parse("  HEAT "), Some(Command::Toggle(ControlId::Heat)));
        assert_eq!(parse("fanhigh"), Some(Command::Toggle(ControlId::FanHigh)));
        assert_eq!(parse("resume"), Some(Command::Resume));
        assert_eq!(parse("?"), Some(Command::Help));
    }

    #[test]
    fn adjustments_carry_bound_direction_and_room() {
        assert_eq!(
            parse("min+ 1"),
            Some(Command::Adjust {
                bound: Bound::Min,
                delta: 1,
                room: 1
            })
        );
        assert_eq!(
            parse("max-"),
            Some(Command::Adjust {
                bound: Bound::Max,
                delta: -1,
                room: 0
            })
        );
    }

    #[test]
    fn junk_is_rejected() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("warp 9"), None);
        assert_eq!(parse("min+ one"), None);
        assert_eq!(parse("ac now"), None);
    }
}
