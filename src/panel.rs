//! Turns a state snapshot into a drawable panel and writes it to the terminal.
//!
//! `render` is pure: snapshot in, `PanelFrame` out. `Screen` owns the actual
//! output and the couple of lines (clock, outside temp) that update on their
//! own cadence.

use std::io::Write;

use chrono::{DateTime, Local, Timelike};

use crate::controls::{ControlId, CONTROLS};
use crate::gauge::{self, GaugePosition};
use crate::state::ThermostatState;

#[derive(Debug, Clone, PartialEq)]
pub struct PanelFrame {
    /// Active flag per control, in `CONTROLS` order.
    pub controls: Vec<(ControlId, bool)>,
    pub override_active: bool,
    pub mode_label: String,
    pub rooms: Vec<RoomLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomLine {
    pub name: String,
    /// "20.0" or "??" for stale/missing readings.
    pub temp_text: String,
    /// "18 - 22", shown for every room.
    pub target_text: String,
    /// Marker for the live reading; hidden when the reading is unknown.
    pub current_marker: Option<GaugePosition>,
    /// Range markers, only drawn for the target room.
    pub min_marker: Option<GaugePosition>,
    pub max_marker: Option<GaugePosition>,
}

/// Build the panel for one state snapshot at wall-clock `now_ms`.
pub fn render(state: &ThermostatState, now_ms: i64) -> PanelFrame {
    let controls = CONTROLS
        .iter()
        .map(|&id| (id, state.controls.get(id)))
        .collect();

    let rooms = state
        .rooms
        .iter()
        .map(|room| {
            let is_target = state.target_room == room.name;
            RoomLine {
                name: room.name.clone(),
                temp_text: room.temp_display(now_ms),
                target_text: format!("{} - {}", state.temp_min, state.temp_max),
                current_marker: room.fresh_temp(now_ms).map(gauge::place),
                min_marker: is_target.then(|| gauge::place(state.temp_min)),
                max_marker: is_target.then(|| gauge::place(state.temp_max)),
            }
        })
        .collect();

    PanelFrame {
        controls,
        override_active: state.is_override(),
        mode_label: state.mode_label(),
        rooms,
    }
}

pub fn format_clock(now: DateTime<Local>) -> String {
    format!("{:02}:{:02}", now.hour(), now.minute())
}

/// Owns the terminal: draws frames and the independently-updated lines.
pub struct Screen<W: Write> {
    out: W,
    last_clock: Option<String>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_clock: None,
        }
    }

    pub fn draw(&mut self, frame: &PanelFrame) -> std::io::Result<()> {
        let buttons: Vec<String> = frame
            .controls
            .iter()
            .map(|&(id, on)| button(id.label(), on))
            .collect();
        writeln!(
            self.out,
            "{} {}  {}",
            buttons.join(" "),
            button("OVERRIDE", frame.override_active),
            frame.mode_label
        )?;

        for room in &frame.rooms {
            write!(
                self.out,
                "  {}: {}\u{00b0}C  target {}",
                room.name, room.temp_text, room.target_text
            )?;
            if let Some(pos) = room.current_marker {
                write!(self.out, "  now{}", marker(pos))?;
            }
            if let (Some(min), Some(max)) = (room.min_marker, room.max_marker) {
                write!(self.out, "  min{} max{}", marker(min), marker(max))?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    /// Write the clock line only when the displayed minute changes.
    pub fn tick_clock(&mut self, now: DateTime<Local>) -> std::io::Result<()> {
        let clock = format_clock(now);
        if self.last_clock.as_deref() == Some(clock.as_str()) {
            return Ok(());
        }
        writeln!(self.out, "  -- {clock} --")?;
        self.out.flush()?;
        self.last_clock = Some(clock);
        Ok(())
    }

    pub fn show_outside(&mut self, temp: f64) -> std::io::Result<()> {
        writeln!(self.out, "  outside: {}\u{00b0}C", temp.round() as i64)?;
        self.out.flush()
    }

    /// Backend-reported failure; shown prominently, polling carries on.
    pub fn show_alert(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "!! {message}")?;
        self.out.flush()
    }
}

fn button(label: &str, on: bool) -> String {
    if on {
        format!("[*{label}*]")
    } else {
        format!("[ {label} ]")
    }
}

fn marker(pos: GaugePosition) -> String {
    format!(
        "({:.0},{:.0} r{})",
        pos.top, pos.left, pos.rotation_deg
    )
}
