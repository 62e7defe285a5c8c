//! Maps a temperature onto the circular gauge arc.
//!
//! The gauge covers [5, 35] degrees over a 270 degree sweep. A marker sits on a
//! circle of radius `GAUGE_RADIUS` and is rotated to point outwards.

use std::f64::consts::PI;

pub const GAUGE_RADIUS: f64 = 200.0 / 2.0 - 3.0;
pub const DOT_RADIUS: f64 = 12.0;

const TEMP_MIN: f64 = 5.0;
const TEMP_MAX: f64 = 35.0;
const SWEEP_DEGREES: f64 = 270.0;

/// Screen placement of a gauge marker: top/left offsets from the gauge's
/// bounding box and a rotation for the marker glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugePosition {
    pub rotation_deg: i32,
    pub top: f64,
    pub left: f64,
}

/// Position a marker for `temperature` on the arc.
///
/// Only the upper bound is clamped: temperatures above 35 pin to the end of the
/// arc, while temperatures below 5 run off the start. Deterministic for a given
/// input.
pub fn place(temperature: f64) -> GaugePosition {
    let mut percentage = (temperature - TEMP_MIN) / (TEMP_MAX - TEMP_MIN);
    if percentage > 1.0 {
        percentage = 1.0;
    }

    let radians = PI * (SWEEP_DEGREES * percentage - 45.0) / 180.0;

    let x = GAUGE_RADIUS * radians.cos();
    let y = GAUGE_RADIUS * radians.sin();

    // Top-left origin: screen y grows downward.
    let starting = GAUGE_RADIUS - DOT_RADIUS - 2.0;

    GaugePosition {
        rotation_deg: 90 + radians.to_degrees().round() as i32,
        top: starting - y,
        left: starting - x,
    }
}
