//! Wire model for the backend `/api/state` family of endpoints.

use serde::Deserialize;

use crate::controls::ControlFlags;

/// A room temperature older than this is shown as unknown.
pub const STALE_AFTER_MS: i64 = 1000 * 60 * 10;

/// Schedule name the backend reports while a manual override is active.
pub const OVERRIDE_NAME: &str = "Override";

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<ThermostatState>,
}

/// Full controller state. Replaced wholesale on every fetch; never patched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatState {
    pub name: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub target_room: String,
    pub rooms: Vec<Room>,
    #[serde(flatten)]
    pub controls: ControlFlags,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub name: String,
    #[serde(default)]
    pub current_temp: Option<f64>,
    /// Epoch milliseconds of the last sensor reading.
    #[serde(default)]
    pub current_temp_timestamp: Option<i64>,
}

impl ThermostatState {
    pub fn is_override(&self) -> bool {
        self.name == OVERRIDE_NAME
    }

    /// Display label for the mode line. Schedule names get a "Schedule: "
    /// prefix exactly once; the override name is shown as-is.
    pub fn mode_label(&self) -> String {
        if !self.is_override() && !self.name.contains("Schedule:") {
            format!("Schedule: {}", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl Room {
    /// Current temperature if the reading is present and fresh at `now_ms`.
    pub fn fresh_temp(&self, now_ms: i64) -> Option<f64> {
        let temp = self.current_temp?;
        let ts = self.current_temp_timestamp?;
        if now_ms - ts > STALE_AFTER_MS {
            return None;
        }
        Some(temp)
    }

    /// One-decimal display text, or "??" for missing or stale telemetry.
    pub fn temp_display(&self, now_ms: i64) -> String {
        match self.fresh_temp(now_ms) {
            Some(t) => format!("{:.1}", (t * 10.0).round() / 10.0),
            None => "??".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_json() -> &'static str {
        r#"{
            "name": "Weekday",
            "tempMin": 18,
            "tempMax": 22,
            "targetRoom": "Living Room",
            "rooms": [
                {"name": "Living Room", "currentTemp": 20.04, "currentTempTimestamp": 1000000},
                {"name": "Bedroom", "currentTemp": null, "currentTempTimestamp": null}
            ],
            "ac": 0, "fanLow": 0, "fanHigh": 0, "heat": 1
        }"#
    }

    #[test]
    fn decodes_backend_payload() {
        let state: ThermostatState = serde_json::from_str(state_json()).unwrap();
        assert_eq!(state.name, "Weekday");
        assert_eq!(state.temp_min, 18.0);
        assert_eq!(state.temp_max, 22.0);
        assert_eq!(state.target_room, "Living Room");
        assert_eq!(state.rooms.len(), 2);
        assert!(state.controls.heat);
        assert!(!state.controls.ac);
    }

    #[test]
    fn envelope_with_failure_message() {
        let env: ApiEnvelope =
            serde_json::from_str(r#"{"success": false, "message": "sensor offline"}"#).unwrap();
        assert!(!env.success);
        assert_eq!(env.message.as_deref(), Some("sensor offline"));
        assert!(env.data.is_none());
    }

    #[test]
    fn mode_label_prefixes_once() {
        let mut state: ThermostatState = serde_json::from_str(state_json()).unwrap();
        assert_eq!(state.mode_label(), "Schedule: Weekday");

        state.name = "Schedule: Weekday".to_string();
        assert_eq!(state.mode_label(), "Schedule: Weekday");

        state.name = OVERRIDE_NAME.to_string();
        assert_eq!(state.mode_label(), "Override");
        assert!(state.is_override());
    }

    #[test]
    fn stale_readings_show_as_unknown() {
        let now = 1_700_000_000_000i64;
        let room = Room {
            name: "Living Room".to_string(),
            current_temp: Some(20.04),
            current_temp_timestamp: Some(now - STALE_AFTER_MS - 1),
        };
        assert_eq!(room.temp_display(now), "??");

        let fresh = Room {
            current_temp_timestamp: Some(now - 1000),
            ..room.clone()
        };
        assert_eq!(fresh.temp_display(now), "20.0");

        let missing = Room {
            current_temp: None,
            current_temp_timestamp: Some(now),
            name: "x".to_string(),
        };
        assert_eq!(missing.temp_display(now), "??");
    }
}
