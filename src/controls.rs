//! The four thermostat outputs and the rules that keep them consistent.
//!
//! The backend reports each control as `1`/`0`; requests carry them as
//! `"true"`/`"false"` form fields. In between they live as plain bools.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Ac,
    FanLow,
    FanHigh,
    Heat,
}

pub const CONTROLS: [ControlId; 4] = [
    ControlId::Ac,
    ControlId::FanLow,
    ControlId::FanHigh,
    ControlId::Heat,
];

impl ControlId {
    pub fn wire_name(self) -> &'static str {
        match self {
            ControlId::Ac => "ac",
            ControlId::FanLow => "fanLow",
            ControlId::FanHigh => "fanHigh",
            ControlId::Heat => "heat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlId::Ac => "AC",
            ControlId::FanLow => "FAN LOW",
            ControlId::FanHigh => "FAN HIGH",
            ControlId::Heat => "HEAT",
        }
    }

    fn is_fan(self) -> bool {
        matches!(self, ControlId::FanLow | ControlId::FanHigh)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ControlFlags {
    #[serde(default, deserialize_with = "flag")]
    pub ac: bool,
    #[serde(default, deserialize_with = "flag", rename = "fanLow")]
    pub fan_low: bool,
    #[serde(default, deserialize_with = "flag", rename = "fanHigh")]
    pub fan_high: bool,
    #[serde(default, deserialize_with = "flag")]
    pub heat: bool,
}

impl ControlFlags {
    pub fn get(&self, id: ControlId) -> bool {
        match id {
            ControlId::Ac => self.ac,
            ControlId::FanLow => self.fan_low,
            ControlId::FanHigh => self.fan_high,
            ControlId::Heat => self.heat,
        }
    }

    pub fn set(&mut self, id: ControlId, on: bool) {
        match id {
            ControlId::Ac => self.ac = on,
            ControlId::FanLow => self.fan_low = on,
            ControlId::FanHigh => self.fan_high = on,
            ControlId::Heat => self.heat = on,
        }
    }

    /// Form fields for `/api/state/set`.
    pub fn to_form(&self) -> Vec<(&'static str, &'static str)> {
        CONTROLS
            .iter()
            .map(|&id| {
                (
                    id.wire_name(),
                    if self.get(id) { "true" } else { "false" },
                )
            })
            .collect()
    }
}

/// Next flag set after toggling `id` to `on`, starting from `current`.
///
/// Precedence:
/// 1. turning heat on, or turning any control off, drops everything else;
/// 2. turning a fan speed on keeps the rest but kicks out the other speed;
/// 3. otherwise the rest keeps its current value.
/// Then the invariant pass: AC without fan-high forces fan-low on, and any
/// non-heat control turning on forces heat off.
pub fn next_flags(current: ControlFlags, id: ControlId, on: bool) -> ControlFlags {
    let mut next = if (id == ControlId::Heat && on) || (id != ControlId::Heat && !on) {
        ControlFlags::default()
    } else if id.is_fan() && on {
        let mut kept = current;
        match id {
            ControlId::FanHigh => kept.fan_low = false,
            ControlId::FanLow => kept.fan_high = false,
            _ => unreachable!(),
        }
        kept
    } else {
        current
    };
    next.set(id, on);

    if next.ac && !next.fan_high {
        next.fan_low = true;
    }
    if id != ControlId::Heat && on {
        next.heat = false;
    }
    next
}

// The backend encodes an active control as the number 1; anything else
// (0, null, absent, or an actual bool) is handled here.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    })
}
