//! Single-writer cell for the latest controller state.
//!
//! Every request takes a sequence number before it goes out; responses apply
//! in sequence order and anything older than the last applied snapshot is
//! dropped, so a slow mutation response cannot overwrite a newer poll.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::state::ThermostatState;

pub struct StateCell {
    next_seq: AtomicU64,
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    applied_seq: u64,
    state: Option<ThermostatState>,
}

impl StateCell {
    pub fn new() -> Self {
        Self {
            // Sequence 0 means "nothing applied yet".
            next_seq: AtomicU64::new(1),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Take a sequence number for an outgoing request.
    pub fn begin(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Apply a response snapshot. Returns false if a newer snapshot already
    /// landed and this one was discarded.
    pub fn apply(&self, seq: u64, state: ThermostatState) -> bool {
        let mut inner = self.inner.write().unwrap();
        if seq < inner.applied_seq {
            return false;
        }
        inner.applied_seq = seq;
        inner.state = Some(state);
        true
    }

    pub fn current(&self) -> Option<ThermostatState> {
        self.inner.read().unwrap().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(name: &str) -> ThermostatState {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "tempMin": 18,
            "tempMax": 22,
            "targetRoom": "Living Room",
            "rooms": [],
        }))
        .unwrap()
    }

    #[test]
    fn applies_in_order() {
        let cell = StateCell::new();
        assert!(cell.current().is_none());

        let a = cell.begin();
        let b = cell.begin();
        assert!(b > a);

        assert!(cell.apply(a, state("first")));
        assert!(cell.apply(b, state("second")));
        assert_eq!(cell.current().unwrap().name, "second");
    }

    #[test]
    fn discards_out_of_order_response() {
        let cell = StateCell::new();
        let early = cell.begin();
        let late = cell.begin();

        assert!(cell.apply(late, state("late")));
        assert!(!cell.apply(early, state("early")));
        assert_eq!(cell.current().unwrap().name, "late");
    }
}
