//! Per-track state: the running-status cache and the event currently being assembled.
//!
//! The running-status cache lives here, not on the top-level decoder context, because it must
//! reset at every `MTrk` boundary (spec.md §9 Design Notes).

#[derive(Debug, Default)]
pub struct TrackState {
    /// The track's declared byte length, straight off the wire. Informational only — the
    /// decoder relies on `END_OF_TRACK` to know when a track ends, not on this value (spec.md
    /// §3), but it's kept for parity with `Header::len`, which is equally informational and
    /// equally exposed.
    pub len: u32,
    last_event_status: u8,
    last_event_status_avail: bool,
    pub event: EventRecord,
}

impl TrackState {
    /// Called on entering a fresh track header.
    pub fn reset_running_status(&mut self) {
        self.last_event_status = 0;
        self.last_event_status_avail = false;
    }

    pub fn last_event_status_avail(&self) -> bool {
        self.last_event_status_avail
    }

    pub fn last_event_status(&self) -> u8 {
        self.last_event_status
    }

    pub fn record_status(&mut self, status: u8) {
        self.last_event_status = status;
        self.last_event_status_avail = true;
    }
}

/// The event currently being parsed. `delta` holds raw ticks until the normalizer rewrites it
/// to microseconds just before delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventRecord {
    pub delta: u32,
    pub status: u8,
    pub param1: u8,
    pub param2: u8,
    pub is_meta: bool,
}
