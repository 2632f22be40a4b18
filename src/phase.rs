//! The ten decode phases.
//!
//! The original dispatches through an array of function pointers indexed by this enum. The
//! Rust rendition dispatches through an exhaustive `match` in `Decoder::step` instead: the
//! compiler rejects a missing arm the moment a phase is added, where the original would
//! silently index past the end of its function table.

use std::fmt;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Phase {
    Header,
    TrackHeader,
    EventDelta,
    EventStatus,
    EventParam1,
    EventParam2,
    EventNonChannel,
    EventDrop,
    EventSetTempo,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Phase::Header => "Header",
            Phase::TrackHeader => "TrackHeader",
            Phase::EventDelta => "EventDelta",
            Phase::EventStatus => "EventStatus",
            Phase::EventParam1 => "EventParam1",
            Phase::EventParam2 => "EventParam2",
            Phase::EventNonChannel => "EventNonChannel",
            Phase::EventDrop => "EventDrop",
            Phase::EventSetTempo => "EventSetTempo",
            Phase::Complete => "Complete",
        };
        write!(f, "{}", name)
    }
}

/// What a single phase handler reports back to the dispatcher.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StepOutcome {
    /// The phase cleanly completed (possibly consuming zero bytes, e.g. a pure transition);
    /// the dispatcher resets scratch and continues.
    Ok,
    /// The handler saved partial progress in scratch and needs more input; scratch is left
    /// untouched.
    Again,
    /// The stream is malformed beyond recovery.
    Abort,
}
