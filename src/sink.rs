//! The capability-set a caller implements to receive decoded events.
//!
//! This replaces the original's `on_event`/`on_complete` function pointers plus an opaque
//! `void *user_data` slot. Both methods default to doing nothing, which is the Rust rendition
//! of "either callback may be null": a caller that only cares about one of the two simply
//! doesn't override the other.

use crate::event::ChannelEvent;

pub trait EventSink {
    /// Fired synchronously after every complete channel event, with its delta already
    /// normalized to microseconds. Never fired for meta, sysex, or escape events.
    fn on_event(&mut self, _event: &ChannelEvent) {}

    /// Fired exactly once, after the last declared track's `END_OF_TRACK` has been seen.
    fn on_complete(&mut self) {}
}

/// A sink that discards everything. Useful for validating a stream's framing without caring
/// about its contents.
#[derive(Default)]
pub struct NullSink;
impl EventSink for NullSink {}
